//! HTTP server setup and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api;
use crate::config::AppConfig;
use crate::database::Database;
use crate::llm::{client_from_settings, LlmSettings, Provider};
use crate::logging::OpTimer;
use crate::storage::ImageStore;
use crate::{log_banner, log_init_step, log_init_warning, log_success, AppState};

/// Crate version (from Cargo.toml).
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create the application with all routes and middleware.
pub async fn create_app(config: AppConfig) -> anyhow::Result<Router> {
    let overall_timer = OpTimer::new("server", "create_app");

    log_banner!(
        format!("🎨 easel API v{VERSION}"),
        format!("Storage: {:?}", config.storage.backend)
    );

    // [1/4] LLM client
    let step_timer = OpTimer::new("server", "llm_client");
    let llm_settings = create_llm_settings(&config);
    let provider_info = format!(
        "{} ({}) {}",
        match llm_settings.provider {
            Provider::OpenAi => "⚙️ OpenAI",
            Provider::Anthropic => "⚙️ Anthropic",
            Provider::Custom => "⚙️ Custom",
        },
        llm_settings.model,
        if llm_settings.api_key.is_some() {
            "✓"
        } else {
            "✗ No API key"
        }
    );
    log_init_step!(1, 4, "LLM Client", provider_info);
    if llm_settings.api_key.is_none() {
        log_init_warning!(
            "No API key configured for provider: {:?}. Topic and report generation will fail.",
            llm_settings.provider
        );
    }
    let llm = client_from_settings(llm_settings);
    step_timer.finish();

    // [2/4] Database
    let step_timer = OpTimer::new("server", "database");
    let db = Database::connect(&config.database).await?;
    log_init_step!(2, 4, "Database", "🗄️  PostgreSQL connected, schema applied");
    step_timer.finish();

    // [3/4] Image store
    let step_timer = OpTimer::new("server", "image_store");
    let images = Arc::new(ImageStore::from_config(&config.storage).await?);
    let store_info = match images.local_dir() {
        Some(dir) => format!("🖼️  Local directory: {}", dir.display()),
        None => "🖼️  Remote object storage".to_string(),
    };
    log_init_step!(3, 4, "Image Store", store_info);
    step_timer.finish();

    // [4/4] Router + middleware
    let step_timer = OpTimer::new("server", "router");
    let state = AppState {
        config: Arc::new(config),
        db,
        llm,
        images,
    };
    let app = build_router(state)?;
    log_init_step!(4, 4, "Router", "🌐 Routes + middleware configured");
    step_timer.finish();

    overall_timer.finish();
    log_success!("easel API server created successfully");

    Ok(app)
}

/// Compose routes and middleware around an existing state.
///
/// Split from [`create_app`] so tests can wire in the in-memory database and
/// a scripted LLM client.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors = match state.config.server.cors_origin.as_deref() {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let mut router = api::create_router();
    if let Some(dir) = state.images.local_dir() {
        router = router.nest_service("/uploads", ServeDir::new(dir));
    }

    let app = router
        .layer(DefaultBodyLimit::max(state.config.storage.max_upload_bytes))
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.server.timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Create LLM settings from app config, picking the provider by key presence.
fn create_llm_settings(config: &AppConfig) -> LlmSettings {
    let (provider, api_key, base_url) = if config.providers.openai.api_key.is_some() {
        (
            Provider::OpenAi,
            config.providers.openai.api_key.clone(),
            config
                .providers
                .openai
                .base_url
                .clone()
                .unwrap_or_else(|| Provider::OpenAi.default_base_url().to_string()),
        )
    } else if config.providers.anthropic.api_key.is_some() {
        (
            Provider::Anthropic,
            config.providers.anthropic.api_key.clone(),
            config
                .providers
                .anthropic
                .base_url
                .clone()
                .unwrap_or_else(|| Provider::Anthropic.default_base_url().to_string()),
        )
    } else {
        // Default to OpenAI without a key (requests will fail).
        (
            Provider::OpenAi,
            None,
            Provider::OpenAi.default_base_url().to_string(),
        )
    };

    LlmSettings {
        base_url,
        api_key,
        model: config.llm.model.clone(),
        provider,
        max_tokens: config.llm.max_tokens,
        temperature: config.llm.temperature,
    }
}
