//! easel API - drawing practice tracker
//!
//! A REST service for daily drawing practice: AI-generated topics, practice
//! session logging with image uploads, aggregated statistics, and an
//! AI-generated progress report.
//!
//! # Architecture
//!
//! The service is organized into several key modules:
//!
//! - [`config`]: Configuration management and environment loading
//! - [`database`]: Repository traits over PostgreSQL and an in-memory backend
//! - [`storage`]: Image storage (local filesystem or HTTP object storage)
//! - [`llm`]: LLM client abstractions and provider implementations
//! - [`domain`]: Core domain models (topics, sessions, reports, statistics)
//! - [`topics`]: Topic catalog and the recommendation engine
//! - [`stats`]: Statistics aggregation
//! - [`report`]: AI progress report generation
//! - [`api`]: HTTP API endpoints
//!
//! # Example
//!
//! ```rust,ignore
//! use easel_api::{config::AppConfig, server::create_app};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let app = create_app(config).await?;
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod config;
pub mod database;
pub mod domain;
pub mod llm;
pub mod logging;
pub mod report;
pub mod server;
pub mod stats;
pub mod storage;
pub mod topics;

use std::sync::Arc;

use config::AppConfig;
use database::Database;
use llm::LlmClient;
use storage::ImageStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Storage backend behind the repository traits.
    pub db: Database,
    /// LLM client for topic and report generation.
    pub llm: Arc<dyn LlmClient>,
    /// Image store for practice uploads.
    pub images: Arc<ImageStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &"AppConfig")
            .field("db", &self.db)
            .field("llm", &self.llm.provider())
            .field("images", &self.images)
            .finish()
    }
}
