//! AI progress report generation.
//!
//! Summarizes a user's recent practice sessions into a natural-language
//! report. Below three sessions no LLM call is made; the user gets a fixed
//! encouragement instead. The report body is stored opaquely — the labeled
//! subsections the prompt requests are presentation-only.

use anyhow::Context;

use crate::database::{Database, PracticeRepository, ReportRepository};
use crate::domain::{AiReport, PracticeSession, UserContext};
use crate::llm::{CompletionRequest, LlmClient};

/// How many recent sessions feed the report, newest first.
const REPORT_SESSION_LIMIT: i64 = 20;

/// Minimum sessions before the LLM path is worth running.
const MIN_SESSIONS_FOR_ANALYSIS: usize = 3;

/// Shown when the user has no sessions yet.
const NO_SESSIONS_MESSAGE: &str = "Let's start practicing! Keep at it and the AI will track \
                                   your growth with you.";

/// Report temperature; analysis reads better with less sampling spread than
/// topic generation.
const REPORT_TEMPERATURE: f32 = 0.7;

/// Token cap for the report body.
const REPORT_MAX_TOKENS: u32 = 1000;

const REPORT_SYSTEM_PROMPT: &str = r"You are an analysis assistant for drawing practice.
Analyze the user's practice history and reflections, and produce a report with exactly
these five labeled sections:

[Overall Assessment]
An overall read on the recent practice.

[Strengths]
- item: concrete detail (several bullet points)

[Weaknesses / Areas to Improve]
- item: concrete detail (several bullet points)

[Growth]
- concrete signs of progress (several bullet points)

[Next Steps]
- concrete advice (several bullet points)

Keep the analysis specific and positive; the goal is to sustain the user's motivation.";

/// Shown when there are sessions, but too few to analyze.
fn few_sessions_message(count: usize) -> String {
    format!(
        "You have recorded {count} practice sessions! Keep going a little longer and a \
         more detailed analysis will be possible. Consistency is what counts!"
    )
}

fn format_sessions(sessions: &[PracticeSession]) -> String {
    sessions
        .iter()
        .enumerate()
        .map(|(index, session)| {
            format!(
                "[Practice {}]\n\
                 - Topic: {}\n\
                 - Difficulty: {}\n\
                 - Time spent: {} minutes\n\
                 - What went well: {}\n\
                 - What was a struggle: {}\n\
                 - What was learned: {}\n",
                index + 1,
                session.topic_description,
                session.topic_difficulty,
                session.duration_seconds / 60,
                session.reflection_good.as_deref().unwrap_or("none"),
                session.reflection_struggled.as_deref().unwrap_or("none"),
                session.reflection_learned.as_deref().unwrap_or("none"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Produce the report body for a user.
///
/// The fixed messages for thin histories never touch the LLM.
pub async fn generate_report(
    llm: &dyn LlmClient,
    db: &Database,
    user: UserContext,
) -> anyhow::Result<String> {
    let sessions = db
        .recent_sessions(user.user_id, REPORT_SESSION_LIMIT)
        .await?;

    if sessions.is_empty() {
        return Ok(NO_SESSIONS_MESSAGE.to_string());
    }
    if sessions.len() < MIN_SESSIONS_FOR_ANALYSIS {
        return Ok(few_sessions_message(sessions.len()));
    }

    let request = CompletionRequest::new(
        REPORT_SYSTEM_PROMPT,
        format!(
            "Here is my recent practice history. Analyze it and produce my report.\n\n{}",
            format_sessions(&sessions)
        ),
    )
    .with_temperature(REPORT_TEMPERATURE)
    .with_max_tokens(REPORT_MAX_TOKENS);

    llm.complete(request).await
}

/// Generate the report body and upsert it as the user's single report row.
///
/// Nothing partial is ever stored: an LLM failure, an empty body, or a
/// storage failure all surface as one generation error.
pub async fn generate_and_store_report(
    llm: &dyn LlmClient,
    db: &Database,
    user: UserContext,
) -> anyhow::Result<AiReport> {
    let body = generate_report(llm, db, user)
        .await
        .context("report generation failed")?;
    db.upsert_report(user.user_id, &body)
        .await
        .context("report generation failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::{Difficulty, NewPracticeSession};
    use crate::llm::Provider;

    /// LLM stub that counts invocations.
    struct CountingLlm {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingLlm {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for CountingLlm {
        async fn complete(&self, _req: CompletionRequest) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("provider unavailable");
            }
            Ok("[Overall Assessment]\nSteady progress.".to_string())
        }

        fn provider(&self) -> Provider {
            Provider::Custom
        }
    }

    async fn seed_sessions(db: &Database, count: usize) {
        for i in 0..count {
            let new = NewPracticeSession {
                user_id: 1,
                topic_description: format!("gesture study number {i}"),
                topic_difficulty: Difficulty::Beginner,
                image_path: "/uploads/practice-seed.png".to_string(),
                duration_seconds: 900,
                reflection_good: Some("flow".to_string()),
                reflection_struggled: None,
                reflection_learned: None,
            };
            db.create_session(&new).await.expect("seed");
        }
    }

    #[tokio::test]
    async fn test_zero_sessions_fixed_message_without_llm() {
        let llm = CountingLlm::new(false);
        let db = Database::in_memory();

        let body = generate_report(&llm, &db, UserContext::default())
            .await
            .expect("report");
        assert_eq!(body, NO_SESSIONS_MESSAGE);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_thin_history_message_interpolates_count() {
        let llm = CountingLlm::new(false);
        let db = Database::in_memory();
        seed_sessions(&db, 2).await;

        let body = generate_report(&llm, &db, UserContext::default())
            .await
            .expect("report");
        assert!(body.contains("2 practice sessions"), "got: {body}");
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_three_sessions_invoke_llm() {
        let llm = CountingLlm::new(false);
        let db = Database::in_memory();
        seed_sessions(&db, 3).await;

        let body = generate_report(&llm, &db, UserContext::default())
            .await
            .expect("report");
        assert!(body.contains("Overall Assessment"));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_generation_stores_nothing() {
        let llm = CountingLlm::new(true);
        let db = Database::in_memory();
        seed_sessions(&db, 5).await;

        let result = generate_and_store_report(&llm, &db, UserContext::default()).await;
        assert!(result.is_err());
        assert!(db.get_report(1).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_store_upserts_single_row() {
        let llm = CountingLlm::new(false);
        let db = Database::in_memory();
        seed_sessions(&db, 3).await;

        let first = generate_and_store_report(&llm, &db, UserContext::default())
            .await
            .expect("first");
        let second = generate_and_store_report(&llm, &db, UserContext::default())
            .await
            .expect("second");
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_format_sessions_uses_minutes_and_placeholders() {
        let session = PracticeSession {
            id: 1,
            user_id: 1,
            topic_description: "a chef plating a dish".to_string(),
            topic_difficulty: Difficulty::Intermediate,
            image_path: "/uploads/practice-x.png".to_string(),
            duration_seconds: 150,
            reflection_good: Some("composition".to_string()),
            reflection_struggled: None,
            reflection_learned: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let formatted = format_sessions(std::slice::from_ref(&session));
        assert!(formatted.contains("Time spent: 2 minutes"));
        assert!(formatted.contains("What went well: composition"));
        assert!(formatted.contains("What was a struggle: none"));
    }
}
