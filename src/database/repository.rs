//! Repository traits and the backend dispatch enum.
//!
//! Trait-based abstractions for data access that work across database
//! backends: PostgreSQL in production, an in-memory store for tests.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::DatabaseConfig;
use crate::domain::{
    AiReport, CalendarDay, Difficulty, NewPracticeSession, PracticeSession, ReflectionUpdate,
    Topic,
};

use super::memory::InMemoryStore;
use super::postgres::PostgresStore;

/// Repository trait for topic persistence.
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Persist a generated topic and return the stored row.
    async fn create_topic(
        &self,
        description: &str,
        difficulty: Difficulty,
    ) -> anyhow::Result<Topic>;
}

/// Repository trait for practice session operations.
#[async_trait]
pub trait PracticeRepository: Send + Sync {
    /// Create a new practice session.
    async fn create_session(&self, session: &NewPracticeSession)
        -> anyhow::Result<PracticeSession>;

    /// Get a session by id.
    async fn get_session(&self, id: i64) -> anyhow::Result<Option<PracticeSession>>;

    /// List all sessions for a user, newest first.
    async fn list_sessions(&self, user_id: i64) -> anyhow::Result<Vec<PracticeSession>>;

    /// List the most recent sessions for a user, newest first.
    async fn recent_sessions(
        &self,
        user_id: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<PracticeSession>>;

    /// Overwrite the supplied reflection fields, keeping unset ones.
    ///
    /// Returns `None` when the session does not exist.
    async fn update_reflection(
        &self,
        id: i64,
        update: &ReflectionUpdate,
    ) -> anyhow::Result<Option<PracticeSession>>;
}

/// Repository trait for the per-user AI report.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Insert or update the single report row for a user.
    ///
    /// The write is a single conditional upsert keyed on the unique user
    /// constraint, so concurrent regenerations cannot create a second row.
    async fn upsert_report(&self, user_id: i64, body: &str) -> anyhow::Result<AiReport>;

    /// Get the latest report for a user.
    async fn get_report(&self, user_id: i64) -> anyhow::Result<Option<AiReport>>;
}

/// Repository trait for the statistics aggregator's sub-queries.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Total session count for a user.
    async fn count_sessions(&self, user_id: i64) -> anyhow::Result<i64>;

    /// Mean duration in seconds; `None` when there are no sessions.
    async fn average_duration(&self, user_id: i64) -> anyhow::Result<Option<f64>>;

    /// Session counts grouped by difficulty.
    async fn difficulty_counts(&self, user_id: i64) -> anyhow::Result<Vec<(Difficulty, i64)>>;

    /// Distinct dates with at least one session, descending.
    async fn practice_dates(&self, user_id: i64) -> anyhow::Result<Vec<NaiveDate>>;

    /// Per-day session counts within the trailing `days` window, ascending.
    async fn calendar_counts(&self, user_id: i64, days: i32) -> anyhow::Result<Vec<CalendarDay>>;
}

/// Database abstraction over the supported backends.
#[derive(Clone)]
pub enum Database {
    /// PostgreSQL for production.
    Postgres(PostgresStore),
    /// In-memory store for testing.
    InMemory(InMemoryStore),
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres(_) => write!(f, "Database::Postgres"),
            Self::InMemory(_) => write!(f, "Database::InMemory"),
        }
    }
}

impl Database {
    /// Connect to PostgreSQL and apply the schema.
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let store = PostgresStore::connect(config).await?;
        Ok(Self::Postgres(store))
    }

    /// Create an in-memory database for testing.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::InMemory(InMemoryStore::new())
    }

    /// Round-trip connectivity probe.
    pub async fn ping(&self) -> anyhow::Result<()> {
        match self {
            Self::Postgres(store) => store.ping().await,
            Self::InMemory(_) => Ok(()),
        }
    }
}

#[async_trait]
impl TopicRepository for Database {
    async fn create_topic(
        &self,
        description: &str,
        difficulty: Difficulty,
    ) -> anyhow::Result<Topic> {
        match self {
            Self::Postgres(store) => store.create_topic(description, difficulty).await,
            Self::InMemory(store) => store.create_topic(description, difficulty).await,
        }
    }
}

#[async_trait]
impl PracticeRepository for Database {
    async fn create_session(
        &self,
        session: &NewPracticeSession,
    ) -> anyhow::Result<PracticeSession> {
        match self {
            Self::Postgres(store) => store.create_session(session).await,
            Self::InMemory(store) => store.create_session(session).await,
        }
    }

    async fn get_session(&self, id: i64) -> anyhow::Result<Option<PracticeSession>> {
        match self {
            Self::Postgres(store) => store.get_session(id).await,
            Self::InMemory(store) => store.get_session(id).await,
        }
    }

    async fn list_sessions(&self, user_id: i64) -> anyhow::Result<Vec<PracticeSession>> {
        match self {
            Self::Postgres(store) => store.list_sessions(user_id).await,
            Self::InMemory(store) => store.list_sessions(user_id).await,
        }
    }

    async fn recent_sessions(
        &self,
        user_id: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<PracticeSession>> {
        match self {
            Self::Postgres(store) => store.recent_sessions(user_id, limit).await,
            Self::InMemory(store) => store.recent_sessions(user_id, limit).await,
        }
    }

    async fn update_reflection(
        &self,
        id: i64,
        update: &ReflectionUpdate,
    ) -> anyhow::Result<Option<PracticeSession>> {
        match self {
            Self::Postgres(store) => store.update_reflection(id, update).await,
            Self::InMemory(store) => store.update_reflection(id, update).await,
        }
    }
}

#[async_trait]
impl ReportRepository for Database {
    async fn upsert_report(&self, user_id: i64, body: &str) -> anyhow::Result<AiReport> {
        match self {
            Self::Postgres(store) => store.upsert_report(user_id, body).await,
            Self::InMemory(store) => store.upsert_report(user_id, body).await,
        }
    }

    async fn get_report(&self, user_id: i64) -> anyhow::Result<Option<AiReport>> {
        match self {
            Self::Postgres(store) => store.get_report(user_id).await,
            Self::InMemory(store) => store.get_report(user_id).await,
        }
    }
}

#[async_trait]
impl StatsRepository for Database {
    async fn count_sessions(&self, user_id: i64) -> anyhow::Result<i64> {
        match self {
            Self::Postgres(store) => store.count_sessions(user_id).await,
            Self::InMemory(store) => store.count_sessions(user_id).await,
        }
    }

    async fn average_duration(&self, user_id: i64) -> anyhow::Result<Option<f64>> {
        match self {
            Self::Postgres(store) => store.average_duration(user_id).await,
            Self::InMemory(store) => store.average_duration(user_id).await,
        }
    }

    async fn difficulty_counts(&self, user_id: i64) -> anyhow::Result<Vec<(Difficulty, i64)>> {
        match self {
            Self::Postgres(store) => store.difficulty_counts(user_id).await,
            Self::InMemory(store) => store.difficulty_counts(user_id).await,
        }
    }

    async fn practice_dates(&self, user_id: i64) -> anyhow::Result<Vec<NaiveDate>> {
        match self {
            Self::Postgres(store) => store.practice_dates(user_id).await,
            Self::InMemory(store) => store.practice_dates(user_id).await,
        }
    }

    async fn calendar_counts(&self, user_id: i64, days: i32) -> anyhow::Result<Vec<CalendarDay>> {
        match self {
            Self::Postgres(store) => store.calendar_counts(user_id, days).await,
            Self::InMemory(store) => store.calendar_counts(user_id, days).await,
        }
    }
}
