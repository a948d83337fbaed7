//! PostgreSQL backend over a pooled `sqlx` connection.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::config::DatabaseConfig;
use crate::domain::{
    AiReport, CalendarDay, Difficulty, NewPracticeSession, PracticeSession, ReflectionUpdate,
    Topic,
};

use super::repository::{
    PracticeRepository, ReportRepository, StatsRepository, TopicRepository,
};
use super::schema::{POSTGRES_SCHEMA, SEED_DEMO_USER};

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect, apply the schema, and seed the demo user.
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let url = config.connection_string()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&url)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> anyhow::Result<()> {
        sqlx::raw_sql(POSTGRES_SCHEMA).execute(&self.pool).await?;
        sqlx::raw_sql(SEED_DEMO_USER).execute(&self.pool).await?;
        Ok(())
    }

    /// Round-trip connectivity probe.
    pub async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn topic_from_row(row: &PgRow) -> anyhow::Result<Topic> {
    let difficulty: String = row.try_get("difficulty")?;
    Ok(Topic {
        id: row.try_get("id")?,
        description: row.try_get("description")?,
        difficulty: difficulty.parse()?,
        created_at: row.try_get("created_at")?,
    })
}

fn session_from_row(row: &PgRow) -> anyhow::Result<PracticeSession> {
    let difficulty: String = row.try_get("topic_difficulty")?;
    Ok(PracticeSession {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        topic_description: row.try_get("topic_description")?,
        topic_difficulty: difficulty.parse()?,
        image_path: row.try_get("image_path")?,
        duration_seconds: row.try_get("duration_seconds")?,
        reflection_good: row.try_get("reflection_good")?,
        reflection_struggled: row.try_get("reflection_struggled")?,
        reflection_learned: row.try_get("reflection_learned")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn report_from_row(row: &PgRow) -> anyhow::Result<AiReport> {
    Ok(AiReport {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        overall_assessment: row.try_get("overall_assessment")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl TopicRepository for PostgresStore {
    async fn create_topic(
        &self,
        description: &str,
        difficulty: Difficulty,
    ) -> anyhow::Result<Topic> {
        let row = sqlx::query(
            "INSERT INTO topics (description, difficulty)
             VALUES ($1, $2)
             RETURNING id, description, difficulty, created_at",
        )
        .bind(description)
        .bind(difficulty.as_str())
        .fetch_one(&self.pool)
        .await?;
        topic_from_row(&row)
    }
}

#[async_trait]
impl PracticeRepository for PostgresStore {
    async fn create_session(
        &self,
        session: &NewPracticeSession,
    ) -> anyhow::Result<PracticeSession> {
        let row = sqlx::query(
            "INSERT INTO practice_sessions
               (user_id, topic_description, topic_difficulty, image_path, duration_seconds,
                reflection_good, reflection_struggled, reflection_learned)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(session.user_id)
        .bind(&session.topic_description)
        .bind(session.topic_difficulty.as_str())
        .bind(&session.image_path)
        .bind(session.duration_seconds)
        .bind(&session.reflection_good)
        .bind(&session.reflection_struggled)
        .bind(&session.reflection_learned)
        .fetch_one(&self.pool)
        .await?;
        session_from_row(&row)
    }

    async fn get_session(&self, id: i64) -> anyhow::Result<Option<PracticeSession>> {
        let row = sqlx::query("SELECT * FROM practice_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(session_from_row).transpose()
    }

    async fn list_sessions(&self, user_id: i64) -> anyhow::Result<Vec<PracticeSession>> {
        let rows = sqlx::query(
            "SELECT * FROM practice_sessions
             WHERE user_id = $1
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(session_from_row).collect()
    }

    async fn recent_sessions(
        &self,
        user_id: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<PracticeSession>> {
        let rows = sqlx::query(
            "SELECT * FROM practice_sessions
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(session_from_row).collect()
    }

    async fn update_reflection(
        &self,
        id: i64,
        update: &ReflectionUpdate,
    ) -> anyhow::Result<Option<PracticeSession>> {
        let row = sqlx::query(
            "UPDATE practice_sessions
             SET reflection_good      = COALESCE($1, reflection_good),
                 reflection_struggled = COALESCE($2, reflection_struggled),
                 reflection_learned   = COALESCE($3, reflection_learned),
                 updated_at = now()
             WHERE id = $4
             RETURNING *",
        )
        .bind(&update.reflection_good)
        .bind(&update.reflection_struggled)
        .bind(&update.reflection_learned)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(session_from_row).transpose()
    }
}

#[async_trait]
impl ReportRepository for PostgresStore {
    async fn upsert_report(&self, user_id: i64, body: &str) -> anyhow::Result<AiReport> {
        // Single conditional upsert on the unique user constraint; concurrent
        // regenerations race to last-write-wins, never to a duplicate row.
        let row = sqlx::query(
            "INSERT INTO ai_reports (user_id, overall_assessment)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE
               SET overall_assessment = EXCLUDED.overall_assessment,
                   updated_at = now()
             RETURNING *",
        )
        .bind(user_id)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;
        report_from_row(&row)
    }

    async fn get_report(&self, user_id: i64) -> anyhow::Result<Option<AiReport>> {
        let row = sqlx::query("SELECT * FROM ai_reports WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(report_from_row).transpose()
    }
}

#[async_trait]
impl StatsRepository for PostgresStore {
    async fn count_sessions(&self, user_id: i64) -> anyhow::Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM practice_sessions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    async fn average_duration(&self, user_id: i64) -> anyhow::Result<Option<f64>> {
        let row = sqlx::query(
            "SELECT AVG(duration_seconds)::float8 AS avg
             FROM practice_sessions
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("avg")?)
    }

    async fn difficulty_counts(&self, user_id: i64) -> anyhow::Result<Vec<(Difficulty, i64)>> {
        let rows = sqlx::query(
            "SELECT topic_difficulty, COUNT(*) AS count
             FROM practice_sessions
             WHERE user_id = $1
             GROUP BY topic_difficulty",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let difficulty: String = row.try_get("topic_difficulty")?;
                let count: i64 = row.try_get("count")?;
                Ok((difficulty.parse::<Difficulty>()?, count))
            })
            .collect()
    }

    async fn practice_dates(&self, user_id: i64) -> anyhow::Result<Vec<NaiveDate>> {
        let rows = sqlx::query(
            "SELECT (created_at AT TIME ZONE 'UTC')::date AS practice_date
             FROM practice_sessions
             WHERE user_id = $1
             GROUP BY practice_date
             ORDER BY practice_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Ok(row.try_get("practice_date")?))
            .collect()
    }

    async fn calendar_counts(&self, user_id: i64, days: i32) -> anyhow::Result<Vec<CalendarDay>> {
        let rows = sqlx::query(
            "SELECT (created_at AT TIME ZONE 'UTC')::date AS practice_date, COUNT(*) AS count
             FROM practice_sessions
             WHERE user_id = $1
               AND created_at >= CURRENT_DATE - make_interval(days => $2)
             GROUP BY practice_date
             ORDER BY practice_date ASC",
        )
        .bind(user_id)
        .bind(days)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(CalendarDay {
                    date: row.try_get("practice_date")?,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }
}
