//! In-memory store for testing.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;

use crate::domain::{
    AiReport, CalendarDay, Difficulty, NewPracticeSession, PracticeSession, ReflectionUpdate,
    Topic,
};

use super::repository::{
    PracticeRepository, ReportRepository, StatsRepository, TopicRepository,
};

/// In-memory store mirroring the PostgreSQL backend's semantics.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    topics: Arc<RwLock<Vec<Topic>>>,
    sessions: Arc<RwLock<Vec<PracticeSession>>>,
    reports: Arc<RwLock<HashMap<i64, AiReport>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: Arc::new(AtomicI64::new(1)),
            ..Self::default()
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Insert a session with an explicit creation timestamp.
    ///
    /// Test hook for exercising streak and calendar behavior at fixed dates.
    pub fn insert_session_at(
        &self,
        session: &NewPracticeSession,
        created_at: chrono::DateTime<Utc>,
    ) -> PracticeSession {
        let stored = PracticeSession {
            id: self.allocate_id(),
            user_id: session.user_id,
            topic_description: session.topic_description.clone(),
            topic_difficulty: session.topic_difficulty,
            image_path: session.image_path.clone(),
            duration_seconds: session.duration_seconds,
            reflection_good: session.reflection_good.clone(),
            reflection_struggled: session.reflection_struggled.clone(),
            reflection_learned: session.reflection_learned.clone(),
            created_at,
            updated_at: created_at,
        };
        self.sessions.write().push(stored.clone());
        stored
    }
}

#[async_trait]
impl TopicRepository for InMemoryStore {
    async fn create_topic(
        &self,
        description: &str,
        difficulty: Difficulty,
    ) -> anyhow::Result<Topic> {
        let topic = Topic {
            id: self.allocate_id(),
            description: description.to_string(),
            difficulty,
            created_at: Utc::now(),
        };
        self.topics.write().push(topic.clone());
        Ok(topic)
    }
}

#[async_trait]
impl PracticeRepository for InMemoryStore {
    async fn create_session(
        &self,
        session: &NewPracticeSession,
    ) -> anyhow::Result<PracticeSession> {
        Ok(self.insert_session_at(session, Utc::now()))
    }

    async fn get_session(&self, id: i64) -> anyhow::Result<Option<PracticeSession>> {
        let sessions = self.sessions.read();
        Ok(sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn list_sessions(&self, user_id: i64) -> anyhow::Result<Vec<PracticeSession>> {
        let sessions = self.sessions.read();
        let mut filtered: Vec<_> = sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(filtered)
    }

    async fn recent_sessions(
        &self,
        user_id: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<PracticeSession>> {
        let mut sessions = self.list_sessions(user_id).await?;
        sessions.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(sessions)
    }

    async fn update_reflection(
        &self,
        id: i64,
        update: &ReflectionUpdate,
    ) -> anyhow::Result<Option<PracticeSession>> {
        let mut sessions = self.sessions.write();
        let Some(session) = sessions.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        if let Some(ref good) = update.reflection_good {
            session.reflection_good = Some(good.clone());
        }
        if let Some(ref struggled) = update.reflection_struggled {
            session.reflection_struggled = Some(struggled.clone());
        }
        if let Some(ref learned) = update.reflection_learned {
            session.reflection_learned = Some(learned.clone());
        }
        session.updated_at = Utc::now();
        Ok(Some(session.clone()))
    }
}

#[async_trait]
impl ReportRepository for InMemoryStore {
    async fn upsert_report(&self, user_id: i64, body: &str) -> anyhow::Result<AiReport> {
        let mut reports = self.reports.write();
        let now = Utc::now();
        let report = match reports.get(&user_id) {
            Some(existing) => AiReport {
                overall_assessment: body.to_string(),
                updated_at: now,
                ..existing.clone()
            },
            None => AiReport {
                id: self.allocate_id(),
                user_id,
                overall_assessment: body.to_string(),
                created_at: now,
                updated_at: now,
            },
        };
        reports.insert(user_id, report.clone());
        Ok(report)
    }

    async fn get_report(&self, user_id: i64) -> anyhow::Result<Option<AiReport>> {
        Ok(self.reports.read().get(&user_id).cloned())
    }
}

#[async_trait]
impl StatsRepository for InMemoryStore {
    async fn count_sessions(&self, user_id: i64) -> anyhow::Result<i64> {
        let sessions = self.sessions.read();
        Ok(sessions.iter().filter(|s| s.user_id == user_id).count() as i64)
    }

    async fn average_duration(&self, user_id: i64) -> anyhow::Result<Option<f64>> {
        let sessions = self.sessions.read();
        let durations: Vec<f64> = sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| f64::from(s.duration_seconds))
            .collect();
        if durations.is_empty() {
            return Ok(None);
        }
        Ok(Some(durations.iter().sum::<f64>() / durations.len() as f64))
    }

    async fn difficulty_counts(&self, user_id: i64) -> anyhow::Result<Vec<(Difficulty, i64)>> {
        let sessions = self.sessions.read();
        let mut counts: HashMap<Difficulty, i64> = HashMap::new();
        for session in sessions.iter().filter(|s| s.user_id == user_id) {
            *counts.entry(session.topic_difficulty).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn practice_dates(&self, user_id: i64) -> anyhow::Result<Vec<NaiveDate>> {
        let sessions = self.sessions.read();
        let mut dates: Vec<NaiveDate> = sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.created_at.date_naive())
            .collect();
        dates.sort_unstable();
        dates.dedup();
        dates.reverse();
        Ok(dates)
    }

    async fn calendar_counts(&self, user_id: i64, days: i32) -> anyhow::Result<Vec<CalendarDay>> {
        let window_start = Utc::now().date_naive() - chrono::Days::new(days.max(0) as u64);
        let sessions = self.sessions.read();
        let mut counts: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for session in sessions.iter().filter(|s| s.user_id == user_id) {
            let date = session.created_at.date_naive();
            if date >= window_start {
                *counts.entry(date).or_default() += 1;
            }
        }
        Ok(counts
            .into_iter()
            .map(|(date, count)| CalendarDay { date, count })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_session(user_id: i64, difficulty: Difficulty, duration: i32) -> NewPracticeSession {
        NewPracticeSession {
            user_id,
            topic_description: "reading a book on a park bench".to_string(),
            topic_difficulty: difficulty,
            image_path: "/uploads/practice-test.png".to_string(),
            duration_seconds: duration,
            reflection_good: Some("line confidence".to_string()),
            reflection_struggled: Some("hands".to_string()),
            reflection_learned: Some("measure first".to_string()),
        }
    }

    #[tokio::test]
    async fn test_partial_reflection_update_keeps_other_fields() {
        let store = InMemoryStore::new();
        let session = store
            .create_session(&new_session(1, Difficulty::Beginner, 600))
            .await
            .expect("create");

        let update = ReflectionUpdate {
            reflection_good: Some("better proportions".to_string()),
            ..ReflectionUpdate::default()
        };
        let updated = store
            .update_reflection(session.id, &update)
            .await
            .expect("update")
            .expect("session exists");

        assert_eq!(updated.reflection_good.as_deref(), Some("better proportions"));
        assert_eq!(updated.reflection_struggled.as_deref(), Some("hands"));
        assert_eq!(updated.reflection_learned.as_deref(), Some("measure first"));
    }

    #[tokio::test]
    async fn test_update_reflection_missing_session() {
        let store = InMemoryStore::new();
        let update = ReflectionUpdate {
            reflection_good: Some("anything".to_string()),
            ..ReflectionUpdate::default()
        };
        let result = store.update_reflection(99, &update).await.expect("update");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_upsert_report_keeps_single_row() {
        let store = InMemoryStore::new();
        let first = store.upsert_report(1, "first body").await.expect("insert");
        let second = store.upsert_report(1, "second body").await.expect("update");

        assert_eq!(first.id, second.id);
        assert_eq!(second.overall_assessment, "second body");
        assert_eq!(
            store
                .get_report(1)
                .await
                .expect("get")
                .expect("exists")
                .overall_assessment,
            "second body"
        );
    }

    #[tokio::test]
    async fn test_difficulty_counts_sum_to_total() {
        let store = InMemoryStore::new();
        for difficulty in [
            Difficulty::Beginner,
            Difficulty::Beginner,
            Difficulty::Advanced,
        ] {
            store
                .create_session(&new_session(1, difficulty, 300))
                .await
                .expect("create");
        }

        let total = store.count_sessions(1).await.expect("count");
        let counts = store.difficulty_counts(1).await.expect("counts");
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<i64>(), total);
    }
}
