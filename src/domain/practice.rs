//! Practice session records.

use serde::{Deserialize, Serialize};

use super::topic::Difficulty;

/// A recorded practice session: topic, timer duration, uploaded image, and
/// optional reflections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeSession {
    /// Unique session identifier.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Topic the user practiced (copied, not referenced - topics are
    /// regenerated freely and the session keeps its own snapshot).
    pub topic_description: String,
    /// Difficulty of the practiced topic.
    pub topic_difficulty: Difficulty,
    /// Opaque path/URL of the uploaded image.
    pub image_path: String,
    /// Timer duration in seconds; always positive.
    pub duration_seconds: i32,
    /// What went well.
    pub reflection_good: Option<String>,
    /// What was a struggle.
    pub reflection_struggled: Option<String>,
    /// What was learned.
    pub reflection_learned: Option<String>,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last update timestamp.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Input for creating a practice session.
#[derive(Debug, Clone)]
pub struct NewPracticeSession {
    /// Owning user.
    pub user_id: i64,
    /// Topic description snapshot.
    pub topic_description: String,
    /// Difficulty of the practiced topic.
    pub topic_difficulty: Difficulty,
    /// Stored image path/URL.
    pub image_path: String,
    /// Timer duration in seconds.
    pub duration_seconds: i32,
    /// What went well.
    pub reflection_good: Option<String>,
    /// What was a struggle.
    pub reflection_struggled: Option<String>,
    /// What was learned.
    pub reflection_learned: Option<String>,
}

/// Partial update of the three reflection fields.
///
/// Fields left as `None` keep their prior value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReflectionUpdate {
    /// What went well.
    pub reflection_good: Option<String>,
    /// What was a struggle.
    pub reflection_struggled: Option<String>,
    /// What was learned.
    pub reflection_learned: Option<String>,
}

impl ReflectionUpdate {
    /// True when no field is supplied; such an update is a validation error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reflection_good.is_none()
            && self.reflection_struggled.is_none()
            && self.reflection_learned.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflection_update_empty() {
        assert!(ReflectionUpdate::default().is_empty());

        let update = ReflectionUpdate {
            reflection_struggled: Some("proportions".to_string()),
            ..ReflectionUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
