//! Drawing topics and difficulty tiers.

use serde::{Deserialize, Serialize};

/// Difficulty tier of a topic or practice session.
///
/// This is a closed three-value enum; anything else coming from storage or an
/// LLM response is a decoding error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Frontal or side static poses, simple motion.
    Beginner,
    /// Angled views, moderately complex motion, held props.
    Intermediate,
    /// Extreme angles, complex or fast motion, combined elements.
    Advanced,
}

impl Difficulty {
    /// All tiers, in ascending order.
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Canonical lowercase form, as stored in the database.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the three difficulty tiers.
#[derive(Debug, thiserror::Error)]
#[error("unknown difficulty: {0:?}")]
pub struct ParseDifficultyError(pub String);

impl std::str::FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(ParseDifficultyError(other.to_string())),
        }
    }
}

/// A persisted drawing topic.
///
/// Topics are immutable once created and are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// Unique topic identifier.
    pub id: i64,
    /// Pose/composition description shown to the user.
    pub description: String,
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A topic as produced by the LLM, before persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedTopic {
    /// Pose/composition description.
    pub description: String,
    /// Difficulty tier.
    pub difficulty: Difficulty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_round_trip() {
        for tier in Difficulty::ALL {
            let parsed: Difficulty = tier.as_str().parse().expect("canonical form parses");
            assert_eq!(parsed, tier);
        }
    }

    #[test]
    fn test_difficulty_rejects_unknown() {
        assert!("expert".parse::<Difficulty>().is_err());
        assert!("Beginner".parse::<Difficulty>().is_err());
        assert!("".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_difficulty_serde_lowercase() {
        let json = serde_json::to_string(&Difficulty::Intermediate).expect("serialize");
        assert_eq!(json, "\"intermediate\"");
        let back: Difficulty = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Difficulty::Intermediate);
    }
}
