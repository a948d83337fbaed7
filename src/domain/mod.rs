//! Core domain models.
//!
//! These types are shared between the repository layer, the aggregation and
//! recommendation logic, and the HTTP API surface:
//!
//! - [`practice`]: practice sessions and reflection updates
//! - [`topic`]: generated drawing topics and the difficulty tiers
//! - [`report`]: the per-user AI progress report
//! - [`stats`]: aggregated statistics output

pub mod practice;
pub mod report;
pub mod stats;
pub mod topic;

pub use practice::{NewPracticeSession, PracticeSession, ReflectionUpdate};
pub use report::AiReport;
pub use stats::{CalendarDay, DifficultyDistribution, UserStatistics};
pub use topic::{Difficulty, GeneratedTopic, ParseDifficultyError, Topic};

/// Per-request user identity, threaded explicitly through every call.
///
/// There is no authentication layer; the context is resolved from the request
/// (falling back to the demo user) rather than read from a global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserContext {
    /// The acting user's id.
    pub user_id: i64,
}

impl UserContext {
    /// The seeded demo user, used when a request carries no identity.
    pub const DEMO_USER_ID: i64 = 1;

    /// Create a context for a specific user.
    #[must_use]
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }
}

impl Default for UserContext {
    fn default() -> Self {
        Self {
            user_id: Self::DEMO_USER_ID,
        }
    }
}
