//! Aggregated statistics output.

use serde::{Deserialize, Serialize};

/// Statistics summary for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatistics {
    /// Total number of recorded practice sessions.
    pub total_practices: i64,
    /// Consecutive calendar days, ending today, with at least one session.
    pub consecutive_days: u32,
    /// Rounded mean of session durations; 0 when there are no sessions.
    pub average_duration_seconds: i64,
    /// Session counts grouped by difficulty tier.
    pub difficulty_distribution: DifficultyDistribution,
    /// Sparse per-day counts over the trailing 90 days, ascending by date.
    pub calendar_data: Vec<CalendarDay>,
}

/// Session counts per difficulty tier; tiers without sessions are 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DifficultyDistribution {
    /// Beginner session count.
    pub beginner: i64,
    /// Intermediate session count.
    pub intermediate: i64,
    /// Advanced session count.
    pub advanced: i64,
}

impl DifficultyDistribution {
    /// Sum across all tiers; equals `total_practices` by construction.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.beginner + self.intermediate + self.advanced
    }
}

/// One day of the calendar heatmap. Days without sessions are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Calendar date (UTC day granularity).
    pub date: chrono::NaiveDate,
    /// Number of sessions created on that date.
    pub count: i64,
}
