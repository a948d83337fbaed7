//! The per-user AI progress report.

use serde::{Deserialize, Serialize};

/// The single latest progress report for a user.
///
/// At most one row exists per user; regeneration overwrites it in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiReport {
    /// Unique report identifier.
    pub id: i64,
    /// Owning user (unique).
    pub user_id: i64,
    /// Full report body as returned by the LLM, stored opaquely.
    pub overall_assessment: String,
    /// First generation timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last regeneration timestamp.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
