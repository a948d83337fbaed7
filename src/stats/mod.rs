//! Statistics aggregation over recorded practice sessions.

use chrono::{Days, NaiveDate, Utc};

use crate::database::{Database, StatsRepository};
use crate::domain::{Difficulty, DifficultyDistribution, UserContext, UserStatistics};

/// Trailing window of the calendar heatmap, in days.
const CALENDAR_WINDOW_DAYS: i32 = 90;

/// Compute the statistics summary for a user.
///
/// Any storage error in the overview queries fails the whole request. The
/// calendar sub-query alone degrades to an empty sequence so a heatmap hiccup
/// does not take the overview fields down with it.
pub async fn user_statistics(
    db: &Database,
    user: UserContext,
) -> anyhow::Result<UserStatistics> {
    let total_practices = db.count_sessions(user.user_id).await?;

    let average_duration_seconds = db
        .average_duration(user.user_id)
        .await?
        .map_or(0, |avg| avg.round() as i64);

    let difficulty_distribution = distribution(db.difficulty_counts(user.user_id).await?);

    let dates = db.practice_dates(user.user_id).await?;
    let consecutive = consecutive_days(&dates, Utc::now().date_naive());

    let calendar_data = match db
        .calendar_counts(user.user_id, CALENDAR_WINDOW_DAYS)
        .await
    {
        Ok(days) => days,
        Err(error) => {
            tracing::warn!(error = %error, user_id = user.user_id, "Calendar query failed, returning empty heatmap");
            Vec::new()
        }
    };

    Ok(UserStatistics {
        total_practices,
        consecutive_days: consecutive,
        average_duration_seconds,
        difficulty_distribution,
        calendar_data,
    })
}

fn distribution(counts: Vec<(Difficulty, i64)>) -> DifficultyDistribution {
    let mut dist = DifficultyDistribution::default();
    for (difficulty, count) in counts {
        match difficulty {
            Difficulty::Beginner => dist.beginner = count,
            Difficulty::Intermediate => dist.intermediate = count,
            Difficulty::Advanced => dist.advanced = count,
        }
    }
    dist
}

/// Count consecutive days ending at `today` with at least one session.
///
/// `dates` must be distinct and sorted descending; the walk stops at the
/// first gap, and a missing `today` means the streak is 0.
fn consecutive_days(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut streak = 0;
    for (offset, date) in dates.iter().enumerate() {
        let expected = today - Days::new(offset as u64);
        if *date == expected {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_streak_zero_without_today() {
        let today = date(2025, 6, 10);
        assert_eq!(consecutive_days(&[], today), 0);
        // Practiced yesterday and the day before, but not today.
        let dates = [date(2025, 6, 9), date(2025, 6, 8)];
        assert_eq!(consecutive_days(&dates, today), 0);
    }

    #[test]
    fn test_streak_stops_at_first_gap() {
        let today = date(2025, 6, 10);
        // today, -1, -2 present; gap at -3; -4 present but unreachable.
        let dates = [
            date(2025, 6, 10),
            date(2025, 6, 9),
            date(2025, 6, 8),
            date(2025, 6, 6),
        ];
        assert_eq!(consecutive_days(&dates, today), 3);
    }

    #[test]
    fn test_streak_single_day() {
        let today = date(2025, 6, 10);
        assert_eq!(consecutive_days(&[today], today), 1);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let today = date(2025, 7, 1);
        let dates = [date(2025, 7, 1), date(2025, 6, 30), date(2025, 6, 29)];
        assert_eq!(consecutive_days(&dates, today), 3);
    }

    #[test]
    fn test_distribution_defaults_missing_tiers_to_zero() {
        let dist = distribution(vec![(Difficulty::Intermediate, 4)]);
        assert_eq!(dist.beginner, 0);
        assert_eq!(dist.intermediate, 4);
        assert_eq!(dist.advanced, 0);
        assert_eq!(dist.total(), 4);
    }

    #[tokio::test]
    async fn test_statistics_over_empty_store() {
        let db = Database::in_memory();
        let stats = user_statistics(&db, UserContext::default())
            .await
            .expect("stats");

        assert_eq!(stats.total_practices, 0);
        assert_eq!(stats.consecutive_days, 0);
        assert_eq!(stats.average_duration_seconds, 0);
        assert_eq!(stats.difficulty_distribution.total(), 0);
        assert!(stats.calendar_data.is_empty());
    }

    #[tokio::test]
    async fn test_statistics_average_is_rounded_mean() {
        use crate::database::PracticeRepository;
        use crate::domain::NewPracticeSession;

        let db = Database::in_memory();
        for duration in [300, 301] {
            let new = NewPracticeSession {
                user_id: 1,
                topic_description: "quick gesture study".to_string(),
                topic_difficulty: Difficulty::Beginner,
                image_path: "/uploads/practice-a.png".to_string(),
                duration_seconds: duration,
                reflection_good: None,
                reflection_struggled: None,
                reflection_learned: None,
            };
            db.create_session(&new).await.expect("create");
        }

        let stats = user_statistics(&db, UserContext::default())
            .await
            .expect("stats");
        // mean of 300 and 301 is 300.5, rounds away from zero.
        assert_eq!(stats.average_duration_seconds, 301);
        assert_eq!(stats.total_practices, 2);
        assert_eq!(
            stats.difficulty_distribution.total(),
            stats.total_practices
        );
    }
}
