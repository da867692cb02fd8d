pub mod equipment;
pub mod players;

use chrono::NaiveDateTime;

use crate::database::models::EquipmentUsage;

pub use equipment::{equipment_stats, rank_equipment};
pub use players::{player_stats, rank_players};

/// Whether a match played at `match_date` falls inside a usage interval.
///
/// Both ends are inclusive. An open usage runs until `now`; a usage that
/// ends before it starts never matches.
pub fn is_within_usage(usage: &EquipmentUsage, match_date: NaiveDateTime, now: NaiveDateTime) -> bool {
    let effective_end = usage.end_date.unwrap_or(now);
    usage.start_date <= match_date && match_date <= effective_end
}

/// Stable sort by points descending, then keep the first `limit`
fn rank_by_points<T>(mut entries: Vec<T>, limit: usize, points: impl Fn(&T) -> u64) -> Vec<T> {
    entries.sort_by(|a, b| points(b).cmp(&points(a)));
    entries.truncate(limit);
    entries
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_boundaries_are_inclusive() {
        let now = day(2024, 6, 1);
        let closed = usage(1, 1, day(2024, 1, 1), Some(day(2024, 3, 1)));

        assert!(is_within_usage(&closed, day(2024, 1, 1), now));
        assert!(is_within_usage(&closed, day(2024, 3, 1), now));
        assert!(!is_within_usage(&closed, day(2023, 12, 31), now));
        assert!(!is_within_usage(&closed, day(2024, 3, 1) + Duration::seconds(1), now));
    }

    #[test]
    fn test_open_usage_runs_until_now() {
        let now = day(2024, 6, 1);
        let open = usage(1, 1, day(2024, 1, 1), None);

        assert!(is_within_usage(&open, now, now));
        assert!(!is_within_usage(&open, now + Duration::days(1), now));
    }

    #[test]
    fn test_inverted_interval_never_matches() {
        let now = day(2024, 6, 1);
        let inverted = usage(1, 1, day(2024, 3, 1), Some(day(2024, 1, 1)));

        for date in [day(2024, 1, 1), day(2024, 2, 1), day(2024, 3, 1)] {
            assert!(!is_within_usage(&inverted, date, now));
        }
    }

    #[test]
    fn test_rank_keeps_input_order_for_ties() {
        let ranked = rank_by_points(vec![("a", 50), ("b", 90), ("c", 90), ("d", 100)], 3, |e| e.1);
        assert_eq!(ranked, vec![("d", 100), ("b", 90), ("c", 90)]);
    }
}
