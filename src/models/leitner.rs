//! Leitner box scheduler.
//!
//! Every item lives in one of six boxes. A correct answer moves it one box up
//! (saturating at the last box), a wrong answer sends it back to box 0:
//! - Box 0: new or answered wrong, due again immediately
//! - Box 1: 1 day
//! - Box 2: 3 days
//! - Box 3: 1 week
//! - Box 4: 2 weeks
//! - Box 5: 1 month
//!
//! All functions are pure. Time is passed in as epoch milliseconds and a due
//! timestamp of `0` means the item has not been scheduled yet.

/// Days until the next review, indexed by box number.
pub const BOX_INTERVALS_DAYS: [i64; 6] = [0, 1, 3, 7, 14, 30];

/// Highest valid box index.
pub const MAX_BOX: i32 = BOX_INTERVALS_DAYS.len() as i32 - 1;

pub const MILLISECONDS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Timestamp sentinel for an item that has not entered the box cycle.
pub const UNSCHEDULED: i64 = 0;

fn clamp_box(srs_box: i32) -> usize {
    srs_box.clamp(0, MAX_BOX) as usize
}

/// Computes when an item in `srs_box` becomes due, counted from `now`.
///
/// Out-of-range boxes are clamped, so a corrupted box from storage still
/// schedules with the nearest valid interval.
pub fn next_review_timestamp(srs_box: i32, now: i64) -> i64 {
    let days_until_review = BOX_INTERVALS_DAYS[clamp_box(srs_box)];
    now.saturating_add(days_until_review * MILLISECONDS_PER_DAY)
}

/// Box after a correct answer.
pub fn advance_box(current_box: i32) -> i32 {
    current_box.saturating_add(1).min(MAX_BOX)
}

/// Box after a wrong answer.
pub fn reset_box() -> i32 {
    0
}

/// An item is due once its scheduled instant has been reached.
/// Unscheduled items are never due; they go through the new-items queue.
pub fn is_due(due_at: i64, now: i64) -> bool {
    due_at > UNSCHEDULED && now >= due_at
}

pub fn box_label(srs_box: i32) -> &'static str {
    match srs_box {
        0 => "New / review today",
        1 => "Review tomorrow",
        2 => "Review in 3 days",
        3 => "Review in a week",
        4 => "Review in 2 weeks",
        5 => "Mastered! Review in a month",
        _ => "Review",
    }
}

/// Whole days left until `due_at`, never negative.
pub fn days_until_due(due_at: i64, now: i64) -> i64 {
    if due_at == UNSCHEDULED {
        return 0;
    }
    due_at
        .saturating_sub(now)
        .div_euclid(MILLISECONDS_PER_DAY)
        .max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000_000;

    #[test]
    fn test_next_review_uses_interval_table() {
        assert_eq!(next_review_timestamp(0, T0), T0);
        assert_eq!(next_review_timestamp(1, T0), T0 + MILLISECONDS_PER_DAY);
        assert_eq!(next_review_timestamp(2, T0), T0 + 3 * MILLISECONDS_PER_DAY);
        assert_eq!(next_review_timestamp(3, T0), T0 + 7 * MILLISECONDS_PER_DAY);
        assert_eq!(next_review_timestamp(4, T0), T0 + 14 * MILLISECONDS_PER_DAY);
        assert_eq!(next_review_timestamp(5, T0), T0 + 30 * MILLISECONDS_PER_DAY);
    }

    #[test]
    fn test_next_review_clamps_any_box() {
        let allowed: Vec<i64> = BOX_INTERVALS_DAYS
            .iter()
            .map(|days| T0 + days * MILLISECONDS_PER_DAY)
            .collect();

        for srs_box in (-50..50).chain([i32::MIN, i32::MAX]) {
            assert!(allowed.contains(&next_review_timestamp(srs_box, T0)));
        }
        assert_eq!(next_review_timestamp(-3, T0), T0);
        assert_eq!(
            next_review_timestamp(99, T0),
            T0 + 30 * MILLISECONDS_PER_DAY
        );
    }

    #[test]
    fn test_next_review_saturates() {
        assert_eq!(next_review_timestamp(5, i64::MAX), i64::MAX);
    }

    #[test]
    fn test_advance_box() {
        assert_eq!(advance_box(0), 1);
        assert_eq!(advance_box(4), 5);
        assert_eq!(advance_box(5), 5);
        assert_eq!(advance_box(i32::MAX), MAX_BOX);
    }

    #[test]
    fn test_reset_box_is_constant() {
        for _ in 0..3 {
            assert_eq!(reset_box(), 0);
        }
    }

    #[test]
    fn test_unscheduled_is_never_due() {
        for now in [i64::MIN, -1, 0, 1, T0, i64::MAX] {
            assert!(!is_due(UNSCHEDULED, now));
        }
    }

    #[test]
    fn test_is_due_is_monotonic() {
        let due_at = T0 + MILLISECONDS_PER_DAY;
        assert!(!is_due(due_at, due_at - 1));
        assert!(is_due(due_at, due_at));

        for delta in [0, 1, MILLISECONDS_PER_DAY, 365 * MILLISECONDS_PER_DAY] {
            assert!(is_due(due_at, due_at + delta));
        }
    }

    #[test]
    fn test_days_until_due() {
        assert_eq!(days_until_due(UNSCHEDULED, T0), 0);
        assert_eq!(days_until_due(T0 + 3 * MILLISECONDS_PER_DAY, T0), 3);
        // partial days round down
        assert_eq!(days_until_due(T0 + MILLISECONDS_PER_DAY - 1, T0), 0);
        assert_eq!(days_until_due(T0 - 5 * MILLISECONDS_PER_DAY, T0), 0);
    }

    #[test]
    fn test_days_until_due_never_negative() {
        for due_at in [i64::MIN, -1, 1, T0, i64::MAX] {
            for now in [i64::MIN, 0, T0, i64::MAX] {
                assert!(days_until_due(due_at, now) >= 0);
            }
        }
    }

    #[test]
    fn test_label_independent_of_clamping() {
        assert_eq!(box_label(5), "Mastered! Review in a month");
        assert_eq!(box_label(99), "Review");
        assert_eq!(box_label(-1), "Review");
        assert_eq!(
            next_review_timestamp(99, T0),
            next_review_timestamp(5, T0)
        );
    }
}
