//! Per-item review state and the bookkeeping applied after each answer.

use super::leitner::{self, MAX_BOX, UNSCHEDULED};
use chrono::DateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewOutcome {
    Correct,
    Incorrect,
}

impl ReviewOutcome {
    pub fn from_correct(correct: bool) -> Self {
        if correct {
            ReviewOutcome::Correct
        } else {
            ReviewOutcome::Incorrect
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewState {
    pub item_id: i64,
    pub srs_box: i32,
    /// Epoch milliseconds, `0` while unscheduled.
    pub next_review_at: i64,
    pub review_count: u32,
    pub wrong_count: u32,
    pub mastered: bool,
}

impl ReviewState {
    pub fn new(item_id: i64) -> Self {
        Self {
            item_id,
            srs_box: 0,
            next_review_at: UNSCHEDULED,
            review_count: 0,
            wrong_count: 0,
            mastered: false,
        }
    }

    /// Returns the state after answering at `now`.
    ///
    /// A correct answer promotes the box and marks the item mastered. A wrong
    /// answer drops it to box 0, which is due again at `now`. Both count as a
    /// completed review.
    pub fn apply(&self, outcome: ReviewOutcome, now: i64) -> ReviewState {
        let mut next = self.clone();
        next.review_count = self.review_count.saturating_add(1);

        match outcome {
            ReviewOutcome::Correct => {
                next.srs_box = leitner::advance_box(self.srs_box);
                next.mastered = true;
            }
            ReviewOutcome::Incorrect => {
                next.srs_box = leitner::reset_box();
                next.wrong_count = self.wrong_count.saturating_add(1);
            }
        }

        next.next_review_at = leitner::next_review_timestamp(next.srs_box, now);
        next
    }

    /// Takes the item out of the box cycle. Counters are kept.
    pub fn reset(&self) -> ReviewState {
        ReviewState {
            srs_box: leitner::reset_box(),
            next_review_at: UNSCHEDULED,
            mastered: false,
            ..self.clone()
        }
    }

    /// Repairs values that cannot come out of the scheduler: a box outside the
    /// interval table or a negative due timestamp (replaced with `now`).
    pub fn sanitized(&self, now: i64) -> ReviewState {
        let mut state = self.clone();

        if !(0..=MAX_BOX).contains(&state.srs_box) {
            log::warn!(
                "item {} has out-of-range box {}, clamping",
                state.item_id,
                state.srs_box
            );
            state.srs_box = state.srs_box.clamp(0, MAX_BOX);
        }

        if state.next_review_at < UNSCHEDULED {
            log::warn!(
                "item {} has invalid due timestamp {}, falling back to {}",
                state.item_id,
                state.next_review_at,
                now
            );
            state.next_review_at = now;
        }

        state
    }

    pub fn is_due(&self, now: i64) -> bool {
        leitner::is_due(self.next_review_at, now)
    }

    pub fn days_until_due(&self, now: i64) -> i64 {
        leitner::days_until_due(self.next_review_at, now)
    }

    pub fn label(&self) -> &'static str {
        leitner::box_label(self.srs_box)
    }
}

/// Formats an epoch-millisecond timestamp as YYYY-MM-DD (UTC).
pub fn format_timestamp(millis: i64) -> String {
    if millis == UNSCHEDULED {
        return "-".to_string();
    }
    match DateTime::from_timestamp_millis(millis) {
        Some(datetime) => datetime.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}
