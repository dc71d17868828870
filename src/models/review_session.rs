//! Review session management for Leitner practice.
//! Handles multi-round review of due and new items, recording every answer in
//! the store.

use super::{Item, LearningCard, ReviewOutcome, ReviewState};
use crate::database::db::{self, StoreError};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

/// Manages a review session with multiple rounds.
/// Items answered wrong drop to box 0, are due again immediately, and are
/// repeated in the next round.
pub struct ReviewSession {
    pub deck_name: String,
    pub all_cards: Vec<(LearningCard, ReviewState)>,
    pub current_round_cards: Vec<usize>,
    pub current_index: usize,
    pub show_answer: bool,
    /// Set once the current item has been answered; cleared when moving on.
    pub current_answered: bool,
    pub conn: Arc<Mutex<Connection>>,
    pub round_number: usize,
}

fn lock(conn: &Arc<Mutex<Connection>>) -> MutexGuard<'_, Connection> {
    conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ReviewSession {
    /// Creates a session from the deck's due items followed by up to
    /// `new_items_limit` never-reviewed items, using the store's clock.
    pub fn start(
        deck_name: &str,
        new_items_limit: usize,
        conn: Arc<Mutex<Connection>>,
    ) -> Result<Self, StoreError> {
        let cards = {
            let guard = lock(&conn);
            let now = db::get_current_time(&guard)?;
            let mut cards = db::get_due_items(Some(deck_name), now, &guard)?;
            cards.extend(db::get_new_items(deck_name, new_items_limit, &guard)?);
            cards
        };

        log::info!("Starting review of '{}' with {} items", deck_name, cards.len());
        Ok(Self::from_cards(deck_name.to_string(), cards, conn))
    }

    pub fn from_cards(
        deck_name: String,
        cards: Vec<(Item, ReviewState)>,
        conn: Arc<Mutex<Connection>>,
    ) -> Self {
        let all_cards: Vec<_> = cards
            .into_iter()
            .map(|(item, state)| (LearningCard::new(item), state))
            .collect();

        let indices: Vec<usize> = (0..all_cards.len()).collect();

        Self {
            deck_name,
            all_cards,
            current_round_cards: indices,
            current_index: 0,
            show_answer: false,
            current_answered: false,
            conn,
            round_number: 1,
        }
    }

    pub fn current_card(&self) -> Option<&LearningCard> {
        self.current_round_cards
            .get(self.current_index)
            .and_then(|&idx| self.all_cards.get(idx).map(|(card, _)| card))
    }

    pub fn current_state(&self) -> Option<&ReviewState> {
        self.current_round_cards
            .get(self.current_index)
            .and_then(|&idx| self.all_cards.get(idx).map(|(_, state)| state))
    }

    pub fn toggle_answer(&mut self) {
        self.show_answer = !self.show_answer;
    }

    pub fn next_card(&mut self) {
        if self.current_index + 1 < self.current_round_cards.len() {
            self.current_index += 1;
            self.show_answer = false;
            self.current_answered = false;
        } else {
            self.start_next_round();
        }
    }

    /// Starts a new round with the items answered wrong in this one.
    /// If none remain, the session is complete.
    fn start_next_round(&mut self) {
        let failed_indices: Vec<usize> = self
            .current_round_cards
            .iter()
            .copied()
            .filter(|&idx| {
                self.all_cards
                    .get(idx)
                    .map(|(card, _)| !card.is_learned)
                    .unwrap_or(false)
            })
            .collect();

        if !failed_indices.is_empty() {
            self.current_round_cards = failed_indices;
            self.current_index = 0;
            self.show_answer = false;
            self.current_answered = false;
            self.round_number += 1;
        }
    }

    /// Records the answer for the current item and returns its new state.
    ///
    /// Returns `None` without touching the store when there is no current item
    /// or it was already answered; call `next_card` to move on.
    pub fn answer_current(&mut self, correct: bool) -> Result<Option<ReviewState>, StoreError> {
        if self.current_answered {
            return Ok(None);
        }
        let Some(&actual_idx) = self.current_round_cards.get(self.current_index) else {
            return Ok(None);
        };
        let Some((card, review_state)) = self.all_cards.get_mut(actual_idx) else {
            return Ok(None);
        };

        let outcome = ReviewOutcome::from_correct(correct);
        let new_state = {
            let guard = lock(&self.conn);
            let now = db::get_current_time(&guard)?;
            db::record_review(review_state.item_id, outcome, now, &guard)?
        };

        card.record_answer(outcome == ReviewOutcome::Correct);
        *review_state = new_state.clone();
        self.current_answered = true;
        Ok(Some(new_state))
    }

    pub fn learned_count(&self) -> usize {
        self.current_round_cards
            .iter()
            .filter(|&&idx| {
                self.all_cards
                    .get(idx)
                    .map(|(card, _)| card.is_learned)
                    .unwrap_or(false)
            })
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.current_round_cards.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.learned_count()
    }

    /// Returns true when every item in the current round was answered correctly.
    pub fn is_completed(&self) -> bool {
        self.current_round_cards.is_empty() || self.learned_count() == self.total_count()
    }

    /// Items that needed more than one answer this session, with their attempt counts.
    pub fn struggled_items(&self) -> Vec<(&str, u32)> {
        self.all_cards
            .iter()
            .filter(|(card, _)| card.attempts > 1)
            .map(|(card, _)| (card.item.term.as_str(), card.attempts))
            .collect()
    }

    pub fn phase_message(&self) -> String {
        if self.round_number == 1 {
            format!("Round {}: {} items", self.round_number, self.total_count())
        } else {
            format!(
                "Round {} (Review): {} items to retry",
                self.round_number,
                self.total_count()
            )
        }
    }
}
