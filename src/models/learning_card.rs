//! Wrapper for items that tracks progress within one review session.
use super::Item;

#[derive(Clone, Debug)]
pub struct LearningCard {
    pub item: Item,
    pub is_learned: bool,
    /// Answers given for this item in the session, across all rounds.
    pub attempts: u32,
}

impl LearningCard {
    pub fn new(item: Item) -> Self {
        Self {
            item,
            is_learned: false,
            attempts: 0,
        }
    }

    pub fn record_answer(&mut self, correct: bool) {
        self.attempts += 1;
        self.is_learned = correct;
    }
}
