pub mod config;
pub mod database;
pub mod export;
pub mod models;

pub use config::AppConfig;
pub use models::leitner::{
    advance_box, box_label, days_until_due, is_due, next_review_timestamp, reset_box,
};
pub use models::{Deck, DeckSet, Item, LearningCard, ReviewOutcome, ReviewSession, ReviewState};
