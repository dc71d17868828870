pub mod deck;
pub mod deck_set;
pub mod item;
pub mod learning_card;
pub mod leitner;
pub mod review_session;
pub mod review_state;

pub use deck::Deck;
pub use deck_set::DeckSet;
pub use item::Item;
pub use learning_card::LearningCard;
pub use review_session::ReviewSession;
pub use review_state::{ReviewOutcome, ReviewState};
