//! Deck is a named collection of items
use super::Item;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub items: Vec<Item>,
}
