//! A learnable item: the prompt shown to the learner and its meaning.
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub term: String,
    pub meaning: String,
    /// Optional pronunciation hint shown with the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    /// Free-form grouping such as "initial", "word" or "sentence".
    #[serde(default = "default_category")]
    pub category: String,
    /// Added by the learner rather than shipped with a deck.
    #[serde(default)]
    pub is_custom: bool,
}

pub const DEFAULT_CATEGORY: &str = "general";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Item {
    pub fn new(term: &str, meaning: &str) -> Self {
        Self {
            term: term.to_string(),
            meaning: meaning.to_string(),
            pronunciation: None,
            category: default_category(),
            is_custom: false,
        }
    }

    /// Item entered by the learner.
    pub fn custom(term: &str, meaning: &str) -> Self {
        Self {
            is_custom: true,
            category: "custom".to_string(),
            ..Self::new(term, meaning)
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn with_pronunciation(mut self, pronunciation: &str) -> Self {
        self.pronunciation = Some(pronunciation.to_string());
        self
    }
}
