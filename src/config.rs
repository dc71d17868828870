//! Application settings: where the store lives and how many new items a
//! session may introduce. Defaults can be overridden from a JSON file or
//! from `LEITNER_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

pub const DB_PATH_VAR: &str = "LEITNER_DB_PATH";
pub const NEW_ITEMS_VAR: &str = "LEITNER_NEW_ITEMS";
pub const CONFIG_PATH_VAR: &str = "LEITNER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "flashcards.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub new_items_per_session: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("flashcards.sqlite3"),
            new_items_per_session: 20,
        }
    }
}

impl AppConfig {
    /// Reads settings from a JSON file; missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Settings for the binary: the file named by `LEITNER_CONFIG` (or
    /// `flashcards.json` when present), then environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    pub fn resolve<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match lookup(CONFIG_PATH_VAR) {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::load(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(lookup))
    }

    /// Applies overrides from `lookup`. Unparseable values are logged and skipped.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(DB_PATH_VAR) {
            self.database_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(NEW_ITEMS_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(limit) => self.new_items_per_session = limit,
                Err(err) => log::warn!("Ignoring {}='{}': {}", NEW_ITEMS_VAR, raw, err),
            }
        }

        self
    }
}
