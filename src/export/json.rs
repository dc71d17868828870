//! JSON import/export for decks and review progress.
//! Decks carry only content; progress snapshots carry the Leitner state of
//! every item so it can be restored into another store.

use crate::models::{Deck, ReviewState};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Epoch milliseconds when the snapshot was taken.
    pub exported_at: i64,
    pub states: Vec<ReviewState>,
}

fn write_pretty<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let json_string = serde_json::to_string_pretty(value)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    Ok(())
}

fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Exports a deck to a JSON file at the specified path.
pub fn export_json_to_path<P: AsRef<Path>>(deck: &Deck, path: P) -> Result<()> {
    write_pretty(deck, path)
}

/// Imports a deck from a JSON file.
pub fn import_json<P: AsRef<Path>>(path: P) -> Result<Deck> {
    let contents = read_to_string(path.as_ref())?;
    let deck: Deck = serde_json::from_str(&contents)?;

    log::info!(
        "Deck '{}' imported from '{}'",
        deck.name,
        path.as_ref().display()
    );
    Ok(deck)
}

pub fn export_progress_to_path<P: AsRef<Path>>(
    states: &[ReviewState],
    exported_at: i64,
    path: P,
) -> Result<()> {
    let snapshot = ProgressSnapshot {
        exported_at,
        states: states.to_vec(),
    };
    write_pretty(&snapshot, path)
}

/// Imports review progress. Every state is sanitized against `now`, so a
/// hand-edited file cannot put an out-of-range box or negative timestamp
/// into storage.
pub fn import_progress<P: AsRef<Path>>(path: P, now: i64) -> Result<Vec<ReviewState>> {
    let contents = read_to_string(path)?;
    let snapshot: ProgressSnapshot = serde_json::from_str(&contents)?;

    Ok(snapshot
        .states
        .iter()
        .map(|state| state.sanitized(now))
        .collect())
}
