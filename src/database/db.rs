//! Database operations for the flashcard store
//!
//! Persists decks, items and their Leitner review state in SQLite, and keeps a
//! simulated clock so review intervals can be exercised day by day. Scheduling
//! decisions are delegated to `models::leitner`; this layer only reads the
//! current state, applies an answer and writes the result back.

use crate::models::{Deck, DeckSet, Item, ReviewOutcome, ReviewState};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use thiserror::Error;

use crate::models::leitner::{MAX_BOX, MILLISECONDS_PER_DAY};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Item not found: {0}")]
    ItemNotFound(i64),
}

pub type Result<T> = std::result::Result<T, StoreError>;

const ITEM_COLUMNS: &str = "term, meaning, pronunciation, category, is_custom";
const ITEM_COLUMN_COUNT: usize = 5;
const REVIEW_COLUMNS: &str = "id, srs_box, next_review_at, review_count, wrong_count, mastered";

/// Opens (or creates) the database file and makes sure all tables exist.
pub fn init_database<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path.as_ref())?;
    create_tables(&conn)?;
    log::info!("Opened flashcard database at {}", path.as_ref().display());
    Ok(conn)
}

/// Creates tables for decks, items with their review state, and app state.
/// Sets the simulated clock to now if not already initialized.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS decks (
            name TEXT PRIMARY KEY
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            deck_name TEXT NOT NULL,
            term TEXT NOT NULL,
            meaning TEXT NOT NULL,
            pronunciation TEXT,
            category TEXT NOT NULL DEFAULT 'general',
            is_custom INTEGER NOT NULL DEFAULT 0,
            srs_box INTEGER NOT NULL DEFAULT 0,
            next_review_at INTEGER NOT NULL DEFAULT 0,
            review_count INTEGER NOT NULL DEFAULT 0,
            wrong_count INTEGER NOT NULL DEFAULT 0,
            mastered INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (deck_name) REFERENCES decks(name),
            UNIQUE(deck_name, term)
        )",
        (),
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_items_next_review ON items(next_review_at)",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_time', ?1)",
        params![Utc::now().timestamp_millis().to_string()],
    )?;

    Ok(())
}

/// Retrieves the simulated current time (epoch milliseconds).
///
/// A corrupted value falls back to the wall clock.
pub fn get_current_time(conn: &Connection) -> Result<i64> {
    let value: String = conn.query_row(
        "SELECT value FROM app_state WHERE key = 'current_time'",
        [],
        |row| row.get(0),
    )?;

    match value.parse::<i64>() {
        Ok(millis) if millis >= 0 => Ok(millis),
        _ => {
            let now = Utc::now().timestamp_millis();
            log::warn!("Stored clock value '{}' is invalid, using {}", value, now);
            Ok(now)
        }
    }
}

pub fn set_current_time(millis: i64, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO app_state (key, value) VALUES ('current_time', ?1)",
        params![millis.to_string()],
    )?;
    Ok(())
}

/// Advances the simulated clock by 24 hours (for exercising review intervals)
pub fn advance_day(conn: &Connection) -> Result<i64> {
    let next_day = get_current_time(conn)?.saturating_add(MILLISECONDS_PER_DAY);
    set_current_time(next_day, conn)?;
    log::debug!("Advanced simulated clock to {}", next_day);
    Ok(next_day)
}

pub fn new_deck(name: &str, conn: &Connection) -> Result<()> {
    conn.execute("INSERT INTO decks (name) VALUES (?1)", params![name])?;
    log::info!("Deck '{}' created", name);
    Ok(())
}

/// Adds an item to a deck with a fresh, unscheduled review state
///
/// Returns the item ID. If the item already exists (same deck + term),
/// the existing row and its progress are kept.
pub fn add_item(deck_name: &str, item: &Item, conn: &Connection) -> Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO items (deck_name, term, meaning, pronunciation, category, is_custom)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            deck_name,
            item.term,
            item.meaning,
            item.pronunciation,
            item.category,
            item.is_custom
        ],
    )?;

    let item_id: i64 = conn.query_row(
        "SELECT id FROM items WHERE deck_name = ?1 AND term = ?2",
        params![deck_name, item.term],
        |row| row.get(0),
    )?;

    Ok(item_id)
}

fn item_from_row(row: &Row, offset: usize) -> rusqlite::Result<Item> {
    Ok(Item {
        term: row.get(offset)?,
        meaning: row.get(offset + 1)?,
        pronunciation: row.get(offset + 2)?,
        category: row.get(offset + 3)?,
        is_custom: row.get(offset + 4)?,
    })
}

/// Narrows a stored counter into `u32`, logging when the row was corrupt.
fn counter_from_raw(item_id: i64, column: &str, raw: i64) -> u32 {
    match u32::try_from(raw) {
        Ok(count) => count,
        Err(_) => {
            let repaired = raw.clamp(0, i64::from(u32::MAX)) as u32;
            log::warn!(
                "item {} has invalid {} {}, using {}",
                item_id,
                column,
                raw,
                repaired
            );
            repaired
        }
    }
}

/// Decodes review columns leniently: a corrupted box or counter is clamped
/// into range so one bad row cannot fail a whole queue query.
fn review_state_from_row(row: &Row, offset: usize) -> rusqlite::Result<ReviewState> {
    let item_id: i64 = row.get(offset)?;

    let raw_box: i64 = row.get(offset + 1)?;
    let srs_box = raw_box.clamp(0, i64::from(MAX_BOX)) as i32;
    if i64::from(srs_box) != raw_box {
        log::warn!(
            "item {} has out-of-range box {}, clamping to {}",
            item_id,
            raw_box,
            srs_box
        );
    }

    Ok(ReviewState {
        item_id,
        srs_box,
        next_review_at: row.get(offset + 2)?,
        review_count: counter_from_raw(item_id, "review_count", row.get(offset + 3)?),
        wrong_count: counter_from_raw(item_id, "wrong_count", row.get(offset + 4)?),
        mastered: row.get(offset + 5)?,
    })
}

/// Retrieves all items for a given deck as (item_id, Item) tuples
pub fn get_items_for_deck(deck_name: &str, conn: &Connection) -> Result<Vec<(i64, Item)>> {
    let mut stmt = conn.prepare(
        &format!("SELECT id, {ITEM_COLUMNS} FROM items WHERE deck_name = ?1 ORDER BY id ASC"),
    )?;

    let items = stmt
        .query_map(params![deck_name], |row| {
            Ok((row.get(0)?, item_from_row(row, 1)?))
        })?
        .collect::<rusqlite::Result<Vec<(i64, Item)>>>()?;

    Ok(items)
}

pub fn get_review_state(item_id: i64, conn: &Connection) -> Result<ReviewState> {
    conn.query_row(
        &format!("SELECT {REVIEW_COLUMNS} FROM items WHERE id = ?1"),
        params![item_id],
        |row| review_state_from_row(row, 0),
    )
    .optional()?
    .ok_or(StoreError::ItemNotFound(item_id))
}

/// Writes box, due timestamp, counters and mastery back for one item.
pub fn save_review_state(state: &ReviewState, conn: &Connection) -> Result<()> {
    let updated = conn.execute(
        "UPDATE items
         SET srs_box = ?1, next_review_at = ?2, review_count = ?3, wrong_count = ?4, mastered = ?5
         WHERE id = ?6",
        params![
            state.srs_box,
            state.next_review_at,
            state.review_count,
            state.wrong_count,
            state.mastered,
            state.item_id
        ],
    )?;

    if updated == 0 {
        return Err(StoreError::ItemNotFound(state.item_id));
    }
    Ok(())
}

/// Replaces a `now` that cannot be a review instant with the wall clock.
///
/// Zero is the unscheduled sentinel and negative values would be stored as
/// poisoned due timestamps, so neither may reach a transition.
fn checked_now(now: i64) -> i64 {
    if now > 0 {
        return now;
    }
    let wall_clock = Utc::now().timestamp_millis();
    log::warn!("Invalid review time {}, using {}", now, wall_clock);
    wall_clock
}

/// Records one answer for an item and returns its new review state.
///
/// The read-modify-write runs in a single transaction so concurrent answers
/// for the same item cannot overwrite each other.
pub fn record_review(
    item_id: i64,
    outcome: ReviewOutcome,
    now: i64,
    conn: &Connection,
) -> Result<ReviewState> {
    let now = checked_now(now);
    let tx = conn.unchecked_transaction()?;

    let current = get_review_state(item_id, &tx)?.sanitized(now);
    let next = current.apply(outcome, now);
    save_review_state(&next, &tx)?;

    tx.commit()?;

    log::debug!(
        "Item {} answered {:?}: box {} -> {}, due at {}",
        item_id,
        outcome,
        current.srs_box,
        next.srs_box,
        next.next_review_at
    );
    Ok(next)
}

/// Takes an item out of the box cycle; it shows up in the new-items queue again
/// only if it was never reviewed.
pub fn reset_item(item_id: i64, conn: &Connection) -> Result<ReviewState> {
    let state = get_review_state(item_id, conn)?.reset();
    save_review_state(&state, conn)?;
    Ok(state)
}

/// Retrieves items due for review, optionally limited to one deck
///
/// Uses the same predicate as `leitner::is_due`: scheduled and not in the
/// future. Ordered by due time (oldest first).
pub fn get_due_items(
    deck_name: Option<&str>,
    now: i64,
    conn: &Connection,
) -> Result<Vec<(Item, ReviewState)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS}, {REVIEW_COLUMNS}
         FROM items
         WHERE next_review_at > 0 AND next_review_at <= ?1
           AND (?2 IS NULL OR deck_name = ?2)
         ORDER BY next_review_at ASC, id ASC"
    ))?;

    let items = stmt
        .query_map(params![now, deck_name], |row| {
            Ok((item_from_row(row, 0)?, review_state_from_row(row, ITEM_COLUMN_COUNT)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(items)
}

/// Retrieves a practice set of items not yet mastered, in random order
pub fn get_unmastered_items(
    deck_name: &str,
    limit: usize,
    conn: &Connection,
) -> Result<Vec<(Item, ReviewState)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS}, {REVIEW_COLUMNS}
         FROM items
         WHERE deck_name = ?1 AND mastered = 0
         ORDER BY RANDOM()
         LIMIT ?2"
    ))?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let items = stmt
        .query_map(params![deck_name, limit], |row| {
            Ok((item_from_row(row, 0)?, review_state_from_row(row, ITEM_COLUMN_COUNT)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(items)
}

/// Retrieves items added by the learner across all decks, newest first
pub fn get_custom_items(conn: &Connection) -> Result<Vec<(i64, Item)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, {ITEM_COLUMNS} FROM items WHERE is_custom = 1 ORDER BY id DESC"
    ))?;

    let items = stmt
        .query_map([], |row| Ok((row.get(0)?, item_from_row(row, 1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(items)
}

/// Retrieves items that have never entered the box cycle
pub fn get_new_items(
    deck_name: &str,
    limit: usize,
    conn: &Connection,
) -> Result<Vec<(Item, ReviewState)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS}, {REVIEW_COLUMNS}
         FROM items
         WHERE deck_name = ?1 AND next_review_at = 0 AND review_count = 0
         ORDER BY id ASC
         LIMIT ?2"
    ))?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let items = stmt
        .query_map(params![deck_name, limit], |row| {
            Ok((item_from_row(row, 0)?, review_state_from_row(row, ITEM_COLUMN_COUNT)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(items)
}

pub fn count_due(now: i64, conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM items WHERE next_review_at > 0 AND next_review_at <= ?1",
        params![now],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

pub fn count_mastered(conn: &Connection) -> Result<usize> {
    let count: i64 =
        conn.query_row("SELECT COUNT(*) FROM items WHERE mastered = 1", [], |row| {
            row.get(0)
        })?;
    Ok(count as usize)
}

/// Retrieves review states for every item, ordered by item ID
pub fn get_all_review_states(conn: &Connection) -> Result<Vec<ReviewState>> {
    let mut stmt = conn.prepare(&format!("SELECT {REVIEW_COLUMNS} FROM items ORDER BY id ASC"))?;
    let states = stmt
        .query_map([], |row| review_state_from_row(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(states)
}

pub fn get_all_decks(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM decks ORDER BY name ASC")?;
    let decks = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(decks)
}

/// Loads all decks with their items into memory
///
/// Review state is not loaded here; sessions fetch it through the due and new queues.
pub fn load_all_decks(conn: &Connection) -> Result<DeckSet> {
    let mut decks = Vec::new();

    for deck_name in get_all_decks(conn)? {
        let items = get_items_for_deck(&deck_name, conn)?
            .into_iter()
            .map(|(_, item)| item)
            .collect();

        decks.push(Deck {
            name: deck_name,
            items,
        });
    }

    Ok(DeckSet { decks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::leitner::{self, UNSCHEDULED};

    const T0: i64 = 1_700_000_000_000;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        new_deck("Mandarin", &conn).unwrap();
        conn
    }

    #[test]
    fn test_add_item_starts_unscheduled() {
        let conn = setup();
        let id = add_item("Mandarin", &Item::new("bā", "eight"), &conn).unwrap();

        let state = get_review_state(id, &conn).unwrap();
        assert_eq!(state, ReviewState::new(id));
    }

    #[test]
    fn test_add_item_is_idempotent() {
        let conn = setup();
        let first = add_item("Mandarin", &Item::new("bā", "eight"), &conn).unwrap();
        record_review(first, ReviewOutcome::Correct, T0, &conn).unwrap();

        let second = add_item("Mandarin", &Item::new("bā", "eight"), &conn).unwrap();
        assert_eq!(first, second);
        assert_eq!(get_review_state(first, &conn).unwrap().srs_box, 1);
    }

    #[test]
    fn test_record_correct_review() {
        let conn = setup();
        let id = add_item("Mandarin", &Item::new("nǐ", "you"), &conn).unwrap();

        let state = record_review(id, ReviewOutcome::Correct, T0, &conn).unwrap();
        assert_eq!(state.srs_box, 1);
        assert_eq!(state.next_review_at, T0 + 86_400_000);
        assert!(state.mastered);

        assert_eq!(get_review_state(id, &conn).unwrap(), state);
        assert_eq!(count_mastered(&conn).unwrap(), 1);
    }

    #[test]
    fn test_record_wrong_review_is_due_immediately() {
        let conn = setup();
        let id = add_item("Mandarin", &Item::new("hǎo", "good"), &conn).unwrap();
        for _ in 0..3 {
            record_review(id, ReviewOutcome::Correct, T0, &conn).unwrap();
        }

        let state = record_review(id, ReviewOutcome::Incorrect, T0, &conn).unwrap();
        assert_eq!(state.srs_box, 0);
        assert_eq!(state.next_review_at, T0);
        assert_eq!(state.review_count, 4);
        assert_eq!(state.wrong_count, 1);

        let due = get_due_items(Some("Mandarin"), T0, &conn).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].0.term, "hǎo");
    }

    #[test]
    fn test_record_review_repairs_corrupt_row() {
        let conn = setup();
        let id = add_item("Mandarin", &Item::new("mā", "mother"), &conn).unwrap();
        conn.execute(
            "UPDATE items SET srs_box = 17, next_review_at = -100 WHERE id = ?1",
            params![id],
        )
        .unwrap();

        let state = record_review(id, ReviewOutcome::Correct, T0, &conn).unwrap();
        assert_eq!(state.srs_box, 5);
        assert_eq!(state.next_review_at, T0 + 30 * MILLISECONDS_PER_DAY);
    }

    #[test]
    fn test_oversized_box_does_not_break_queue() {
        let conn = setup();
        let a = add_item("Mandarin", &Item::new("a", "1"), &conn).unwrap();
        let b = add_item("Mandarin", &Item::new("b", "2"), &conn).unwrap();
        record_review(a, ReviewOutcome::Incorrect, T0, &conn).unwrap();
        record_review(b, ReviewOutcome::Incorrect, T0, &conn).unwrap();
        conn.execute(
            "UPDATE items SET srs_box = 10000000000 WHERE id = ?1",
            params![b],
        )
        .unwrap();

        let due = get_due_items(None, T0, &conn).unwrap();
        assert_eq!(due.len(), 2);
        assert_eq!(due[1].1.srs_box, 5);

        let state = record_review(b, ReviewOutcome::Correct, T0, &conn).unwrap();
        assert_eq!(state.srs_box, 5);
        assert_eq!(state.next_review_at, T0 + 30 * MILLISECONDS_PER_DAY);
    }

    #[test]
    fn test_negative_counters_are_repaired() {
        let conn = setup();
        let id = add_item("Mandarin", &Item::new("liù", "six"), &conn).unwrap();
        record_review(id, ReviewOutcome::Incorrect, T0, &conn).unwrap();
        conn.execute(
            "UPDATE items SET review_count = -1, wrong_count = 99999999999 WHERE id = ?1",
            params![id],
        )
        .unwrap();

        let due = get_due_items(None, T0, &conn).unwrap();
        assert_eq!(due[0].1.review_count, 0);
        assert_eq!(due[0].1.wrong_count, u32::MAX);

        let state = record_review(id, ReviewOutcome::Incorrect, T0, &conn).unwrap();
        assert_eq!(state.review_count, 1);
        assert_eq!(state.wrong_count, u32::MAX);
    }

    #[test]
    fn test_invalid_now_falls_back_to_wall_clock() {
        let conn = setup();
        let id = add_item("Mandarin", &Item::new("qī", "seven"), &conn).unwrap();

        for bad_now in [0, -5] {
            let state = record_review(id, ReviewOutcome::Incorrect, bad_now, &conn).unwrap();
            assert!(state.next_review_at > T0);
            assert_eq!(get_review_state(id, &conn).unwrap(), state);

            let later = state.next_review_at;
            let due = get_due_items(None, later, &conn).unwrap();
            assert_eq!(due.len(), 1);
        }
    }

    #[test]
    fn test_record_review_missing_item() {
        let conn = setup();
        let result = record_review(404, ReviewOutcome::Correct, T0, &conn);
        assert!(matches!(result, Err(StoreError::ItemNotFound(404))));
    }

    #[test]
    fn test_due_query_matches_predicate() {
        let conn = setup();
        new_deck("Other", &conn).unwrap();
        let a = add_item("Mandarin", &Item::new("a", "1"), &conn).unwrap();
        let b = add_item("Mandarin", &Item::new("b", "2"), &conn).unwrap();
        let c = add_item("Other", &Item::new("c", "3"), &conn).unwrap();
        add_item("Mandarin", &Item::new("never", "4"), &conn).unwrap();

        record_review(a, ReviewOutcome::Correct, T0, &conn).unwrap();
        record_review(b, ReviewOutcome::Incorrect, T0, &conn).unwrap();
        record_review(c, ReviewOutcome::Incorrect, T0 + 1, &conn).unwrap();

        let now = T0 + 1;
        let due = get_due_items(None, now, &conn).unwrap();
        let due_ids: Vec<i64> = due.iter().map(|(_, state)| state.item_id).collect();
        assert_eq!(due_ids, vec![b, c]);

        for state in get_all_review_states(&conn).unwrap() {
            assert_eq!(due_ids.contains(&state.item_id), leitner::is_due(state.next_review_at, now));
        }

        let deck_due = get_due_items(Some("Mandarin"), now, &conn).unwrap();
        assert_eq!(deck_due.len(), 1);
        assert_eq!(count_due(now, &conn).unwrap(), 2);

        let tomorrow = T0 + MILLISECONDS_PER_DAY;
        assert_eq!(count_due(tomorrow, &conn).unwrap(), 3);
    }

    #[test]
    fn test_new_items_queue() {
        let conn = setup();
        let first = add_item("Mandarin", &Item::new("yī", "one"), &conn).unwrap();
        add_item("Mandarin", &Item::new("èr", "two"), &conn).unwrap();
        add_item("Mandarin", &Item::new("sān", "three"), &conn).unwrap();

        record_review(first, ReviewOutcome::Correct, T0, &conn).unwrap();

        let new_items = get_new_items("Mandarin", 10, &conn).unwrap();
        let terms: Vec<&str> = new_items.iter().map(|(item, _)| item.term.as_str()).collect();
        assert_eq!(terms, vec!["èr", "sān"]);

        assert_eq!(get_new_items("Mandarin", 1, &conn).unwrap().len(), 1);
    }

    #[test]
    fn test_unmastered_queue() {
        let conn = setup();
        let learned = add_item("Mandarin", &Item::new("jiǔ", "nine"), &conn).unwrap();
        let missed = add_item("Mandarin", &Item::new("shí", "ten"), &conn).unwrap();
        add_item("Mandarin", &Item::new("líng", "zero"), &conn).unwrap();

        record_review(learned, ReviewOutcome::Correct, T0, &conn).unwrap();
        record_review(missed, ReviewOutcome::Incorrect, T0, &conn).unwrap();

        let mut terms: Vec<String> = get_unmastered_items("Mandarin", 10, &conn)
            .unwrap()
            .into_iter()
            .map(|(item, _)| item.term)
            .collect();
        terms.sort();
        assert_eq!(terms, vec!["líng".to_string(), "shí".to_string()]);

        assert_eq!(get_unmastered_items("Mandarin", 1, &conn).unwrap().len(), 1);
    }

    #[test]
    fn test_custom_items_listing() {
        let conn = setup();
        new_deck("Mine", &conn).unwrap();
        add_item("Mandarin", &Item::new("shū", "book"), &conn).unwrap();
        let first = add_item("Mine", &Item::custom("chá", "tea"), &conn).unwrap();
        let second = add_item("Mandarin", &Item::custom("kāfēi", "coffee").with_category("word"), &conn).unwrap();

        let custom = get_custom_items(&conn).unwrap();
        let ids: Vec<i64> = custom.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![second, first]);
        assert_eq!(custom[0].1.category, "word");
        assert!(custom.iter().all(|(_, item)| item.is_custom));
    }

    #[test]
    fn test_reset_item_unschedules() {
        let conn = setup();
        let id = add_item("Mandarin", &Item::new("sì", "four"), &conn).unwrap();
        record_review(id, ReviewOutcome::Correct, T0, &conn).unwrap();

        let state = reset_item(id, &conn).unwrap();
        assert_eq!(state.next_review_at, UNSCHEDULED);
        assert_eq!(state.review_count, 1);
        assert!(get_due_items(None, i64::MAX, &conn).unwrap().is_empty());
        assert_eq!(count_mastered(&conn).unwrap(), 0);
    }

    #[test]
    fn test_simulated_clock() {
        let conn = setup();
        set_current_time(T0, &conn).unwrap();
        assert_eq!(get_current_time(&conn).unwrap(), T0);

        let next = advance_day(&conn).unwrap();
        assert_eq!(next, T0 + MILLISECONDS_PER_DAY);
        assert_eq!(get_current_time(&conn).unwrap(), next);
    }

    #[test]
    fn test_corrupt_clock_falls_back_to_wall_clock() {
        let conn = setup();
        conn.execute(
            "UPDATE app_state SET value = 'garbage' WHERE key = 'current_time'",
            [],
        )
        .unwrap();

        assert!(get_current_time(&conn).unwrap() > T0);
    }

    #[test]
    fn test_load_all_decks() {
        let conn = setup();
        add_item("Mandarin", &Item::new("wǔ", "five").with_pronunciation("wu"), &conn).unwrap();

        let deck_set = load_all_decks(&conn).unwrap();
        let deck = deck_set.find("Mandarin").unwrap();
        assert_eq!(deck.items.len(), 1);
        assert_eq!(deck.items[0].pronunciation.as_deref(), Some("wu"));
        assert_eq!(deck_set.item_count(), 1);
    }
}
