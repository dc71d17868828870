use flashcards_srs::*;

use database::db::{self, add_item, get_all_decks, init_database, load_all_decks, new_deck};
use models::review_state::format_timestamp;

const SAMPLE_DECK: &str = "Mandarin Basics";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = AppConfig::from_env()?;
    let conn = init_database(&config.database_path)?;

    if get_all_decks(&conn)?.is_empty() {
        new_deck(SAMPLE_DECK, &conn)?;

        add_item(SAMPLE_DECK, &Item::new("nǐ hǎo", "hello"), &conn)?;
        add_item(SAMPLE_DECK, &Item::new("xiè xie", "thank you"), &conn)?;
        add_item(SAMPLE_DECK, &Item::new("zài jiàn", "goodbye"), &conn)?;

        println!("Sample data created!");
    }

    let now = db::get_current_time(&conn)?;
    let deck_set = load_all_decks(&conn)?;

    println!("Today is {}", format_timestamp(now));
    println!("Loaded {} decks from database", deck_set.decks.len());
    for deck in &deck_set.decks {
        let new_count = db::get_new_items(&deck.name, config.new_items_per_session, &conn)?.len();
        println!(
            "  - {} ({} items, {} new)",
            deck.name,
            deck.items.len(),
            new_count
        );
    }

    let due = db::get_due_items(None, now, &conn)?;
    println!("{} items due for review", due.len());
    for (item, state) in &due {
        println!(
            "  - {} = {} [box {}: {}]",
            item.term,
            item.meaning,
            state.srs_box,
            state.label()
        );
    }

    let upcoming: Vec<ReviewState> = db::get_all_review_states(&conn)?
        .into_iter()
        .filter(|state| state.next_review_at > now)
        .collect();
    for state in &upcoming {
        println!(
            "  item {} due {} (in {} days)",
            state.item_id,
            format_timestamp(state.next_review_at),
            state.days_until_due(now)
        );
    }

    println!("{} items mastered", db::count_mastered(&conn)?);
    println!("{} custom items", db::get_custom_items(&conn)?.len());
    Ok(())
}
