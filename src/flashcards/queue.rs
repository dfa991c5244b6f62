//! Review queue construction
//!
//! A queue holds every graded card, earliest due first, followed by a capped
//! batch of never-seen cards in creation order. Graded cards that are still
//! new only join once their learning step is due. Building the queue has no
//! side effects; hosts build it once per session so a card graded during the
//! session is not shown again.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::algorithm::is_due;
use super::models::Flashcard;

/// Order the cards of a deck into a review session
pub fn build_queue<'a>(
    cards: &'a [Flashcard],
    now: DateTime<Utc>,
    new_cards_per_day: u32,
) -> Vec<&'a Flashcard> {
    let mut seen: HashSet<Uuid> = HashSet::new();

    // Graduated cards, plus new cards mid-learning once their step is due
    let mut due: Vec<&Flashcard> = cards
        .iter()
        .filter(|card| !card.is_new || (!card.is_fresh() && is_due(card, now)))
        .filter(|card| seen.insert(card.id))
        .collect();
    due.sort_by_key(|card| card.due);

    let mut fresh: Vec<&Flashcard> = cards
        .iter()
        .filter(|card| card.is_fresh())
        .filter(|card| seen.insert(card.id))
        .collect();
    fresh.sort_by_key(|card| card.created_at);
    fresh.truncate(new_cards_per_day as usize);

    log::debug!(
        "Built review queue: {} due, {} new (of {} cards)",
        due.len(),
        fresh.len(),
        cards.len()
    );

    due.extend(fresh);
    due
}
