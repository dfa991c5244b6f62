use anyhow::Result;
use chrono::Utc;

use recall_lib::flashcards::{CardDraft, DeckCommand};

use crate::app::App;
use crate::OutputFormat;

pub fn run_add(
    app: &mut App,
    deck_name: Option<&str>,
    front: String,
    back: String,
    image: Option<String>,
    audio: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.resolve_deck(deck_name)?;
    let draft = CardDraft {
        deck_id: deck.id,
        front,
        back,
        image,
        audio,
    };
    let next = app.state.add_card(draft, Utc::now(), &mut app.ids)?;
    app.commit(next)?;

    // Newly created cards are appended
    if let Some(card) = app.state.cards.last() {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(card)?),
            OutputFormat::Plain => println!("Added card {} to '{}'", card.id, deck.name),
        }
    }
    Ok(())
}

pub fn run_list(app: &App, deck_name: Option<&str>, format: &OutputFormat) -> Result<()> {
    let deck = app.resolve_deck(deck_name)?;
    let cards = app.state.deck_cards(deck.id);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cards)?),
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No cards in '{}'.", deck.name);
                return Ok(());
            }

            for card in &cards {
                let id = card.id.to_string();
                println!(
                    "{}  {:<10} due {}  {}",
                    &id[..8],
                    card.phase().to_string(),
                    card.due.format("%Y-%m-%d %H:%M"),
                    card.front
                );
            }
            println!("\n{} cards", cards.len());
        }
    }

    Ok(())
}

pub fn run_remove(app: &mut App, id_prefix: &str) -> Result<()> {
    let card = app.find_card(id_prefix)?;
    app.apply(DeckCommand::DeleteCard(card.id))?;
    println!("Deleted card {}", card.id);
    Ok(())
}
