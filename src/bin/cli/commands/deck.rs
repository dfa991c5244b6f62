use anyhow::Result;

use recall_lib::flashcards::{DeckCommand, DeckPatch};

use crate::app::App;
use crate::OutputFormat;

pub fn run_add(
    app: &mut App,
    name: String,
    description: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let next = app.state.add_deck(name, description, &mut app.ids)?;
    app.commit(next)?;

    // add_deck makes the new deck active
    let deck = app.resolve_deck(None)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deck)?),
        OutputFormat::Plain => println!("Created deck '{}' ({})", deck.name, deck.id),
    }
    Ok(())
}

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let decks = &app.state.decks;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = decks
                .iter()
                .map(|deck| {
                    let cards = app.state.deck_cards(deck.id);
                    serde_json::json!({
                        "id": deck.id.to_string(),
                        "name": deck.name,
                        "description": deck.description,
                        "cardCount": cards.len(),
                        "dueCount": app.queue(deck).len(),
                        "isActive": app.state.active_deck_id == Some(deck.id),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if decks.is_empty() {
                println!("No decks yet. Create one with `deck add <name>`.");
                return Ok(());
            }

            let max_name_len = decks.iter().map(|d| d.name.len()).max().unwrap_or(4).max(4);

            println!("  {:<width$} Cards  Queue", "Deck", width = max_name_len + 1);
            println!(
                "  {} {} {}",
                "\u{2500}".repeat(max_name_len + 1),
                "\u{2500}".repeat(6),
                "\u{2500}".repeat(5)
            );

            for deck in decks {
                let marker = if app.state.active_deck_id == Some(deck.id) { "*" } else { " " };
                println!(
                    "{} {:<width$} {:<6} {}",
                    marker,
                    deck.name,
                    app.state.deck_cards(deck.id).len(),
                    app.queue(deck).len(),
                    width = max_name_len + 1
                );
            }
        }
    }

    Ok(())
}

pub fn run_edit(
    app: &mut App,
    deck_name: &str,
    name: Option<String>,
    description: Option<Option<String>>,
) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    app.apply(DeckCommand::UpdateDeck {
        deck_id: deck.id,
        patch: DeckPatch { name, description },
    })?;
    println!("Updated deck '{}'", app.state.deck(deck.id)?.name);
    Ok(())
}

pub fn run_remove(app: &mut App, deck_name: &str) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let card_count = app.state.deck_cards(deck.id).len();
    app.apply(DeckCommand::DeleteDeck(deck.id))?;
    println!("Deleted deck '{}' and {} cards", deck.name, card_count);
    Ok(())
}

pub fn run_use(app: &mut App, deck_name: &str) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    app.apply(DeckCommand::SetActiveDeck(Some(deck.id)))?;
    println!("Active deck: {}", deck.name);
    Ok(())
}
