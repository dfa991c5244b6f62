use anyhow::Result;
use chrono::Utc;

use recall_lib::flashcards::algorithm::{format_interval, preview};
use recall_lib::flashcards::Quality;

use crate::app::App;
use crate::OutputFormat;

pub fn run_queue(app: &App, deck_name: Option<&str>, format: &OutputFormat) -> Result<()> {
    let deck = app.resolve_deck(deck_name)?;
    let queue = app.queue(&deck);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&queue)?),
        OutputFormat::Plain => {
            if queue.is_empty() {
                println!("No cards are due in '{}'.", deck.name);
                return Ok(());
            }

            for (i, card) in queue.iter().enumerate() {
                println!("{:>3}. [{}] {}", i + 1, card.phase(), card.front);
            }
            println!("\n{} cards in queue", queue.len());
        }
    }

    Ok(())
}

pub fn run_preview(
    app: &App,
    deck_name: Option<&str>,
    show_answer: bool,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.resolve_deck(deck_name)?;
    let upcoming = app.upcoming(&deck);
    let Some(card) = upcoming.first() else {
        println!("Nothing left to review in '{}'.", deck.name);
        return Ok(());
    };

    let delays = preview(card, &app.state.settings, Utc::now())?;

    match format {
        OutputFormat::Json => {
            let options: Vec<serde_json::Value> = delays
                .iter()
                .enumerate()
                .map(|(i, (rating, delay))| {
                    serde_json::json!({
                        "button": i + 1,
                        "rating": rating,
                        "quality": rating.quality().value(),
                        "delayMinutes": delay.num_minutes(),
                        "label": format_interval(*delay),
                    })
                })
                .collect();
            let output = serde_json::json!({
                "card": card,
                "remaining": upcoming.len(),
                "options": options,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", card.front);
            if show_answer {
                println!("\u{2500}\u{2500}\u{2500}");
                println!("{}", card.back);
            }
            println!();
            let labels: Vec<String> = delays
                .iter()
                .enumerate()
                .map(|(i, (rating, delay))| {
                    format!("[{}] {} {}", i + 1, rating, format_interval(*delay))
                })
                .collect();
            println!("{}", labels.join("  |  "));
            println!("Cards remaining: {}", upcoming.len());
        }
    }

    Ok(())
}

/// Grade the next card of the deck's session, starting one when needed
pub fn run_review(
    app: &mut App,
    deck_name: Option<&str>,
    quality: Quality,
    new_session: bool,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.resolve_deck(deck_name)?;
    let now = Utc::now();

    let remaining = match app.state.session_cards(deck.id) {
        Some(cards) if !new_session => cards,
        _ => {
            let next = app.state.start_session(deck.id, now)?;
            app.commit(next)?;
            let cards = app.state.session_cards(deck.id).unwrap_or_default();
            if cards.is_empty() {
                println!("No cards to review in '{}'.", deck.name);
                return Ok(());
            }
            cards
        }
    };
    let Some(head) = remaining.first() else {
        println!(
            "Session complete for '{}'. Run `review --new-session` to start another.",
            deck.name
        );
        return Ok(());
    };

    let next = app.state.grade_card(head.id, quality, now, &mut app.ids)?;
    app.commit(next)?;

    let card = app.state.card(head.id)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(card)?),
        OutputFormat::Plain => {
            println!("{}", card.front);
            println!("\u{2500}\u{2500}\u{2500}");
            println!("{}", card.back);
            println!();
            println!(
                "Graded {} -> {}, next review in {} ({})",
                quality.value(),
                card.phase(),
                format_interval(card.due - now),
                card.due.format("%Y-%m-%d %H:%M UTC")
            );
            println!("Cards remaining: {}", remaining.len() - 1);
        }
    }

    Ok(())
}
