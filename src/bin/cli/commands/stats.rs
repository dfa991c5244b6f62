use anyhow::Result;
use chrono::Utc;

use recall_lib::flashcards::review_stats;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, deck_name: Option<&str>, format: &OutputFormat) -> Result<()> {
    let (label, cards) = match deck_name {
        Some(name) => {
            let deck = app.find_deck(name)?;
            let cards = app.state.deck_cards(deck.id);
            (deck.name, cards)
        }
        None => ("All decks".to_string(), app.state.cards.clone()),
    };

    let stats = review_stats(&cards, Utc::now());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Plain => {
            println!("{}", label);
            println!("  Total:        {}", stats.total_cards);
            println!("  New:          {}", stats.new_cards);
            println!("  Learning:     {}", stats.learning_cards);
            println!("  Review:       {}", stats.review_cards);
            println!("  Due now:      {}", stats.due_cards);
            println!(
                "  Today:        {} reviews, {} correct",
                stats.reviews_today, stats.correct_today
            );
            println!("  Streak:       {} days", stats.streak_days);
        }
    }

    Ok(())
}
