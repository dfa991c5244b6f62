use anyhow::{Context, Result};

use recall_lib::flashcards::{DeckCommand, RawReviewSettings, ReviewSettings};

use crate::app::App;
use crate::OutputFormat;

pub fn run_show(app: &App, format: &OutputFormat) -> Result<()> {
    print_settings(&app.state.settings, format)
}

pub fn run_set(
    app: &mut App,
    raw: RawReviewSettings,
    save: bool,
    format: &OutputFormat,
) -> Result<()> {
    app.apply(DeckCommand::UpdateSettings(raw))?;

    if save {
        app.config.review = RawReviewSettings::from(&app.state.settings);
        app.config
            .save(&app.config_path)
            .with_context(|| format!("Failed to write {}", app.config_path.display()))?;
        log::info!("Saved review settings to {:?}", app.config_path);
    }

    print_settings(&app.state.settings, format)
}

fn print_settings(settings: &ReviewSettings, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(settings)?),
        OutputFormat::Plain => {
            let steps: Vec<String> = settings.learning_steps.iter().map(|s| s.to_string()).collect();
            println!("New cards per day:    {}", settings.new_cards_per_day);
            println!("Maximum interval:     {} days", settings.max_interval);
            println!("Default ease factor:  {:.2}", settings.default_ease_factor);
            println!("Learning steps:       {} (minutes)", steps.join(", "));
        }
    }
    Ok(())
}
