mod app;
mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "recall-cli", about = "Spaced repetition flashcards in the terminal", version)]
struct Cli {
    /// Config file (default: ~/.config/recall/recall.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Deck state snapshot (overrides the config file)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Answer buttons as accepted on the command line
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum RatingArg {
    Again,
    Hard,
    Good,
    Easy,
}

impl From<RatingArg> for recall_lib::Rating {
    fn from(arg: RatingArg) -> Self {
        match arg {
            RatingArg::Again => recall_lib::Rating::Again,
            RatingArg::Hard => recall_lib::Rating::Hard,
            RatingArg::Good => recall_lib::Rating::Good,
            RatingArg::Easy => recall_lib::Rating::Easy,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Deck management
    #[command(subcommand)]
    Deck(DeckCommand),

    /// Card management
    #[command(subcommand)]
    Card(CardCommand),

    /// Show the review queue of a deck
    Queue {
        /// Deck name (default: active deck)
        #[arg(long)]
        deck: Option<String>,
    },

    /// Show the next card and what each answer would schedule
    Preview {
        /// Deck name (default: active deck)
        #[arg(long)]
        deck: Option<String>,
        /// Also print the back of the card
        #[arg(long)]
        answer: bool,
    },

    /// Grade the next card of the review session
    Review {
        /// Answer button
        #[arg(
            required_unless_present_any = ["quality", "button"],
            conflicts_with_all = ["quality", "button"]
        )]
        rating: Option<RatingArg>,
        /// Button number as shown by `preview` (1 = Again .. 4 = Easy)
        #[arg(long, conflicts_with = "quality")]
        button: Option<i32>,
        /// Raw SM-2 quality (0-5)
        #[arg(long)]
        quality: Option<i32>,
        /// Deck name (default: active deck)
        #[arg(long)]
        deck: Option<String>,
        /// Discard the running session and rebuild it from the current queue
        #[arg(long)]
        new_session: bool,
    },

    /// Review statistics
    Stats {
        /// Restrict to one deck
        #[arg(long)]
        deck: Option<String>,
    },

    /// Scheduling settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum DeckCommand {
    /// Create a deck and make it active
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List decks
    List,
    /// Rename a deck or change its description
    Edit {
        /// Deck name (case-insensitive prefix match)
        deck: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Remove the description
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
    },
    /// Delete a deck and all of its cards
    Rm { deck: String },
    /// Make a deck the active one
    Use { deck: String },
}

#[derive(Subcommand)]
enum CardCommand {
    /// Add a card
    Add {
        front: String,
        back: String,
        /// Deck name (default: active deck)
        #[arg(long)]
        deck: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        audio: Option<String>,
    },
    /// List cards of a deck
    List {
        #[arg(long)]
        deck: Option<String>,
    },
    /// Delete a card by id (prefix)
    Rm { id: String },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Change settings; values are clamped to their allowed ranges
    Set {
        #[arg(long)]
        new_cards_per_day: Option<i64>,
        #[arg(long)]
        max_interval: Option<i64>,
        #[arg(long)]
        default_ease_factor: Option<f64>,
        /// Comma-separated minutes, e.g. "10, 1440"
        #[arg(long)]
        learning_steps: Option<String>,
        /// Also write the result to the config file as defaults for new data files
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut app = app::App::new(cli.config.as_deref(), cli.data_file.as_deref())?;
    let format = &cli.format;

    match cli.command {
        Command::Deck(subcmd) => match subcmd {
            DeckCommand::Add { name, description } => {
                commands::deck::run_add(&mut app, name, description, format)?;
            }
            DeckCommand::List => commands::deck::run_list(&app, format)?,
            DeckCommand::Edit {
                deck,
                name,
                description,
                clear_description,
            } => {
                let description = if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                };
                commands::deck::run_edit(&mut app, &deck, name, description)?;
            }
            DeckCommand::Rm { deck } => commands::deck::run_remove(&mut app, &deck)?,
            DeckCommand::Use { deck } => commands::deck::run_use(&mut app, &deck)?,
        },
        Command::Card(subcmd) => match subcmd {
            CardCommand::Add {
                front,
                back,
                deck,
                image,
                audio,
            } => {
                commands::card::run_add(&mut app, deck.as_deref(), front, back, image, audio, format)?;
            }
            CardCommand::List { deck } => commands::card::run_list(&app, deck.as_deref(), format)?,
            CardCommand::Rm { id } => commands::card::run_remove(&mut app, &id)?,
        },
        Command::Queue { deck } => commands::review::run_queue(&app, deck.as_deref(), format)?,
        Command::Preview { deck, answer } => {
            commands::review::run_preview(&app, deck.as_deref(), answer, format)?;
        }
        Command::Review {
            rating,
            button,
            quality,
            deck,
            new_session,
        } => {
            let quality = match (rating, button, quality) {
                (Some(rating), _, _) => recall_lib::Rating::from(rating).quality(),
                (None, Some(index), _) => recall_lib::Rating::from_button(index)
                    .with_context(|| format!("Button must be between 1 and 4, got {}", index))?
                    .quality(),
                (None, None, Some(value)) => recall_lib::Quality::new(value)?,
                (None, None, None) => anyhow::bail!("Pass a rating, --button or --quality"),
            };
            commands::review::run_review(&mut app, deck.as_deref(), quality, new_session, format)?;
        }
        Command::Stats { deck } => commands::stats::run(&app, deck.as_deref(), format)?,
        Command::Settings(subcmd) => match subcmd {
            SettingsCommand::Show => commands::settings::run_show(&app, format)?,
            SettingsCommand::Set {
                new_cards_per_day,
                max_interval,
                default_ease_factor,
                learning_steps,
                save,
            } => {
                let raw = recall_lib::flashcards::RawReviewSettings {
                    new_cards_per_day,
                    max_interval,
                    default_ease_factor,
                    learning_steps: learning_steps
                        .as_deref()
                        .map(recall_lib::flashcards::settings::parse_learning_steps),
                };
                commands::settings::run_set(&mut app, raw, save, format)?;
            }
        },
    }

    Ok(())
}
