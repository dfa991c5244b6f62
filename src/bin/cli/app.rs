use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;

use recall_lib::config::AppConfig;
use recall_lib::flashcards::{Deck, DeckCommand, DeckState, Flashcard, FlashcardStorage, UuidGenerator};

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub storage: FlashcardStorage,
    pub state: DeckState,
    pub ids: UuidGenerator,
}

impl App {
    /// Load config and the deck state snapshot
    pub fn new(config_path: Option<&Path>, data_file: Option<&Path>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => AppConfig::default_path().context("Failed to get config directory")?,
        };
        let config = AppConfig::load(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        let data_file = match data_file.map(Path::to_path_buf).or(config.data_file.clone()) {
            Some(path) => path,
            None => FlashcardStorage::default_path().context("Failed to get data directory")?,
        };

        let storage = FlashcardStorage::new(data_file);
        let state = storage
            .load(&config.review_settings())
            .with_context(|| format!("Failed to load deck state from {}", storage.path().display()))?;

        Ok(Self {
            config,
            config_path,
            storage,
            state,
            ids: UuidGenerator,
        })
    }

    /// Replace the state with `next` and persist it
    pub fn commit(&mut self, next: DeckState) -> Result<()> {
        self.storage
            .save(&next)
            .context("Failed to save deck state")?;
        self.state = next;
        Ok(())
    }

    /// Apply a single command and persist the result
    pub fn apply(&mut self, command: DeckCommand) -> Result<()> {
        let next = self.state.apply(command)?;
        self.commit(next)
    }

    /// Find a deck by name (case-insensitive prefix match)
    pub fn find_deck(&self, name: &str) -> Result<Deck> {
        let decks = &self.state.decks;
        let list = |items: &[&Deck]| {
            items.iter().map(|d| format!("  - {}", d.name)).collect::<Vec<_>>().join("\n")
        };

        match lookup(decks, name, |d| d.name.clone()) {
            Lookup::One(deck) => Ok(deck.clone()),
            Lookup::None => bail!(
                "No deck matching '{}'. Available decks:\n{}",
                name,
                list(&decks.iter().collect::<Vec<_>>())
            ),
            Lookup::Many(matches) => {
                bail!("Ambiguous deck name '{}'. Matches:\n{}", name, list(&matches))
            }
        }
    }

    /// Named deck, or the active deck when no name is given
    pub fn resolve_deck(&self, name: Option<&str>) -> Result<Deck> {
        match name {
            Some(name) => self.find_deck(name),
            None => {
                let id = self
                    .state
                    .active_deck_id
                    .context("No active deck. Pass --deck or run `deck use <name>`")?;
                Ok(self.state.deck(id)?.clone())
            }
        }
    }

    /// Find a card by id prefix
    pub fn find_card(&self, id_prefix: &str) -> Result<Flashcard> {
        match lookup(&self.state.cards, id_prefix, |c| c.id.to_string()) {
            Lookup::One(card) => Ok(card.clone()),
            Lookup::None => bail!("No card with id starting with '{}'", id_prefix),
            Lookup::Many(matches) => {
                bail!("Card id prefix '{}' matches {} cards", id_prefix, matches.len())
            }
        }
    }

    /// The queue of a deck as of now
    pub fn queue(&self, deck: &Deck) -> Vec<Flashcard> {
        self.state.deck_queue(deck.id, Utc::now())
    }

    /// Cards left in the deck's session, or its current queue when no session is running
    pub fn upcoming(&self, deck: &Deck) -> Vec<Flashcard> {
        self.state
            .session_cards(deck.id)
            .unwrap_or_else(|| self.queue(deck))
    }
}

enum Lookup<'a, T> {
    None,
    One(&'a T),
    Many(Vec<&'a T>),
}

/// Case-insensitive match on `key`: an exact hit wins, otherwise a unique prefix
fn lookup<'a, T>(items: &'a [T], query: &str, key: impl Fn(&T) -> String) -> Lookup<'a, T> {
    let query = query.to_lowercase();

    if let Some(item) = items.iter().find(|item| key(item).to_lowercase() == query) {
        return Lookup::One(item);
    }

    let mut matches: Vec<&T> = items
        .iter()
        .filter(|item| key(item).to_lowercase().starts_with(&query))
        .collect();

    match matches.len() {
        0 => Lookup::None,
        1 => Lookup::One(matches.remove(0)),
        _ => Lookup::Many(matches),
    }
}
