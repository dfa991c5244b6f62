//! Snapshot storage for the deck state
//!
//! The whole [`DeckState`] is kept in one pretty-printed JSON file:
//! ```text
//! {data-dir}/recall/
//! └── state.json
//! ```
//! Writes go to a sibling temp file first and are renamed into place.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::settings::{normalize, RawReviewSettings, ReviewSettings};
use super::state::DeckState;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine data directory")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage manager for the deck state snapshot
pub struct FlashcardStorage {
    path: PathBuf,
}

impl FlashcardStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default snapshot location (e.g., ~/.local/share/recall/state.json)
    pub fn default_path() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("recall").join("state.json"))
            .ok_or(StorageError::DataDirNotFound)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, or an empty state using `settings` if none exists
    ///
    /// Stored settings are run through validation again, since the file
    /// may have been edited by hand.
    pub fn load(&self, settings: &ReviewSettings) -> Result<DeckState> {
        if !self.path.exists() {
            log::info!("No snapshot at {:?}, starting empty", self.path);
            return Ok(DeckState::new(settings.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let mut state: DeckState = serde_json::from_str(&content)?;
        state.settings = normalize(&RawReviewSettings::from(&state.settings), settings);
        log::info!(
            "Loaded {} decks and {} cards from {:?} (version {})",
            state.decks.len(),
            state.cards.len(),
            self.path,
            state.version
        );
        Ok(state)
    }

    /// Write the snapshot
    pub fn save(&self, state: &DeckState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(state)?)?;
        fs::rename(&tmp_path, &self.path)?;

        log::info!("Saved state version {} to {:?}", state.version, self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::state::UuidGenerator;
    use tempfile::TempDir;

    fn create_test_storage() -> (FlashcardStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FlashcardStorage::new(temp_dir.path().join("nested").join("state.json"));
        (storage, temp_dir)
    }

    #[test]
    fn test_load_missing_snapshot() {
        let (storage, _temp) = create_test_storage();
        let settings = ReviewSettings {
            new_cards_per_day: 5,
            ..Default::default()
        };

        let state = storage.load(&settings).unwrap();
        assert_eq!(state.version, 0);
        assert!(state.decks.is_empty());
        assert_eq!(state.settings, settings);
    }

    #[test]
    fn test_save_and_load() {
        let (storage, _temp) = create_test_storage();
        let state = DeckState::default()
            .add_deck("Capitals".to_string(), Some("Europe".to_string()), &mut UuidGenerator)
            .unwrap();

        storage.save(&state).unwrap();
        assert!(storage.path().exists());
        assert!(!storage.path().with_extension("json.tmp").exists());

        let loaded = storage.load(&ReviewSettings::default()).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_hand_edited_settings_are_normalized() {
        let (storage, _temp) = create_test_storage();
        fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
        fs::write(
            storage.path(),
            r#"{"settings": {"newCardsPerDay": 0, "maxInterval": 90, "defaultEaseFactor": 2.5, "learningSteps": []}}"#,
        )
        .unwrap();

        let state = storage.load(&ReviewSettings::default()).unwrap();
        assert_eq!(state.settings.new_cards_per_day, 1);
        assert_eq!(state.settings.learning_steps, vec![10, 1440]);
    }

    #[test]
    fn test_corrupt_snapshot() {
        let (storage, _temp) = create_test_storage();
        fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
        fs::write(storage.path(), "not json").unwrap();

        assert!(matches!(
            storage.load(&ReviewSettings::default()),
            Err(StorageError::Json(_))
        ));
    }
}
