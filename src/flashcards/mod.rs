//! Flashcard and spaced repetition system for Recall
//!
//! This module provides:
//! - SM-2 spaced repetition scheduling with minute-based learning steps
//! - Due checks and review queue construction
//! - Settings validation
//! - Versioned deck state, statistics and snapshot storage

pub mod algorithm;
pub mod errors;
pub mod models;
pub mod queue;
pub mod settings;
pub mod state;
pub mod stats;
pub mod storage;

pub use algorithm::{is_due, schedule, Quality, Rating};
pub use errors::{SchedulingError, StateError};
pub use models::*;
pub use queue::build_queue;
pub use settings::{normalize, RawReviewSettings, ReviewSettings};
pub use state::{
    CardDraft, DeckCommand, DeckPatch, DeckState, IdGenerator, ReviewSession, UuidGenerator,
};
pub use stats::review_stats;
pub use storage::{FlashcardStorage, StorageError};
