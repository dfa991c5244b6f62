//! Spaced-repetition flashcard engine.
//!
//! The [`flashcards`] module holds the scheduling engine (due checks, SM-2
//! scheduling, queue building, settings validation) together with the
//! versioned deck state that hosts can use to drive review sessions.

pub mod config;
pub mod flashcards;

pub use config::AppConfig;
pub use flashcards::{
    build_queue, is_due, normalize, schedule, DeckState, Flashcard, Quality, Rating, ReviewSettings,
};
