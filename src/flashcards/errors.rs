//! Flashcard engine error types

use thiserror::Error;
use uuid::Uuid;

/// Invalid input handed to the scheduler by its caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    #[error("Quality must be between 0 and 5, got {0}")]
    InvalidQuality(i32),

    #[error("No learning steps configured")]
    EmptyLearningSteps,

    #[error("Learning step must be a positive number of minutes, got {0}")]
    InvalidLearningStep(u32),

    #[error("Next due time is outside the representable range")]
    TimestampOutOfRange,
}

/// Errors raised while applying a command to the deck state
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    #[error("Deck not found: {0}")]
    DeckNotFound(Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Scheduling failed: {0}")]
    Scheduling(#[from] SchedulingError),
}
