//! Data models for the flashcard system

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A deck is a named collection of flashcards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Deck {
    pub fn new(id: Uuid, name: String) -> Self {
        Self {
            id,
            name,
            description: None,
        }
    }
}

/// Where a card sits in the learning process.
///
/// Persisted records only carry `is_new`, `repetition` and an optional
/// `learning_step`; [`Flashcard::phase`] rebuilds this enum from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CardPhase {
    /// Never graded
    New,
    /// Graded at least once and waiting on a learning step (minutes)
    Learning { step: u32 },
    /// Graduated to day-scale intervals
    Review,
}

impl CardPhase {
    /// Learning step index to store on the card record, if any
    pub fn learning_step(&self) -> Option<u32> {
        match self {
            CardPhase::Learning { step } => Some(*step),
            _ => None,
        }
    }
}

impl fmt::Display for CardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardPhase::New => write!(f, "new"),
            CardPhase::Learning { step } => write!(f, "learning {}", step + 1),
            CardPhase::Review => write!(f, "review"),
        }
    }
}

/// A flashcard with its content and spaced repetition state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// When the card is next eligible for review
    pub due: DateTime<Utc>,
    /// Current interval in days
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Consecutive successful reviews since the last lapse
    #[serde(default)]
    pub repetition: u32,
    /// SM-2 ease factor
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    #[serde(default = "default_is_new")]
    pub is_new: bool,
    /// Index into the configured learning steps while mid-learning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_step: Option<u32>,
    /// Grading events, oldest first
    #[serde(default)]
    pub review_history: Vec<ReviewLogEntry>,
}

fn default_interval() -> u32 {
    1
}

fn default_ease_factor() -> f64 {
    2.5
}

fn default_is_new() -> bool {
    true
}

impl Flashcard {
    pub fn new(
        id: Uuid,
        deck_id: Uuid,
        front: String,
        back: String,
        ease_factor: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            deck_id,
            front,
            back,
            image: None,
            audio: None,
            created_at: now,
            updated_at: now,
            due: now,
            interval: default_interval(),
            repetition: 0,
            ease_factor,
            is_new: true,
            learning_step: None,
            review_history: Vec::new(),
        }
    }

    /// Reconstruct the card's phase from its scheduling fields
    pub fn phase(&self) -> CardPhase {
        if let Some(step) = self.learning_step {
            return CardPhase::Learning { step };
        }
        if self.is_new && self.review_history.is_empty() {
            CardPhase::New
        } else if self.repetition == 0 {
            CardPhase::Learning { step: 0 }
        } else {
            CardPhase::Review
        }
    }

    /// A new card that has never been graded
    pub fn is_fresh(&self) -> bool {
        self.is_new && self.review_history.is_empty()
    }

    /// Merge a scheduling result into this card
    pub fn apply_update(&mut self, update: &ScheduleUpdate) {
        self.interval = update.interval;
        self.repetition = update.repetition;
        self.ease_factor = update.ease_factor;
        self.due = update.due;
        self.is_new = update.is_new;
        self.learning_step = update.phase.learning_step();
    }
}

/// Fields a grading event changes on a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdate {
    pub interval: u32,
    pub repetition: u32,
    pub ease_factor: f64,
    pub due: DateTime<Utc>,
    pub is_new: bool,
    pub phase: CardPhase,
}

/// A record of a single grading event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLogEntry {
    pub id: Uuid,
    pub card_id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Quality rating (0-5, SM-2 scale)
    /// 0 = complete blackout
    /// 1 = incorrect, but recognized
    /// 2 = incorrect, but easy to recall
    /// 3 = correct with difficulty
    /// 4 = correct with hesitation
    /// 5 = perfect response
    pub quality: u8,
    /// Interval after the review (days)
    pub interval: u32,
    /// Ease factor after the review
    pub ease_factor: f64,
}

impl ReviewLogEntry {
    pub fn new(
        id: Uuid,
        card_id: Uuid,
        quality: u8,
        update: &ScheduleUpdate,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            card_id,
            timestamp,
            quality,
            interval: update.interval,
            ease_factor: update.ease_factor,
        }
    }
}

/// Statistics for a deck or all decks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub review_cards: usize,
    pub due_cards: usize,
    pub reviews_today: usize,
    pub correct_today: usize,
    pub streak_days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Flashcard {
        Flashcard::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "front".to_string(),
            "back".to_string(),
            2.5,
            Utc::now(),
        )
    }

    #[test]
    fn test_new_card_defaults() {
        let card = card();
        assert!(card.is_new);
        assert_eq!(card.interval, 1);
        assert_eq!(card.repetition, 0);
        assert_eq!(card.due, card.created_at);
        assert_eq!(card.phase(), CardPhase::New);
    }

    #[test]
    fn test_phase_reconstruction() {
        let mut card = card();
        card.review_history.push(ReviewLogEntry {
            id: Uuid::new_v4(),
            card_id: card.id,
            timestamp: Utc::now(),
            quality: 1,
            interval: 1,
            ease_factor: 2.3,
        });
        assert_eq!(card.phase(), CardPhase::Learning { step: 0 });

        card.learning_step = Some(1);
        assert_eq!(card.phase(), CardPhase::Learning { step: 1 });

        card.learning_step = None;
        card.is_new = false;
        card.repetition = 3;
        assert_eq!(card.phase(), CardPhase::Review);
    }

    #[test]
    fn test_deserialize_record_without_scheduling_fields() {
        let json = r#"{
            "id": "6f0c8a4e-2f1d-4d7b-9a43-0c2b5b1f7e10",
            "deckId": "0d3f1a7c-8e2b-4c55-a1e9-3b7d6c2f4a90",
            "front": "hola",
            "back": "hello",
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z",
            "due": "2026-01-01T00:00:00Z"
        }"#;
        let card: Flashcard = serde_json::from_str(json).unwrap();
        assert_eq!(card.interval, 1);
        assert_eq!(card.ease_factor, 2.5);
        assert!(card.is_new);
        assert!(card.review_history.is_empty());
        assert_eq!(card.phase(), CardPhase::New);
    }
}
