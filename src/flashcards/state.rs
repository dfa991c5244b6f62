//! Versioned deck state and the commands that change it
//!
//! All decks, cards, settings and the review log live in one [`DeckState`].
//! It is only ever changed through [`DeckState::apply`], which takes a
//! [`DeckCommand`] and returns the next state with its version bumped. A
//! failed command leaves the current state as it was. Commands carry fully built records, so identifiers and
//! timestamps are decided by the caller and `apply` stays deterministic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::algorithm::{schedule, Quality};
use super::errors::StateError;
use super::models::{Deck, Flashcard, ReviewLogEntry};
use super::queue::build_queue;
use super::settings::{normalize, RawReviewSettings, ReviewSettings};

pub type Result<T> = std::result::Result<T, StateError>;

/// Most recent review log entries kept on the state
pub const REVIEW_LOG_LIMIT: usize = 1000;

/// Source of unique identifiers for decks, cards and log entries
pub trait IdGenerator {
    fn next_id(&mut self) -> Uuid;
}

/// Random v4 identifiers
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Editable deck fields; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `Some(None)` clears the description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

/// Content for a card that does not exist yet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDraft {
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

/// Cards picked for a review session, fixed when the session starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    pub deck_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Card ids still to review, in queue order
    pub remaining: Vec<Uuid>,
}

/// A single change to the deck state
#[derive(Debug, Clone, PartialEq)]
pub enum DeckCommand {
    AddDeck(Deck),
    UpdateDeck { deck_id: Uuid, patch: DeckPatch },
    DeleteDeck(Uuid),
    SetActiveDeck(Option<Uuid>),
    UpsertCard(Flashcard),
    DeleteCard(Uuid),
    BulkAddCards(Vec<Flashcard>),
    UpdateSettings(RawReviewSettings),
    /// Replace any running session
    StartSession(ReviewSession),
    /// Record a grading event; `card` is the card after the schedule
    /// update has been merged into it
    LogReview { card: Flashcard, entry: ReviewLogEntry },
}

impl DeckCommand {
    fn name(&self) -> &'static str {
        match self {
            DeckCommand::AddDeck(_) => "add_deck",
            DeckCommand::UpdateDeck { .. } => "update_deck",
            DeckCommand::DeleteDeck(_) => "delete_deck",
            DeckCommand::SetActiveDeck(_) => "set_active_deck",
            DeckCommand::UpsertCard(_) => "upsert_card",
            DeckCommand::DeleteCard(_) => "delete_card",
            DeckCommand::BulkAddCards(_) => "bulk_add_cards",
            DeckCommand::UpdateSettings(_) => "update_settings",
            DeckCommand::StartSession(_) => "start_session",
            DeckCommand::LogReview { .. } => "log_review",
        }
    }
}

/// Everything the review application knows about
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckState {
    /// Incremented by every applied command
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub decks: Vec<Deck>,
    #[serde(default)]
    pub cards: Vec<Flashcard>,
    #[serde(default)]
    pub settings: ReviewSettings,
    /// Recent grading events, newest first
    #[serde(default)]
    pub reviews: Vec<ReviewLogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_deck_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<ReviewSession>,
}

impl DeckState {
    pub fn new(settings: ReviewSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Apply a command, producing the next state
    pub fn apply(&self, command: DeckCommand) -> Result<Self> {
        let command_name = command.name();
        let mut next = self.clone();

        match command {
            DeckCommand::AddDeck(deck) => {
                next.active_deck_id = Some(deck.id);
                next.decks.push(deck);
            }
            DeckCommand::UpdateDeck { deck_id, patch } => {
                let deck = next
                    .decks
                    .iter_mut()
                    .find(|d| d.id == deck_id)
                    .ok_or(StateError::DeckNotFound(deck_id))?;
                if let Some(name) = patch.name {
                    deck.name = name;
                }
                if let Some(description) = patch.description {
                    deck.description = description;
                }
            }
            DeckCommand::DeleteDeck(deck_id) => {
                next.decks.retain(|d| d.id != deck_id);
                next.cards.retain(|c| c.deck_id != deck_id);
                if next.session.as_ref().is_some_and(|s| s.deck_id == deck_id) {
                    next.session = None;
                }
                if next.active_deck_id == Some(deck_id) {
                    next.active_deck_id = next.decks.first().map(|d| d.id);
                }
            }
            DeckCommand::SetActiveDeck(deck_id) => {
                if let Some(id) = deck_id {
                    next.deck(id)?;
                }
                next.active_deck_id = deck_id;
            }
            DeckCommand::UpsertCard(card) => {
                next.deck(card.deck_id)?;
                match next.cards.iter_mut().find(|c| c.id == card.id) {
                    Some(existing) => *existing = card,
                    None => next.cards.push(card),
                }
            }
            DeckCommand::DeleteCard(card_id) => {
                next.cards.retain(|c| c.id != card_id);
                next.drop_from_session(card_id);
            }
            DeckCommand::BulkAddCards(cards) => {
                if let Some(missing) = cards
                    .iter()
                    .map(|c| c.deck_id)
                    .find(|id| !next.decks.iter().any(|d| d.id == *id))
                {
                    return Err(StateError::DeckNotFound(missing));
                }
                next.cards.extend(cards);
            }
            DeckCommand::UpdateSettings(raw) => {
                next.settings = normalize(&raw, &next.settings);
            }
            DeckCommand::StartSession(session) => {
                next.deck(session.deck_id)?;
                next.session = Some(session);
            }
            DeckCommand::LogReview { card, entry } => {
                let card_id = card.id;
                let existing = next
                    .cards
                    .iter_mut()
                    .find(|c| c.id == card.id)
                    .ok_or(StateError::CardNotFound(card.id))?;
                *existing = card;
                existing.updated_at = entry.timestamp;
                existing.review_history.push(entry.clone());

                next.reviews.insert(0, entry);
                next.reviews.truncate(REVIEW_LOG_LIMIT);
                next.drop_from_session(card_id);
            }
        }

        next.version += 1;
        log::info!("Applied {} (state version {})", command_name, next.version);
        Ok(next)
    }

    fn drop_from_session(&mut self, card_id: Uuid) {
        if let Some(session) = self.session.as_mut() {
            session.remaining.retain(|id| *id != card_id);
        }
    }

    pub fn deck(&self, deck_id: Uuid) -> Result<&Deck> {
        self.decks
            .iter()
            .find(|d| d.id == deck_id)
            .ok_or(StateError::DeckNotFound(deck_id))
    }

    pub fn card(&self, card_id: Uuid) -> Result<&Flashcard> {
        self.cards
            .iter()
            .find(|c| c.id == card_id)
            .ok_or(StateError::CardNotFound(card_id))
    }

    /// Cards of one deck, in insertion order
    pub fn deck_cards(&self, deck_id: Uuid) -> Vec<Flashcard> {
        self.cards
            .iter()
            .filter(|c| c.deck_id == deck_id)
            .cloned()
            .collect()
    }

    /// Review queue for a deck under the configured new-card cap
    pub fn deck_queue(&self, deck_id: Uuid, now: DateTime<Utc>) -> Vec<Flashcard> {
        let cards = self.deck_cards(deck_id);
        build_queue(&cards, now, self.settings.new_cards_per_day)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Freeze the current queue of a deck into a new session
    pub fn start_session(&self, deck_id: Uuid, now: DateTime<Utc>) -> Result<Self> {
        let remaining = self.deck_queue(deck_id, now).iter().map(|c| c.id).collect();
        self.apply(DeckCommand::StartSession(ReviewSession {
            deck_id,
            started_at: now,
            remaining,
        }))
    }

    /// Cards left in the running session, if it belongs to `deck_id`
    pub fn session_cards(&self, deck_id: Uuid) -> Option<Vec<Flashcard>> {
        let session = self.session.as_ref().filter(|s| s.deck_id == deck_id)?;
        Some(
            session
                .remaining
                .iter()
                .filter_map(|id| self.cards.iter().find(|c| c.id == *id))
                .cloned()
                .collect(),
        )
    }

    /// Create a deck and make it active
    pub fn add_deck(
        &self,
        name: String,
        description: Option<String>,
        ids: &mut impl IdGenerator,
    ) -> Result<Self> {
        let mut deck = Deck::new(ids.next_id(), name);
        deck.description = description;
        self.apply(DeckCommand::AddDeck(deck))
    }

    /// Create a card in a deck with scheduling defaults
    pub fn add_card(
        &self,
        draft: CardDraft,
        now: DateTime<Utc>,
        ids: &mut impl IdGenerator,
    ) -> Result<Self> {
        let card = prepare_card(draft, &self.settings, now, ids);
        self.apply(DeckCommand::UpsertCard(card))
    }

    /// Grade a card: schedule it, merge the update and log the review
    pub fn grade_card(
        &self,
        card_id: Uuid,
        quality: Quality,
        now: DateTime<Utc>,
        ids: &mut impl IdGenerator,
    ) -> Result<Self> {
        let mut card = self.card(card_id)?.clone();
        let update = schedule(&card, quality, &self.settings, now)?;
        card.apply_update(&update);
        let entry = ReviewLogEntry::new(ids.next_id(), card_id, quality.value(), &update, now);
        self.apply(DeckCommand::LogReview { card, entry })
    }
}

/// Build a new card from a draft, seeding its scheduling state
pub fn prepare_card(
    draft: CardDraft,
    settings: &ReviewSettings,
    now: DateTime<Utc>,
    ids: &mut impl IdGenerator,
) -> Flashcard {
    let mut card = Flashcard::new(
        ids.next_id(),
        draft.deck_id,
        draft.front,
        draft.back,
        settings.default_ease_factor,
        now,
    );
    card.image = draft.image;
    card.audio = draft.audio;
    card
}
