//! SM-2 Spaced Repetition Algorithm
//!
//! Implementation of the SuperMemo 2 algorithm for calculating
//! optimal review intervals based on user performance, with a short
//! minute-based learning phase before cards graduate to day intervals.
//!
//! Quality ratings (0-5):
//! - 0: Complete blackout, no recall
//! - 1: Incorrect, but upon seeing answer, remembered
//! - 2: Incorrect, but answer seemed easy to recall
//! - 3: Correct response with serious difficulty
//! - 4: Correct response after hesitation
//! - 5: Perfect response with no hesitation
//!
//! Every function takes `now` explicitly so results are reproducible.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::errors::SchedulingError;
use super::models::{CardPhase, Flashcard, ScheduleUpdate};
use super::settings::ReviewSettings;

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Lowest quality that counts as a successful recall
const PASSING_QUALITY: u8 = 3;

/// Ease penalty applied on a lapse
const LAPSE_EASE_PENALTY: f64 = 0.2;

/// A validated SM-2 quality grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: i32) -> Result<Self, SchedulingError> {
        match u8::try_from(value) {
            Ok(q) if q <= 5 => Ok(Self(q)),
            _ => Err(SchedulingError::InvalidQuality(value)),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_lapse(self) -> bool {
        self.0 < PASSING_QUALITY
    }
}

impl TryFrom<i32> for Quality {
    type Error = SchedulingError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

impl From<Rating> for Quality {
    fn from(rating: Rating) -> Self {
        Self(rating.quality_value())
    }
}

/// The four answer buttons shown during review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    fn quality_value(self) -> u8 {
        match self {
            Rating::Again => 1, // incorrect but recognized
            Rating::Hard => 3,  // correct with difficulty
            Rating::Good => 4,  // correct with hesitation
            Rating::Easy => 5,  // perfect
        }
    }

    pub fn quality(self) -> Quality {
        Quality::from(self)
    }

    /// Map a 1-4 button index to a rating
    pub fn from_button(index: i32) -> Option<Self> {
        match index {
            1 => Some(Rating::Again),
            2 => Some(Rating::Hard),
            3 => Some(Rating::Good),
            4 => Some(Rating::Easy),
            _ => None,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rating::Again => "Again",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        };
        f.write_str(label)
    }
}

/// Check if the card is eligible for review at `now`
pub fn is_due(card: &Flashcard, now: DateTime<Utc>) -> bool {
    card.due <= now
}

/// Calculate the next scheduling state for a graded card
///
/// The card itself is not modified; merge the result with
/// [`Flashcard::apply_update`] and record the review separately.
pub fn schedule(
    card: &Flashcard,
    quality: Quality,
    settings: &ReviewSettings,
    now: DateTime<Utc>,
) -> Result<ScheduleUpdate, SchedulingError> {
    let steps = &settings.learning_steps;
    if steps.is_empty() {
        return Err(SchedulingError::EmptyLearningSteps);
    }
    if let Some(&bad) = steps.iter().find(|&&step| step == 0) {
        return Err(SchedulingError::InvalidLearningStep(bad));
    }

    let phase = card.phase();

    let update = if quality.is_lapse() {
        // Incorrect response - back to the first learning step
        ScheduleUpdate {
            interval: 1,
            repetition: 0,
            ease_factor: (card.ease_factor - LAPSE_EASE_PENALTY).max(MIN_EASE_FACTOR),
            due: add_minutes(now, steps[0])?,
            is_new: card.is_new,
            phase: CardPhase::Learning { step: 0 },
        }
    } else {
        let repetition = card.repetition.saturating_add(1);
        let ease_factor = next_ease_factor(card.ease_factor, quality);

        match phase {
            CardPhase::Review => {
                let interval = graduated_interval(card.interval, card.ease_factor, settings.max_interval);
                ScheduleUpdate {
                    interval,
                    repetition,
                    ease_factor,
                    due: add_days(now, interval)?,
                    is_new: false,
                    phase: CardPhase::Review,
                }
            }
            CardPhase::New | CardPhase::Learning { .. } => {
                let current = phase.learning_step().unwrap_or(0) as usize;
                match steps.get(current + 1) {
                    Some(&minutes) => ScheduleUpdate {
                        interval: card.interval.max(1),
                        repetition,
                        ease_factor,
                        due: add_minutes(now, minutes)?,
                        is_new: false,
                        phase: CardPhase::Learning {
                            step: (current + 1) as u32,
                        },
                    },
                    None => {
                        // Graduate: first review interval is one day
                        let interval = 1;
                        ScheduleUpdate {
                            interval,
                            repetition,
                            ease_factor,
                            due: add_days(now, interval)?,
                            is_new: false,
                            phase: CardPhase::Review,
                        }
                    }
                }
            }
        }
    };

    log::debug!(
        "Card {} graded {}: {:?} -> {:?}, interval {}d, ease {:.2}",
        card.id,
        quality.value(),
        phase,
        update.phase,
        update.interval,
        update.ease_factor
    );

    Ok(update)
}

/// EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)), floored at 1.3
pub fn next_ease_factor(ease_factor: f64, quality: Quality) -> f64 {
    let distance = f64::from(5 - quality.value());
    (ease_factor + (0.1 - distance * (0.08 + distance * 0.02))).max(MIN_EASE_FACTOR)
}

/// round(interval * ease), kept within [1, max_interval]
fn graduated_interval(interval: u32, ease_factor: f64, max_interval: u32) -> u32 {
    let max_interval = max_interval.max(1);
    let next = (f64::from(interval) * ease_factor).round();
    if next >= f64::from(max_interval) {
        max_interval
    } else if next < 1.0 {
        1
    } else {
        next as u32
    }
}

fn add_minutes(now: DateTime<Utc>, minutes: u32) -> Result<DateTime<Utc>, SchedulingError> {
    now.checked_add_signed(Duration::minutes(i64::from(minutes)))
        .ok_or(SchedulingError::TimestampOutOfRange)
}

fn add_days(now: DateTime<Utc>, days: u32) -> Result<DateTime<Utc>, SchedulingError> {
    now.checked_add_signed(Duration::days(i64::from(days)))
        .ok_or(SchedulingError::TimestampOutOfRange)
}

/// Calculate the delay each answer button would give
/// Used to show users what interval each rating would give
pub fn preview(
    card: &Flashcard,
    settings: &ReviewSettings,
    now: DateTime<Utc>,
) -> Result<[(Rating, Duration); 4], SchedulingError> {
    let mut delays = [(Rating::Again, Duration::zero()); 4];
    for (slot, rating) in delays.iter_mut().zip(Rating::ALL) {
        let update = schedule(card, rating.quality(), settings, now)?;
        *slot = (rating, update.due - now);
    }
    Ok(delays)
}

/// Format a delay to a short human-readable string
pub fn format_interval(delay: Duration) -> String {
    let minutes = delay.num_minutes();
    if minutes < 1 {
        return "now".to_string();
    }
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = delay.num_hours();
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = delay.num_days();
    if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
