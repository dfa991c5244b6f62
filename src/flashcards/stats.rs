//! Review statistics over a set of cards

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::algorithm::is_due;
use super::models::{CardPhase, Flashcard, ReviewStats};

/// Summarize cards and their review history as of `now` (UTC days)
pub fn review_stats(cards: &[Flashcard], now: DateTime<Utc>) -> ReviewStats {
    let mut stats = ReviewStats {
        total_cards: cards.len(),
        ..Default::default()
    };

    let today = now.date_naive();
    let mut review_days: BTreeSet<NaiveDate> = BTreeSet::new();

    for card in cards {
        match card.phase() {
            CardPhase::New => stats.new_cards += 1,
            CardPhase::Learning { .. } => stats.learning_cards += 1,
            CardPhase::Review => stats.review_cards += 1,
        }

        if is_due(card, now) {
            stats.due_cards += 1;
        }

        for entry in &card.review_history {
            let day = entry.timestamp.date_naive();
            review_days.insert(day);
            if day == today {
                stats.reviews_today += 1;
                if entry.quality >= 3 {
                    stats.correct_today += 1;
                }
            }
        }
    }

    stats.streak_days = streak_ending(&review_days, today);
    stats
}

/// Consecutive review days up to today, or up to yesterday if today is
/// still open
fn streak_ending(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut day = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while days.contains(&day) {
        streak += 1;
        day = day - Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::models::ReviewLogEntry;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).unwrap()
    }

    fn card() -> Flashcard {
        Flashcard::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "front".to_string(),
            "back".to_string(),
            2.5,
            now() - Duration::days(20),
        )
    }

    fn log(card: &mut Flashcard, days_ago: i64, quality: u8) {
        card.review_history.push(ReviewLogEntry {
            id: Uuid::new_v4(),
            card_id: card.id,
            timestamp: now() - Duration::days(days_ago),
            quality,
            interval: 1,
            ease_factor: 2.5,
        });
    }

    #[test]
    fn test_empty() {
        assert_eq!(review_stats(&[], now()), ReviewStats::default());
    }

    #[test]
    fn test_counts_by_phase() {
        let fresh = card();

        let mut learning = card();
        learning.due = now() + Duration::minutes(10);
        learning.learning_step = Some(0);
        log(&mut learning, 0, 1);

        let mut review = card();
        review.is_new = false;
        review.repetition = 2;
        review.due = now() - Duration::hours(1);
        log(&mut review, 0, 4);
        log(&mut review, 1, 4);
        log(&mut review, 2, 5);

        let stats = review_stats(&[fresh, learning, review], now());
        assert_eq!(stats.total_cards, 3);
        assert_eq!(stats.new_cards, 1);
        assert_eq!(stats.learning_cards, 1);
        assert_eq!(stats.review_cards, 1);
        assert_eq!(stats.due_cards, 2);
        assert_eq!(stats.reviews_today, 2);
        assert_eq!(stats.correct_today, 1);
        assert_eq!(stats.streak_days, 3);
    }

    #[test]
    fn test_streak_survives_until_end_of_day() {
        let mut reviewed = card();
        log(&mut reviewed, 1, 4);
        log(&mut reviewed, 2, 4);
        log(&mut reviewed, 4, 4);

        let stats = review_stats(&[reviewed], now());
        assert_eq!(stats.reviews_today, 0);
        assert_eq!(stats.streak_days, 2);
    }
}
