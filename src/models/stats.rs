//! Reporting aggregates over a deck's repetition counters.
use super::ReviewableCard;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DeckStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub due_cards: usize,
    pub times_seen: u64,
    pub times_correct: u64,
    pub times_incorrect: u64,
    pub average_ease: f64,
    /// Share of reviews answered correctly, 0.0 when nothing was reviewed.
    pub accuracy: f64,
}

impl DeckStats {
    pub fn from_cards<'a, I>(cards: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a ReviewableCard>,
    {
        let mut stats = Self::default();
        let mut ease_sum = 0.0;

        for card in cards {
            stats.total_cards += 1;
            if card.is_new() {
                stats.new_cards += 1;
            }
            if card.is_due(now) {
                stats.due_cards += 1;
            }
            stats.times_seen += u64::from(card.times_seen);
            stats.times_correct += u64::from(card.times_correct);
            stats.times_incorrect += u64::from(card.times_incorrect);
            ease_sum += card.ease_factor;
        }

        if stats.total_cards > 0 {
            stats.average_ease = ease_sum / stats.total_cards as f64;
        }
        if stats.times_seen > 0 {
            stats.accuracy = stats.times_correct as f64 / stats.times_seen as f64;
        }
        stats
    }
}
