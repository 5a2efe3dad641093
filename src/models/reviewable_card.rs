//! Repetition state of a single card, the unit the scheduler works on.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the card store.
pub type CardId = i64;

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const MIN_INTERVAL_DAYS: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewableCard {
    pub id: CardId,
    pub ease_factor: f64,
    pub interval_days: u32,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// `None` means the card has never been scheduled and is due now.
    pub next_review_at: Option<DateTime<Utc>>,
    pub times_seen: u32,
    pub times_correct: u32,
    pub times_incorrect: u32,
}

impl ReviewableCard {
    /// A card that has never been reviewed.
    pub fn new(id: CardId) -> Self {
        Self {
            id,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval_days: MIN_INTERVAL_DAYS,
            last_reviewed_at: None,
            next_review_at: None,
            times_seen: 0,
            times_correct: 0,
            times_incorrect: 0,
        }
    }

    pub fn is_new(&self) -> bool {
        self.last_reviewed_at.is_none()
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at.is_none_or(|due| due <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_new_card_defaults() {
        let card = ReviewableCard::new(7);

        assert_eq!(card.id, 7);
        assert_eq!(card.ease_factor, 2.5);
        assert_eq!(card.interval_days, 1);
        assert!(card.next_review_at.is_none());
        assert!(card.is_new());
        assert_eq!(card.times_seen, 0);
    }

    #[test]
    fn test_is_due() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut card = ReviewableCard::new(1);
        assert!(card.is_due(now));

        card.next_review_at = Some(now);
        assert!(card.is_due(now));

        card.next_review_at = Some(now + Duration::seconds(1));
        assert!(!card.is_due(now));
    }

    #[test]
    fn test_serde_keeps_every_field() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let card = ReviewableCard {
            id: 3,
            ease_factor: 2.18,
            interval_days: 4,
            last_reviewed_at: Some(now),
            next_review_at: Some(now + Duration::days(4)),
            times_seen: 5,
            times_correct: 3,
            times_incorrect: 2,
        };

        let json = serde_json::to_string(&card).unwrap();
        let back: ReviewableCard = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
    }
}
