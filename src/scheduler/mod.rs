//! Spaced repetition scheduling.
//!
//! The scheduler is a pair of pure functions: one turns a card and a review
//! outcome into the card's next state, the other picks the cards due at a
//! given instant. Neither reads a clock, touches storage or fails; callers
//! pass `now` in and persist the result themselves.

pub mod due;
pub mod sm2;

use crate::config::SchedulerConfig;
use crate::models::{CardId, ReviewOutcome, ReviewableCard};
use chrono::{DateTime, Utc};

pub use due::select_due;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// A never-reviewed card using the configured initial ease.
    pub fn new_card(&self, id: CardId) -> ReviewableCard {
        let floor = sm2::ease_floor(&self.config);
        let ease = if self.config.initial_ease.is_finite() {
            self.config.initial_ease.max(floor)
        } else {
            floor
        };
        ReviewableCard {
            ease_factor: ease,
            ..ReviewableCard::new(id)
        }
    }

    pub fn record_review(
        &self,
        card: &ReviewableCard,
        outcome: ReviewOutcome,
        now: DateTime<Utc>,
    ) -> ReviewableCard {
        sm2::calculate_next_review(&self.config, card, outcome, now)
    }
}

/// Records a review with the default SM-2 settings.
pub fn record_review(
    card: &ReviewableCard,
    outcome: ReviewOutcome,
    now: DateTime<Utc>,
) -> ReviewableCard {
    Scheduler::default().record_review(card, outcome, now)
}
