//! SM-2 (SuperMemo 2) style review calculation.
//!
//! Each review adjusts the card's easiness factor (EF) by the recall quality:
//! - EF changes by `0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)` and never drops below the floor
//! - An incorrect answer restarts the spacing curve at one day
//! - A correct answer multiplies the current interval by the new EF
//!
//! Malformed input is clamped rather than rejected, so a review can always be recorded.

use crate::config::SchedulerConfig;
use crate::models::review_outcome::clamp_quality;
use crate::models::reviewable_card::{MIN_EASE_FACTOR, MIN_INTERVAL_DAYS};
use crate::models::{ReviewOutcome, ReviewableCard};
use chrono::{DateTime, Duration, Utc};

/// Calculates the card state after one review at `now`.
pub fn calculate_next_review(
    config: &SchedulerConfig,
    card: &ReviewableCard,
    outcome: ReviewOutcome,
    now: DateTime<Utc>,
) -> ReviewableCard {
    let floor = ease_floor(config);
    let max_interval = config.max_interval_days.max(MIN_INTERVAL_DAYS);

    let quality = clamp_quality(outcome.quality.unwrap_or(if outcome.is_correct {
        config.correct_grade
    } else {
        config.incorrect_grade
    }));

    let new_ease = (entry_ease(config, card.ease_factor) + ease_delta(quality)).max(floor);

    let new_interval = if outcome.is_correct {
        let current = card.interval_days.clamp(MIN_INTERVAL_DAYS, max_interval);
        let grown = (f64::from(current) * new_ease).round();
        // `as` saturates, then the clamp restores the bounds
        (grown as u32).clamp(MIN_INTERVAL_DAYS, max_interval)
    } else {
        MIN_INTERVAL_DAYS
    };

    let next_review_at = now
        .checked_add_signed(Duration::days(i64::from(new_interval)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    let (times_correct, times_incorrect) = if outcome.is_correct {
        (card.times_correct.saturating_add(1), card.times_incorrect)
    } else {
        (card.times_correct, card.times_incorrect.saturating_add(1))
    };

    ReviewableCard {
        id: card.id,
        ease_factor: new_ease,
        interval_days: new_interval,
        last_reviewed_at: Some(now),
        next_review_at: Some(next_review_at),
        times_seen: card.times_seen.saturating_add(1),
        times_correct,
        times_incorrect,
    }
}

/// EF adjustment for a quality grade already clamped to 0..=5.
pub fn ease_delta(quality: i32) -> f64 {
    let miss = f64::from(5 - quality);
    0.1 - miss * (0.08 + miss * 0.02)
}

pub(crate) fn ease_floor(config: &SchedulerConfig) -> f64 {
    if config.minimum_ease.is_finite() {
        config.minimum_ease.max(MIN_EASE_FACTOR)
    } else {
        MIN_EASE_FACTOR
    }
}

/// Ease as read from a stored card: non-finite values fall back to the
/// initial ease, anything below the floor is raised to it.
fn entry_ease(config: &SchedulerConfig, ease: f64) -> f64 {
    let floor = ease_floor(config);
    if ease.is_finite() {
        ease.max(floor)
    } else if config.initial_ease.is_finite() {
        config.initial_ease.max(floor)
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn review(card: &ReviewableCard, outcome: ReviewOutcome) -> ReviewableCard {
        calculate_next_review(&SchedulerConfig::default(), card, outcome, day0())
    }

    #[test]
    fn test_first_correct_review() {
        let next = review(&ReviewableCard::new(1), ReviewOutcome::correct().with_quality(5));

        assert!((next.ease_factor - 2.6).abs() < 1e-9);
        assert_eq!(next.interval_days, 3);
        assert_eq!(next.last_reviewed_at, Some(day0()));
        assert_eq!(next.next_review_at, Some(day0() + Duration::days(3)));
        assert_eq!(next.times_seen, 1);
        assert_eq!(next.times_correct, 1);
        assert_eq!(next.times_incorrect, 0);
    }

    #[test]
    fn test_incorrect_review_defaults_to_grade_2() {
        let next = review(&ReviewableCard::new(1), ReviewOutcome::incorrect());

        assert!((next.ease_factor - 2.18).abs() < 1e-9);
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.next_review_at, Some(day0() + Duration::days(1)));
        assert_eq!(next.times_incorrect, 1);
        assert_eq!(next.times_correct, 0);
    }

    #[test]
    fn test_incorrect_resets_long_interval() {
        let card = ReviewableCard {
            interval_days: 120,
            ..ReviewableCard::new(1)
        };

        let next = review(&card, ReviewOutcome::incorrect().with_quality(4));
        assert_eq!(next.interval_days, 1);
    }

    #[test]
    fn test_ease_floor() {
        let card = ReviewableCard {
            ease_factor: 1.3,
            ..ReviewableCard::new(1)
        };

        let next = review(&card, ReviewOutcome::incorrect().with_quality(0));
        assert_eq!(next.ease_factor, 1.3);
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        let card = ReviewableCard {
            ease_factor: 0.2,
            interval_days: 0,
            ..ReviewableCard::new(1)
        };

        let next = review(&card, ReviewOutcome::correct().with_quality(99));
        // floor 1.3 + delta for grade 5
        assert!((next.ease_factor - 1.4).abs() < 1e-9);
        assert_eq!(next.interval_days, 1);
    }

    #[test]
    fn test_non_finite_ease_uses_initial_ease() {
        let card = ReviewableCard {
            ease_factor: f64::NAN,
            ..ReviewableCard::new(1)
        };

        let next = review(&card, ReviewOutcome::correct());
        assert!((next.ease_factor - 2.6).abs() < 1e-9);
    }

    #[test]
    fn test_interval_is_capped() {
        let card = ReviewableCard {
            interval_days: u32::MAX,
            ..ReviewableCard::new(1)
        };

        let next = review(&card, ReviewOutcome::correct());
        assert_eq!(next.interval_days, 36_500);
        assert_eq!(next.next_review_at, Some(day0() + Duration::days(36_500)));
    }

    #[test]
    fn test_configured_grades_and_floor() {
        let config = SchedulerConfig {
            correct_grade: 3,
            minimum_ease: 0.5,
            ..SchedulerConfig::default()
        };
        let card = ReviewableCard {
            ease_factor: 1.3,
            ..ReviewableCard::new(1)
        };

        let next = calculate_next_review(&config, &card, ReviewOutcome::correct(), day0());
        // grade 3 lowers the ease, but a configured floor below 1.3 is ignored
        assert_eq!(next.ease_factor, 1.3);
    }

    #[test]
    fn test_ease_delta_table() {
        assert!((ease_delta(5) - 0.1).abs() < 1e-9);
        assert!((ease_delta(4) - 0.0).abs() < 1e-9);
        assert!((ease_delta(3) + 0.14).abs() < 1e-9);
        assert!((ease_delta(0) + 0.8).abs() < 1e-9);
    }
}
