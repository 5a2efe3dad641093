use serde::{Deserialize, Serialize};

/// Quality grades run from 0 (complete blackout) to 5 (perfect recall).
pub const MIN_QUALITY: i32 = 0;
pub const MAX_QUALITY: i32 = 5;

/// Result of showing a card to the learner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub is_correct: bool,
    /// Self-rated recall quality. When absent the scheduler derives one from
    /// `is_correct`.
    pub quality: Option<i32>,
}

impl ReviewOutcome {
    pub fn correct() -> Self {
        Self {
            is_correct: true,
            quality: None,
        }
    }

    pub fn incorrect() -> Self {
        Self {
            is_correct: false,
            quality: None,
        }
    }

    pub fn with_quality(mut self, quality: i32) -> Self {
        self.quality = Some(quality);
        self
    }
}

/// Clamps any integer into the valid grade range.
pub fn clamp_quality(quality: i32) -> i32 {
    quality.clamp(MIN_QUALITY, MAX_QUALITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let outcome = ReviewOutcome::correct().with_quality(4);
        assert!(outcome.is_correct);
        assert_eq!(outcome.quality, Some(4));

        assert_eq!(ReviewOutcome::incorrect().quality, None);
    }

    #[test]
    fn test_clamp_quality() {
        assert_eq!(clamp_quality(-3), 0);
        assert_eq!(clamp_quality(3), 3);
        assert_eq!(clamp_quality(42), 5);
    }
}
