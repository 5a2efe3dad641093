//! Flashcard is a pair <term, definition>. Only text is used in terms and definitions
use super::{CardId, ReviewableCard};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
}

impl Flashcard {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }
}

/// A flashcard as persisted: its text, owning deck, repetition state and the
/// row version used for optimistic concurrency.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredCard {
    pub deck_name: String,
    pub flashcard: Flashcard,
    pub schedule: ReviewableCard,
    pub version: i64,
}

impl StoredCard {
    pub fn id(&self) -> CardId {
        self.schedule.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flashcard_creation() {
        let card = Flashcard::new("hello", "cześć");

        assert_eq!(card.term, "hello");
        assert_eq!(card.definition, "cześć");
    }

    #[test]
    fn test_stored_card_id_comes_from_schedule() {
        let stored = StoredCard {
            deck_name: "Polish".to_string(),
            flashcard: Flashcard::new("dom", "house"),
            schedule: ReviewableCard::new(42),
            version: 0,
        };

        assert_eq!(stored.id(), 42);
    }
}
