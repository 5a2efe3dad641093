//! Deck is a named set of flashcards, the unit of import and export.
use super::{Flashcard, ReviewableCard};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub cards: Vec<DeckCard>,
}

/// One card of an exported deck. A missing schedule imports as a new card;
/// the schedule's id is reassigned by the store on import.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeckCard {
    #[serde(flatten)]
    pub flashcard: Flashcard,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ReviewableCard>,
}

impl Deck {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cards: Vec::new(),
        }
    }

    pub fn with_card(mut self, term: impl Into<String>, definition: impl Into<String>) -> Self {
        self.cards.push(DeckCard {
            flashcard: Flashcard::new(term, definition),
            schedule: None,
        });
        self
    }
}
