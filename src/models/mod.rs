pub mod deck;
pub mod flashcard;
pub mod review_outcome;
pub mod reviewable_card;
pub mod stats;

pub use deck::{Deck, DeckCard};
pub use flashcard::{Flashcard, StoredCard};
pub use review_outcome::ReviewOutcome;
pub use reviewable_card::{CardId, ReviewableCard};
pub use stats::DeckStats;
