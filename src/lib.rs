pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod scheduler;
pub mod session;

pub use config::{Config, SchedulerConfig};
pub use database::CardStore;
pub use error::{Error, Result};
pub use models::{CardId, Deck, DeckStats, Flashcard, ReviewOutcome, ReviewableCard, StoredCard};
pub use scheduler::{Scheduler, record_review, select_due};
pub use session::StudySession;
