//! Error type shared by the store, configuration and import/export layers.
//! The scheduler itself never fails.

use crate::models::CardId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
    #[error("card {0} not found")]
    CardNotFound(CardId),
    #[error("deck '{0}' not found")]
    DeckNotFound(String),
    #[error("card {0} was modified concurrently")]
    Conflict(CardId),
    #[error("stored current date '{0}' is not a unix timestamp")]
    InvalidStoredDate(String),
    #[error("stored timestamp {0} is out of range")]
    InvalidTimestamp(i64),
}

pub type Result<T> = std::result::Result<T, Error>;
