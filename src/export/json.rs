//! JSON import/export module for flashcard decks.
//! Decks are written with each card's repetition state so progress survives a round trip.

use crate::error::Result;
use crate::models::Deck;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use tracing::info;

/// Exports a deck to a JSON file at the specified path.
pub fn export_json_to_path(deck: &Deck, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json_string = serde_json::to_string_pretty(deck)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    info!("deck '{}' exported to '{}'", deck.name, path.display());
    Ok(())
}

/// Imports a deck from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_json(path: impl AsRef<Path>) -> Result<Deck> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let deck: Deck = serde_json::from_reader(reader)?;
    info!("deck '{}' imported from '{}'", deck.name, path.display());
    Ok(deck)
}
