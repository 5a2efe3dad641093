//! SQLite persistence for decks and their cards
//!
//! Cards carry their repetition state in the same row as their text, plus a
//! `version` column used as an optimistic concurrency token. The store also
//! keeps a simulated "current date" so reviews can be replayed day by day.
//! Scheduling math lives in [`crate::scheduler`]; this module only loads,
//! delegates and writes back.

use crate::error::{Error, Result};
use crate::models::{
    CardId, Deck, DeckCard, DeckStats, Flashcard, ReviewOutcome, ReviewableCard, StoredCard,
};
use crate::scheduler::{Scheduler, select_due};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

const CARD_COLUMNS: &str = "id, deck_name, term, definition, ease_factor, interval_days,
    last_reviewed_at, next_review_at, times_seen, times_correct, times_incorrect, version";

pub struct CardStore {
    conn: Connection,
}

impl CardStore {
    /// Opens (or creates) the database file and its tables.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.init()?;
        debug!("opened card store at {}", path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init()?;
        Ok(store)
    }

    /// Creates tables for decks, cards and app state.
    /// Sets current date to now if not already initialized.
    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS decks (
                name TEXT PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS cards (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                deck_name TEXT NOT NULL REFERENCES decks(name) ON DELETE CASCADE,
                term TEXT NOT NULL,
                definition TEXT NOT NULL,
                ease_factor REAL NOT NULL DEFAULT 2.5,
                interval_days INTEGER NOT NULL DEFAULT 1,
                last_reviewed_at INTEGER,
                next_review_at INTEGER,
                times_seen INTEGER NOT NULL DEFAULT 0,
                times_correct INTEGER NOT NULL DEFAULT 0,
                times_incorrect INTEGER NOT NULL DEFAULT 0,
                version INTEGER NOT NULL DEFAULT 0,
                UNIQUE(deck_name, term)
            );

            CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;

        self.conn.execute(
            "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_date', ?1)",
            params![Utc::now().timestamp().to_string()],
        )?;
        Ok(())
    }

    /// Retrieves the simulated current date.
    pub fn current_date(&self) -> Result<DateTime<Utc>> {
        let value: String = self.conn.query_row(
            "SELECT value FROM app_state WHERE key = 'current_date'",
            [],
            |row| row.get(0),
        )?;
        let secs = value
            .parse::<i64>()
            .map_err(|_| Error::InvalidStoredDate(value.clone()))?;
        from_secs(secs)
    }

    pub fn set_current_date(&self, date: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "UPDATE app_state SET value = ?1 WHERE key = 'current_date'",
            params![date.timestamp().to_string()],
        )?;
        Ok(())
    }

    /// Moves the simulated date forward by 24 hours.
    pub fn advance_day(&self) -> Result<DateTime<Utc>> {
        let next_day = self.current_date()? + Duration::days(1);
        self.set_current_date(next_day)?;
        info!("advanced current date to {}", next_day.format("%Y-%m-%d"));
        Ok(next_day)
    }

    /// Creates a deck. Returns false when it already existed.
    pub fn new_deck(&self, name: &str) -> Result<bool> {
        let created = self
            .conn
            .execute("INSERT OR IGNORE INTO decks (name) VALUES (?1)", params![name])?
            > 0;
        if created {
            info!("deck '{name}' created");
        }
        Ok(created)
    }

    pub fn deck_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM decks ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    fn ensure_deck(&self, name: &str) -> Result<()> {
        let exists = self
            .conn
            .query_row("SELECT 1 FROM decks WHERE name = ?1", params![name], |_| Ok(()))
            .optional()?
            .is_some();
        if exists {
            Ok(())
        } else {
            Err(Error::DeckNotFound(name.to_string()))
        }
    }

    /// Adds a never-reviewed flashcard to a deck, starting from the
    /// scheduler's initial ease.
    ///
    /// If the deck already holds the same term, the existing card's id is
    /// returned and nothing changes.
    pub fn add_flashcard(
        &self,
        deck_name: &str,
        term: &str,
        definition: &str,
        scheduler: &Scheduler,
    ) -> Result<CardId> {
        self.insert_card(
            deck_name,
            &Flashcard::new(term, definition),
            &scheduler.new_card(0),
        )
    }

    /// Inserts a card with an explicit repetition state. The state's id is
    /// ignored; the database assigns one.
    pub fn insert_card(
        &self,
        deck_name: &str,
        flashcard: &Flashcard,
        schedule: &ReviewableCard,
    ) -> Result<CardId> {
        self.ensure_deck(deck_name)?;

        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO cards (deck_name, term, definition, ease_factor, interval_days,
                last_reviewed_at, next_review_at, times_seen, times_correct, times_incorrect)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                deck_name,
                flashcard.term,
                flashcard.definition,
                schedule.ease_factor,
                schedule.interval_days,
                schedule.last_reviewed_at.map(|t| t.timestamp()),
                schedule.next_review_at.map(|t| t.timestamp()),
                schedule.times_seen,
                schedule.times_correct,
                schedule.times_incorrect,
            ],
        )?;

        let id: CardId = self.conn.query_row(
            "SELECT id FROM cards WHERE deck_name = ?1 AND term = ?2",
            params![deck_name, flashcard.term],
            |row| row.get(0),
        )?;

        if inserted > 0 {
            debug!("card {id} added to deck '{deck_name}'");
        }
        Ok(id)
    }

    pub fn delete_card(&self, id: CardId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM cards WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(Error::CardNotFound(id));
        }
        info!("card {id} deleted");
        Ok(())
    }

    pub fn load_card(&self, id: CardId) -> Result<StoredCard> {
        let sql = format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], CardRow::from_row)
            .optional()?
            .ok_or(Error::CardNotFound(id))?
            .into_stored()
    }

    /// All cards of a deck in insertion order.
    pub fn cards_for_deck(&self, deck_name: &str) -> Result<Vec<StoredCard>> {
        self.ensure_deck(deck_name)?;

        let sql = format!("SELECT {CARD_COLUMNS} FROM cards WHERE deck_name = ?1 ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![deck_name], CardRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(CardRow::into_stored).collect()
    }

    /// Cards of a deck due at `now`, in review queue order.
    pub fn due_cards(
        &self,
        deck_name: &str,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Result<Vec<StoredCard>> {
        let stored = self.cards_for_deck(deck_name)?;
        let schedules: Vec<ReviewableCard> = stored.iter().map(|c| c.schedule.clone()).collect();
        let queue = select_due(&schedules, now, limit);

        let mut by_id: HashMap<CardId, StoredCard> =
            stored.into_iter().map(|c| (c.id(), c)).collect();
        let due: Vec<StoredCard> = queue
            .iter()
            .filter_map(|card| by_id.remove(&card.id))
            .collect();

        debug!("{} cards due in deck '{deck_name}'", due.len());
        Ok(due)
    }

    /// Writes a card's repetition state if its row still has
    /// `expected_version`. Returns the new version.
    pub fn save_schedule(&self, card: &ReviewableCard, expected_version: i64) -> Result<i64> {
        let updated = self.conn.execute(
            "UPDATE cards
             SET ease_factor = ?1, interval_days = ?2, last_reviewed_at = ?3, next_review_at = ?4,
                 times_seen = ?5, times_correct = ?6, times_incorrect = ?7, version = version + 1
             WHERE id = ?8 AND version = ?9",
            params![
                card.ease_factor,
                card.interval_days,
                card.last_reviewed_at.map(|t| t.timestamp()),
                card.next_review_at.map(|t| t.timestamp()),
                card.times_seen,
                card.times_correct,
                card.times_incorrect,
                card.id,
                expected_version,
            ],
        )?;

        if updated == 0 {
            // distinguish a missing row from a lost race
            self.load_card(card.id)?;
            warn!("card {} changed since version {expected_version}", card.id);
            return Err(Error::Conflict(card.id));
        }
        Ok(expected_version + 1)
    }

    /// Loads a card, runs the scheduler on it and stores the result in one
    /// transaction.
    pub fn record_review(
        &self,
        id: CardId,
        outcome: ReviewOutcome,
        scheduler: &Scheduler,
        now: DateTime<Utc>,
    ) -> Result<ReviewableCard> {
        let tx = self.conn.unchecked_transaction()?;

        let stored = self.load_card(id)?;
        let next = scheduler.record_review(&stored.schedule, outcome, now);
        self.save_schedule(&next, stored.version)?;

        tx.commit()?;
        info!(
            "card {id} reviewed ({}), next in {} day(s)",
            if outcome.is_correct { "correct" } else { "incorrect" },
            next.interval_days
        );
        Ok(next)
    }

    pub fn deck_stats(&self, deck_name: &str, now: DateTime<Utc>) -> Result<DeckStats> {
        let cards = self.cards_for_deck(deck_name)?;
        Ok(DeckStats::from_cards(cards.iter().map(|c| &c.schedule), now))
    }

    /// Imports a deck, creating it if needed. Cards without a schedule start
    /// as new cards of `scheduler`. Terms already present in the deck are
    /// skipped. Returns how many cards were added.
    pub fn import_deck(&self, deck: &Deck, scheduler: &Scheduler) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        self.new_deck(&deck.name)?;

        let before = self.cards_for_deck(&deck.name)?.len();
        for card in &deck.cards {
            let schedule = card
                .schedule
                .clone()
                .unwrap_or_else(|| scheduler.new_card(0));
            self.insert_card(&deck.name, &card.flashcard, &schedule)?;
        }
        let added = self.cards_for_deck(&deck.name)?.len() - before;

        tx.commit()?;
        info!("imported {added} card(s) into deck '{}'", deck.name);
        Ok(added)
    }

    pub fn export_deck(&self, deck_name: &str) -> Result<Deck> {
        let cards = self
            .cards_for_deck(deck_name)?
            .into_iter()
            .map(|c| DeckCard {
                flashcard: c.flashcard,
                schedule: Some(c.schedule),
            })
            .collect();

        Ok(Deck {
            name: deck_name.to_string(),
            cards,
        })
    }
}

/// Raw column values; timestamps are converted after leaving rusqlite.
struct CardRow {
    id: CardId,
    deck_name: String,
    term: String,
    definition: String,
    ease_factor: f64,
    interval_days: u32,
    last_reviewed_at: Option<i64>,
    next_review_at: Option<i64>,
    times_seen: u32,
    times_correct: u32,
    times_incorrect: u32,
    version: i64,
}

impl CardRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            deck_name: row.get(1)?,
            term: row.get(2)?,
            definition: row.get(3)?,
            ease_factor: row.get(4)?,
            interval_days: row.get(5)?,
            last_reviewed_at: row.get(6)?,
            next_review_at: row.get(7)?,
            times_seen: row.get(8)?,
            times_correct: row.get(9)?,
            times_incorrect: row.get(10)?,
            version: row.get(11)?,
        })
    }

    fn into_stored(self) -> Result<StoredCard> {
        Ok(StoredCard {
            deck_name: self.deck_name,
            flashcard: Flashcard {
                term: self.term,
                definition: self.definition,
            },
            schedule: ReviewableCard {
                id: self.id,
                ease_factor: self.ease_factor,
                interval_days: self.interval_days,
                last_reviewed_at: self.last_reviewed_at.map(from_secs).transpose()?,
                next_review_at: self.next_review_at.map(from_secs).transpose()?,
                times_seen: self.times_seen,
                times_correct: self.times_correct,
                times_incorrect: self.times_incorrect,
            },
            version: self.version,
        })
    }
}

fn from_secs(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or(Error::InvalidTimestamp(secs))
}
