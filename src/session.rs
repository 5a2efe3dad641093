//! Study session over the cards due in one deck.
//! Cards answered incorrectly are repeated in later rounds until every card has been recalled.

use crate::database::CardStore;
use crate::error::Result;
use crate::models::{ReviewOutcome, StoredCard};
use crate::scheduler::Scheduler;
use tracing::{debug, info};

/// A due card plus its progress in the current round.
#[derive(Clone, Debug)]
pub struct SessionCard {
    pub card: StoredCard,
    pub answered: bool,
    pub passed: bool,
}

pub struct StudySession {
    deck_name: String,
    scheduler: Scheduler,
    cards: Vec<SessionCard>,
    round_cards: Vec<usize>,
    current_index: usize,
    show_definition: bool,
    round_number: usize,
}

impl StudySession {
    /// Starts a session with the cards due at the store's current date.
    pub fn start(
        store: &CardStore,
        deck_name: &str,
        scheduler: Scheduler,
        limit: Option<usize>,
    ) -> Result<Self> {
        let now = store.current_date()?;
        let cards: Vec<SessionCard> = store
            .due_cards(deck_name, now, limit)?
            .into_iter()
            .map(|card| SessionCard {
                card,
                answered: false,
                passed: false,
            })
            .collect();

        info!("session for '{deck_name}' started with {} card(s)", cards.len());
        Ok(Self {
            deck_name: deck_name.to_string(),
            scheduler,
            round_cards: (0..cards.len()).collect(),
            cards,
            current_index: 0,
            show_definition: false,
            round_number: 1,
        })
    }

    /// The card to show next, or `None` once the session is completed.
    pub fn current_card(&self) -> Option<&StoredCard> {
        if self.is_completed() {
            return None;
        }
        self.round_cards
            .get(self.current_index)
            .and_then(|&idx| self.cards.get(idx))
            .map(|entry| &entry.card)
    }

    pub fn show_definition(&self) -> bool {
        self.show_definition
    }

    pub fn toggle_definition(&mut self) {
        self.show_definition = !self.show_definition;
    }

    /// Records the answer for the current card and persists its new schedule.
    /// Does nothing once the session is completed or when the current card
    /// was already answered in this round.
    pub fn answer(&mut self, store: &CardStore, outcome: ReviewOutcome) -> Result<()> {
        if self.is_completed() {
            return Ok(());
        }
        let Some(&idx) = self.round_cards.get(self.current_index) else {
            return Ok(());
        };
        let Some(entry) = self.cards.get_mut(idx) else {
            return Ok(());
        };
        if entry.answered {
            debug!("card {} already answered this round", entry.card.id());
            return Ok(());
        }

        let now = store.current_date()?;
        let schedule = store.record_review(entry.card.id(), outcome, &self.scheduler, now)?;
        entry.card.schedule = schedule;
        entry.card.version += 1;
        entry.answered = true;
        entry.passed = outcome.is_correct;
        Ok(())
    }

    pub fn next_card(&mut self) {
        if self.current_index + 1 < self.round_cards.len() {
            self.current_index += 1;
            self.show_definition = false;
        } else {
            self.start_next_round();
        }
    }

    /// Starts a new round with the cards that were not recalled. When every
    /// card passed, the round is left as is and the session is complete.
    fn start_next_round(&mut self) {
        let failed: Vec<usize> = self
            .round_cards
            .iter()
            .copied()
            .filter(|&idx| self.cards.get(idx).is_some_and(|entry| !entry.passed))
            .collect();

        if failed.is_empty() {
            return;
        }

        for &idx in &failed {
            if let Some(entry) = self.cards.get_mut(idx) {
                entry.answered = false;
            }
        }
        self.round_cards = failed;
        self.current_index = 0;
        self.show_definition = false;
        self.round_number += 1;
        debug!(
            "round {} of '{}' with {} card(s)",
            self.round_number,
            self.deck_name,
            self.round_cards.len()
        );
    }

    pub fn round_number(&self) -> usize {
        self.round_number
    }

    pub fn passed_count(&self) -> usize {
        self.round_cards
            .iter()
            .filter(|&&idx| self.cards.get(idx).is_some_and(|entry| entry.passed))
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.round_cards.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.passed_count()
    }

    pub fn is_completed(&self) -> bool {
        self.passed_count() == self.total_count()
    }

    pub fn phase_message(&self) -> String {
        if self.round_number == 1 {
            format!("Round {}: {} cards", self.round_number, self.total_count())
        } else {
            format!(
                "Round {} (Review): {} cards to retry",
                self.round_number,
                self.total_count()
            )
        }
    }
}
