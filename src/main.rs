//! spaced-study CLI
//!
//! Manages decks and records reviews against the card store configured in
//! `config.toml`.

use clap::{Parser, Subcommand, ValueEnum};
use spaced_study::export::json::{export_json_to_path, import_json};
use spaced_study::{CardId, CardStore, Config, Flashcard, ReviewOutcome, Scheduler};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

const SAMPLE_DECK: &str = "Polish Vocabulary";

/// Spaced repetition flashcards
#[derive(Parser, Debug)]
#[command(name = "spaced-study")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Schedule flashcard reviews with an SM-2 style algorithm")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// List cards due at the current date
    Due {
        /// Only this deck
        deck: Option<String>,
    },

    /// Record a review for a card
    Review {
        /// Card id
        id: CardId,

        /// Whether the card was recalled
        result: ReviewResult,

        /// Self-rated recall quality
        #[arg(value_parser = clap::value_parser!(i32).range(0..=5))]
        grade: Option<i32>,
    },

    /// Add a card, creating the deck if needed
    Add {
        deck: String,
        term: String,
        definition: String,
    },

    /// Show deck statistics as JSON
    Stats { deck: String },

    /// Move the current date forward one day
    AdvanceDay,

    /// Write a deck to a JSON file
    Export { deck: String, path: PathBuf },

    /// Read a deck from a JSON file
    Import { path: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum ReviewResult {
    Correct,
    Incorrect,
}

impl ReviewResult {
    fn outcome(self, grade: Option<i32>) -> ReviewOutcome {
        let outcome = match self {
            Self::Correct => ReviewOutcome::correct(),
            Self::Incorrect => ReviewOutcome::incorrect(),
        };
        match grade {
            Some(grade) => outcome.with_quality(grade),
            None => outcome,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli.command.unwrap_or(Command::Due { deck: None })) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> spaced_study::Result<()> {
    let config = Config::load();
    let store = CardStore::open(&config.database.path)?;
    let scheduler = Scheduler::new(config.scheduler);

    if store.deck_names()?.is_empty() {
        seed_sample_deck(&store, &scheduler)?;
    }

    match command {
        Command::Due { deck: Some(deck) } => print_due(&store, &deck, config.study.due_limit)?,
        Command::Due { deck: None } => {
            for deck in store.deck_names()? {
                print_due(&store, &deck, config.study.due_limit)?;
            }
            println!("current date: {}", store.current_date()?.format("%Y-%m-%d"));
        }
        Command::Review { id, result, grade } => {
            let now = store.current_date()?;
            let card = store.record_review(id, result.outcome(grade), &scheduler, now)?;
            println!(
                "card {id}: next review in {} day(s), ease {:.2}",
                card.interval_days, card.ease_factor
            );
        }
        Command::Add {
            deck,
            term,
            definition,
        } => {
            store.new_deck(&deck)?;
            let flashcard = Flashcard::new(term, definition);
            let id = store.insert_card(&deck, &flashcard, &scheduler.new_card(0))?;
            println!("card {id} in '{deck}'");
        }
        Command::Stats { deck } => {
            let stats = store.deck_stats(&deck, store.current_date()?)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::AdvanceDay => {
            let now = store.advance_day()?;
            println!("current date: {}", now.format("%Y-%m-%d"));
        }
        Command::Export { deck, path } => {
            export_json_to_path(&store.export_deck(&deck)?, path)?;
        }
        Command::Import { path } => {
            let added = store.import_deck(&import_json(path)?, &scheduler)?;
            println!("{added} card(s) added");
        }
    }
    Ok(())
}

fn seed_sample_deck(store: &CardStore, scheduler: &Scheduler) -> spaced_study::Result<()> {
    store.new_deck(SAMPLE_DECK)?;
    for (term, definition) in [
        ("cześć", "hello"),
        ("dziękuję", "thank you"),
        ("proszę", "please"),
    ] {
        store.add_flashcard(SAMPLE_DECK, term, definition, scheduler)?;
    }
    println!("Sample data created!");
    Ok(())
}

fn print_due(store: &CardStore, deck: &str, limit: Option<usize>) -> spaced_study::Result<()> {
    let now = store.current_date()?;
    let due = store.due_cards(deck, now, limit)?;
    println!("{deck} ({} due)", due.len());
    for card in due {
        let when = card
            .schedule
            .next_review_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "new".to_string());
        println!(
            "  [{}] {} = {} ({when})",
            card.id(),
            card.flashcard.term,
            card.flashcard.definition
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("spaced-study").chain(args.iter().copied()))
    }

    #[test]
    fn test_review_with_grade() {
        let cli = parse(&["review", "3", "correct", "4"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Review {
                id: 3,
                result: ReviewResult::Correct,
                grade: Some(4),
            })
        );
    }

    #[test]
    fn test_extra_arguments_are_rejected() {
        let err = parse(&["review", "3", "correct", "4", "junk"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_invalid_grade_and_result() {
        assert_eq!(
            parse(&["review", "3", "correct", "9"]).unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
        assert_eq!(
            parse(&["review", "3", "maybe"]).unwrap_err().kind(),
            ErrorKind::InvalidValue
        );
    }

    #[test]
    fn test_help_is_not_a_failure() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_no_command_defaults_to_due() {
        assert_eq!(parse(&[]).unwrap().command, None);
        assert_eq!(
            parse(&["due", "Polish"]).unwrap().command,
            Some(Command::Due {
                deck: Some("Polish".to_string())
            })
        );
    }

    #[test]
    fn test_outcome_from_result() {
        assert_eq!(
            ReviewResult::Incorrect.outcome(Some(1)),
            ReviewOutcome::incorrect().with_quality(1)
        );
        assert_eq!(ReviewResult::Correct.outcome(None), ReviewOutcome::correct());
    }
}
