//! Configuration for spaced-study, read from `config.toml` in the platform
//! config directory. Every field has a default so a partial or missing file
//! still yields a usable configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub study: StudyConfig,
}

impl Config {
    /// Loads the user config, falling back to defaults when it is missing or
    /// unreadable.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("ignoring config at {}: {e}", path.display());
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "spaced-study")
            .map(|d| d.config_dir().join("config.toml"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "spaced-study")
        .map(|d| d.data_dir().join("cards.sqlite3"))
        .unwrap_or_else(|| PathBuf::from("db.sqlite3"))
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Tunables for the review calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_initial_ease")]
    pub initial_ease: f64,
    /// Floor for the ease factor. Values below 1.3 are raised to 1.3.
    #[serde(default = "default_minimum_ease")]
    pub minimum_ease: f64,
    /// Grade assumed for a correct answer without an explicit quality.
    #[serde(default = "default_correct_grade")]
    pub correct_grade: i32,
    /// Grade assumed for an incorrect answer without an explicit quality.
    #[serde(default = "default_incorrect_grade")]
    pub incorrect_grade: i32,
    /// Upper bound on any interval, keeps due dates representable.
    #[serde(default = "default_max_interval")]
    pub max_interval_days: u32,
}

fn default_initial_ease() -> f64 {
    2.5
}
fn default_minimum_ease() -> f64 {
    1.3
}
fn default_correct_grade() -> i32 {
    5
}
fn default_incorrect_grade() -> i32 {
    2
}
fn default_max_interval() -> u32 {
    36_500
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_ease: default_initial_ease(),
            minimum_ease: default_minimum_ease(),
            correct_grade: default_correct_grade(),
            incorrect_grade: default_incorrect_grade(),
            max_interval_days: default_max_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Maximum number of cards pulled into one session.
    #[serde(default = "default_due_limit")]
    pub due_limit: Option<usize>,
}

fn default_due_limit() -> Option<usize> {
    Some(50)
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            due_limit: default_due_limit(),
        }
    }
}
