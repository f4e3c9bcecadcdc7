//! Configuration types for the Tabook engine.
//!
//! The configuration carries the values the engine must not hard-code: the
//! valid range of term weeks for attendance, the consultation length above
//! which an advisory is attached, and where the state snapshot lives.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabookError};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "tabook.json";

/// Default first teaching week.
const fn default_first_week() -> u32 {
    1
}

/// Default last teaching week.
const fn default_last_week() -> u32 {
    13
}

/// Default consultation length, in minutes, before a duration advisory.
const fn default_max_consultation_minutes() -> u32 {
    180
}

/// Default snapshot path.
fn default_data_file() -> String {
    "data/tabook.json".to_string()
}

/// Main configuration for Tabook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Weeks in which attendance may be marked.
    #[serde(default)]
    pub term_weeks: TermWeeks,

    /// Consultations longer than this many minutes carry an advisory.
    #[serde(default = "default_max_consultation_minutes")]
    pub max_consultation_minutes: u32,

    /// Path of the JSON state snapshot.
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            term_weeks: TermWeeks::default(),
            max_consultation_minutes: default_max_consultation_minutes(),
            data_file: default_data_file(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `tabook.json` in the current directory. If found, loads and
    /// validates the configuration. If not found, returns default configuration.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            TabookError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `tabook.json` inside `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        Self::load_from_file(&config_path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `TabookError::ConfigParseError` if the file exists but contains
    /// invalid JSON.
    ///
    /// Returns `TabookError::ConfigValidationError` if the configuration values
    /// are invalid (e.g., an empty week range).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(TabookError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| TabookError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// - `termWeeks.first` must be at least 1
    /// - `termWeeks.first` must not exceed `termWeeks.last`
    /// - `maxConsultationMinutes` must be greater than 0
    /// - `dataFile` must not be empty
    pub fn validate(&self) -> Result<()> {
        if self.term_weeks.first == 0 {
            return Err(TabookError::config_validation(
                "termWeeks.first must be at least 1",
                "Weeks are numbered from 1; set termWeeks.first to 1 or later in your tabook.json",
            ));
        }

        if self.term_weeks.first > self.term_weeks.last {
            return Err(TabookError::config_validation(
                format!(
                    "termWeeks.first ({}) is after termWeeks.last ({})",
                    self.term_weeks.first, self.term_weeks.last
                ),
                "Make sure termWeeks.first is not greater than termWeeks.last in your tabook.json",
            ));
        }

        if self.max_consultation_minutes == 0 {
            return Err(TabookError::config_validation(
                "maxConsultationMinutes must be greater than 0",
                "Set maxConsultationMinutes to at least 1 in your tabook.json",
            ));
        }

        if self.data_file.trim().is_empty() {
            return Err(TabookError::config_validation(
                "dataFile must not be empty",
                "Provide a path for the dataFile in your tabook.json",
            ));
        }

        Ok(())
    }

    /// Consultation length above which an advisory is attached.
    pub fn max_consultation_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.max_consultation_minutes))
    }
}

/// Inclusive range of weeks in which attendance may be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermWeeks {
    /// First valid week.
    #[serde(default = "default_first_week")]
    pub first: u32,

    /// Last valid week.
    #[serde(default = "default_last_week")]
    pub last: u32,
}

impl Default for TermWeeks {
    fn default() -> Self {
        Self {
            first: default_first_week(),
            last: default_last_week(),
        }
    }
}

impl TermWeeks {
    /// Creates a week range.
    pub const fn new(first: u32, last: u32) -> Self {
        Self { first, last }
    }

    /// Whether `week` lies within the range.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabook_core::TermWeeks;
    ///
    /// let term = TermWeeks::new(1, 13);
    /// assert!(term.contains(3));
    /// assert!(!term.contains(0));
    /// assert!(!term.contains(14));
    /// ```
    pub const fn contains(&self, week: u32) -> bool {
        week >= self.first && week <= self.last
    }

    /// Returns `Ok(())` for a valid week, otherwise `InvalidWeek`.
    pub fn check(&self, week: u32) -> Result<()> {
        if self.contains(week) {
            Ok(())
        } else {
            Err(TabookError::InvalidWeek {
                week,
                first: self.first,
                last: self.last,
            })
        }
    }
}
