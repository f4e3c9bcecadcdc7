//! Error types for the Tabook engine.
//!
//! Every invariant violation detected by the scheduler, the tutorial registry
//! or an attendance sheet is returned as a [`TabookError`] value. The
//! `Display` output of each variant is the message shown to the user, and
//! [`TabookError::kind`] groups the variants into the coarse taxonomy that
//! callers branch on.

use std::path::PathBuf;

use crate::ids::{SlotId, StudentId};

/// A specialized `Result` type for Tabook operations.
pub type Result<T> = std::result::Result<T, TabookError>;

/// Errors that can occur while running Tabook commands.
#[derive(Debug, thiserror::Error)]
pub enum TabookError {
    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// The referenced student is not in the person directory.
    #[error("Student does not exist: {student}")]
    StudentNotFound {
        /// Identifier that was looked up.
        student: StudentId,
    },

    /// No tutorial is registered on the referenced slot.
    #[error("Tutorial not found for slot {slot}")]
    TutorialNotFound {
        /// Slot that was looked up.
        slot: SlotId,
    },

    // ========================================================================
    // Consultation Errors
    // ========================================================================
    /// The student already holds a consultation.
    #[error("Student already has a scheduled consultation")]
    ConsultationExists {
        /// Owner of the existing consultation.
        student: StudentId,
    },

    /// The student holds no consultation to delete.
    #[error("Student does not have an existing consultation")]
    NoConsultation {
        /// Student without a booking.
        student: StudentId,
    },

    /// The candidate interval intersects an existing consultation.
    #[error("Consultation timing overlaps with existing consultation")]
    TimingOverlap,

    /// The candidate is identical to a stored consultation.
    #[error("This consultation already exists")]
    DuplicateBooking,

    // ========================================================================
    // Tutorial and Attendance Errors
    // ========================================================================
    /// Week falls outside the configured term range.
    #[error("Invalid Week: {week} (valid weeks are {first} to {last})")]
    InvalidWeek {
        /// Week that was requested.
        week: u32,
        /// First valid week.
        first: u32,
        /// Last valid week.
        last: u32,
    },

    /// The student is not on the tutorial's roster.
    #[error("Student {student} is not in tutorial {slot}")]
    NotInTutorial {
        /// Student that was addressed.
        student: StudentId,
        /// Tutorial slot that was addressed.
        slot: SlotId,
    },

    /// The student is already on the tutorial's roster.
    #[error("Student {student} is already in tutorial {slot}")]
    AlreadyEnrolled {
        /// Student that was addressed.
        student: StudentId,
        /// Tutorial slot that was addressed.
        slot: SlotId,
    },

    /// A tutorial already occupies the slot.
    #[error("A tutorial is already registered for slot {slot}")]
    DuplicateSlot {
        /// The occupied slot.
        slot: SlotId,
    },

    // ========================================================================
    // Input Validation Errors
    // ========================================================================
    /// Student identifier does not match the expected format.
    #[error("Invalid NUSNET ID '{value}': must be 'E' followed by 7 digits")]
    InvalidStudentId {
        /// The rejected input.
        value: String,
    },

    /// Slot identifier does not match the expected format.
    #[error("Invalid slot '{value}': must be a letter followed by 2 digits (e.g. T03)")]
    InvalidSlotId {
        /// The rejected input.
        value: String,
    },

    /// A consultation whose start is not before its end.
    #[error("Consultation start time must be before end time")]
    InvalidTimeRange,

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your tabook.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Storage Errors
    // ========================================================================
    /// State file is malformed or violates an engine invariant.
    #[error("Corrupted state file '{path}': {message}\n\nSuggestion: Fix the file by hand or remove it to start fresh")]
    StateFileCorrupted {
        /// Path to the corrupted state file.
        path: PathBuf,
        /// Description of the corruption.
        message: String,
    },

    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse categories of [`TabookError`] for structured handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced student, tutorial, or consultation does not exist.
    NotFound,
    /// Student already holds a consultation, or holds none.
    OwnershipConflict,
    /// Candidate interval intersects an existing consultation.
    TimingOverlap,
    /// Candidate is an exact duplicate of an existing consultation.
    DuplicateBooking,
    /// Week outside the configured range.
    InvalidWeek,
    /// Student enrollment does not match the request.
    RosterMismatch,
    /// Slot is already occupied by a tutorial.
    DuplicateSlot,
    /// Malformed identifier or time range.
    InvalidInput,
    /// Configuration could not be loaded.
    Config,
    /// State could not be read or written.
    Storage,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::OwnershipConflict => write!(f, "ownership_conflict"),
            Self::TimingOverlap => write!(f, "timing_overlap"),
            Self::DuplicateBooking => write!(f, "duplicate_booking"),
            Self::InvalidWeek => write!(f, "invalid_week"),
            Self::RosterMismatch => write!(f, "roster_mismatch"),
            Self::DuplicateSlot => write!(f, "duplicate_slot"),
            Self::InvalidInput => write!(f, "invalid_input"),
            Self::Config => write!(f, "config"),
            Self::Storage => write!(f, "storage"),
        }
    }
}

impl TabookError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `StateFileCorrupted` error.
    #[must_use]
    pub fn state_corrupted(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StateFileCorrupted {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::StudentNotFound { .. } | Self::TutorialNotFound { .. } => ErrorKind::NotFound,
            Self::ConsultationExists { .. } | Self::NoConsultation { .. } => {
                ErrorKind::OwnershipConflict
            }
            Self::TimingOverlap => ErrorKind::TimingOverlap,
            Self::DuplicateBooking => ErrorKind::DuplicateBooking,
            Self::InvalidWeek { .. } => ErrorKind::InvalidWeek,
            Self::NotInTutorial { .. } | Self::AlreadyEnrolled { .. } => ErrorKind::RosterMismatch,
            Self::DuplicateSlot { .. } => ErrorKind::DuplicateSlot,
            Self::InvalidStudentId { .. } | Self::InvalidSlotId { .. } | Self::InvalidTimeRange => {
                ErrorKind::InvalidInput
            }
            Self::ConfigParseError { .. } | Self::ConfigValidationError { .. } => ErrorKind::Config,
            Self::StateFileCorrupted { .. } | Self::Io(_) | Self::Json(_) => ErrorKind::Storage,
        }
    }

    /// Returns `true` if the error was caused by the request itself and the
    /// engine state is untouched.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Config | ErrorKind::Storage)
    }
}
