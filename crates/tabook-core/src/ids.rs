//! Validated identifier types.
//!
//! [`StudentId`] keys ownership of consultations and roster membership;
//! [`SlotId`] keys tutorials in the registry. Both normalize to uppercase on
//! construction so that `e1234567` and `E1234567` name the same student.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TabookError;

static STUDENT_ID_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^E[0-9]{7}$").ok());

static SLOT_ID_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[A-Z][0-9]{2}$").ok());

fn matches(pattern: &Lazy<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

/// A student's NUSNET identifier, e.g. `E1234567`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentId(String);

impl StudentId {
    /// Validates and normalizes a student identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabook_core::StudentId;
    ///
    /// let id = StudentId::new("e1234567").unwrap();
    /// assert_eq!(id.as_str(), "E1234567");
    /// assert!(StudentId::new("A1234567").is_err());
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, TabookError> {
        let normalized = value.as_ref().trim().to_uppercase();
        if matches(&STUDENT_ID_PATTERN, &normalized) {
            Ok(Self(normalized))
        } else {
            Err(TabookError::InvalidStudentId {
                value: value.as_ref().to_string(),
            })
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StudentId {
    type Err = TabookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for StudentId {
    type Error = TabookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StudentId> for String {
    fn from(id: StudentId) -> Self {
        id.0
    }
}

/// Identifier of a recurring tutorial session, e.g. `T03`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotId(String);

impl SlotId {
    /// Validates and normalizes a slot identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabook_core::SlotId;
    ///
    /// assert_eq!(SlotId::new("t03").unwrap().as_str(), "T03");
    /// assert!(SlotId::new("T3").is_err());
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, TabookError> {
        let normalized = value.as_ref().trim().to_uppercase();
        if matches(&SLOT_ID_PATTERN, &normalized) {
            Ok(Self(normalized))
        } else {
            Err(TabookError::InvalidSlotId {
                value: value.as_ref().to_string(),
            })
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SlotId {
    type Err = TabookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SlotId {
    type Error = TabookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SlotId> for String {
    fn from(id: SlotId) -> Self {
        id.0
    }
}
