//! Consultation bookings.
//!
//! A [`Consultation`] is a half-open interval `[from, to)` owned by a single
//! student. Timestamps are naive local times, matching the wall clock the
//! teaching staff work against.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TabookError};
use crate::ids::StudentId;

/// Display format for consultation timestamps, e.g. `10 Oct 2025 14:00`.
pub const DISPLAY_FORMAT: &str = "%d %b %Y %H:%M";

/// A single time-bounded booking owned by one student.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawConsultation")]
pub struct Consultation {
    owner: StudentId,
    from: NaiveDateTime,
    to: NaiveDateTime,
}

/// Unvalidated wire shape, checked through [`Consultation::new`].
#[derive(Deserialize)]
struct RawConsultation {
    owner: StudentId,
    from: NaiveDateTime,
    to: NaiveDateTime,
}

impl TryFrom<RawConsultation> for Consultation {
    type Error = TabookError;

    fn try_from(raw: RawConsultation) -> Result<Self> {
        Self::new(raw.owner, raw.from, raw.to)
    }
}

impl Consultation {
    /// Creates a consultation, rejecting intervals where `from >= to`.
    pub fn new(owner: StudentId, from: NaiveDateTime, to: NaiveDateTime) -> Result<Self> {
        if from >= to {
            return Err(TabookError::InvalidTimeRange);
        }
        Ok(Self { owner, from, to })
    }

    /// The student who owns this booking.
    pub const fn owner(&self) -> &StudentId {
        &self.owner
    }

    /// Inclusive start of the booking.
    pub const fn from(&self) -> NaiveDateTime {
        self.from
    }

    /// Exclusive end of the booking.
    pub const fn to(&self) -> NaiveDateTime {
        self.to
    }

    /// Length of the booking.
    pub fn duration(&self) -> Duration {
        self.to - self.from
    }

    /// Whether two bookings share at least one instant.
    ///
    /// Touching endpoints do not overlap: `[13:00, 14:00)` and
    /// `[14:00, 16:00)` are disjoint.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.from < other.to && other.from < self.to
    }
}

impl fmt::Display for Consultation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} - {}",
            self.owner,
            self.from.format(DISPLAY_FORMAT),
            self.to.format(DISPLAY_FORMAT)
        )
    }
}
