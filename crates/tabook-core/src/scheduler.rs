//! The consultation calendar.
//!
//! All consultations compete for a single staff member's time, so a new
//! booking is checked for overlap against every stored booking regardless of
//! owner. Independently of that, each student holds at most one booking.
//!
//! Bookings are keyed by owner, which makes set membership and the owner's
//! link to the booking one and the same entry: an add or delete updates both
//! or neither.

use std::collections::BTreeMap;

use tracing::debug;

use crate::consultation::Consultation;
use crate::error::{Result, TabookError};
use crate::ids::StudentId;

/// Manager of all active consultations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsultationScheduler {
    by_owner: BTreeMap<StudentId, Consultation>,
}

impl ConsultationScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match membership test.
    pub fn has(&self, consultation: &Consultation) -> bool {
        self.by_owner.get(consultation.owner()) == Some(consultation)
    }

    /// Whether `candidate` intersects any stored consultation.
    pub fn overlaps(&self, candidate: &Consultation) -> bool {
        self.by_owner
            .values()
            .any(|existing| existing.overlaps(candidate))
    }

    /// The booking held by `owner`, if any.
    pub fn consultation_of(&self, owner: &StudentId) -> Option<&Consultation> {
        self.by_owner.get(owner)
    }

    /// Stores `consultation`.
    ///
    /// Checks run in order: exact duplicate, then overlap with any booking,
    /// then whether the owner already holds one. Nothing changes on failure.
    ///
    /// # Errors
    ///
    /// - `TabookError::DuplicateBooking` for an exact duplicate
    /// - `TabookError::TimingOverlap` if the interval intersects a booking
    /// - `TabookError::ConsultationExists` if the owner already holds one
    pub fn add(&mut self, consultation: Consultation) -> Result<()> {
        if self.has(&consultation) {
            return Err(TabookError::DuplicateBooking);
        }
        if self.overlaps(&consultation) {
            return Err(TabookError::TimingOverlap);
        }
        if self.by_owner.contains_key(consultation.owner()) {
            return Err(TabookError::ConsultationExists {
                student: consultation.owner().clone(),
            });
        }

        debug!(owner = %consultation.owner(), "Consultation stored");
        self.by_owner
            .insert(consultation.owner().clone(), consultation);
        Ok(())
    }

    /// Removes and returns the booking held by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `TabookError::NoConsultation` if `owner` holds none.
    pub fn delete(&mut self, owner: &StudentId) -> Result<Consultation> {
        self.by_owner
            .remove(owner)
            .ok_or_else(|| TabookError::NoConsultation {
                student: owner.clone(),
            })
    }

    /// All bookings, ordered by start time.
    pub fn iter(&self) -> impl Iterator<Item = &Consultation> {
        let mut bookings: Vec<&Consultation> = self.by_owner.values().collect();
        bookings.sort_by_key(|c| (c.from(), c.owner().clone()));
        bookings.into_iter()
    }

    /// Number of active bookings.
    pub fn len(&self) -> usize {
        self.by_owner.len()
    }

    /// Returns `true` if there are no bookings.
    pub fn is_empty(&self) -> bool {
        self.by_owner.is_empty()
    }
}
