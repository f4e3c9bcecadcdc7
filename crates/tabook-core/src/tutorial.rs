//! Tutorial sessions.
//!
//! A [`Tutorial`] binds a slot to its roster of students and to the
//! attendance sheet it exclusively owns. All writes to the sheet go through
//! the tutorial so that week and roster checks cannot be bypassed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::attendance::{AttendanceSheet, AttendanceStatus};
use crate::config::TermWeeks;
use crate::error::{Result, TabookError};
use crate::ids::{SlotId, StudentId};

/// A recurring tutorial session identified by its slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tutorial {
    slot: SlotId,

    #[serde(default)]
    roster: BTreeSet<StudentId>,

    #[serde(default)]
    attendance: AttendanceSheet,
}

impl Tutorial {
    /// Creates a tutorial with an empty roster and an empty attendance sheet.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabook_core::{SlotId, Tutorial};
    ///
    /// let tutorial = Tutorial::new(SlotId::new("T03").unwrap());
    /// assert_eq!(tutorial.slot().as_str(), "T03");
    /// assert_eq!(tutorial.roster().count(), 0);
    /// assert!(tutorial.attendance().is_empty());
    /// ```
    pub fn new(slot: SlotId) -> Self {
        Self {
            slot,
            roster: BTreeSet::new(),
            attendance: AttendanceSheet::new(),
        }
    }

    /// The slot this tutorial occupies.
    pub const fn slot(&self) -> &SlotId {
        &self.slot
    }

    /// Enrolled students, in identifier order.
    pub fn roster(&self) -> impl Iterator<Item = &StudentId> {
        self.roster.iter()
    }

    /// Read-only view of the attendance sheet.
    pub const fn attendance(&self) -> &AttendanceSheet {
        &self.attendance
    }

    /// Whether `student` is on the roster.
    pub fn has_student(&self, student: &StudentId) -> bool {
        self.roster.contains(student)
    }

    /// Adds `student` to the roster.
    ///
    /// # Errors
    ///
    /// Returns `TabookError::AlreadyEnrolled` if the student is already listed.
    pub fn enroll(&mut self, student: StudentId) -> Result<()> {
        if self.roster.contains(&student) {
            return Err(TabookError::AlreadyEnrolled {
                student,
                slot: self.slot.clone(),
            });
        }
        self.roster.insert(student);
        Ok(())
    }

    /// Records `status` for `student` in `week`, replacing any earlier mark.
    ///
    /// The week is checked before the roster.
    ///
    /// # Errors
    ///
    /// Returns `TabookError::InvalidWeek` if `week` is outside `term`, and
    /// `TabookError::NotInTutorial` if the student is not enrolled.
    pub fn mark_attendance(
        &mut self,
        week: u32,
        student: &StudentId,
        status: AttendanceStatus,
        term: &TermWeeks,
    ) -> Result<()> {
        term.check(week)?;
        if !self.has_student(student) {
            return Err(TabookError::NotInTutorial {
                student: student.clone(),
                slot: self.slot.clone(),
            });
        }
        self.attendance.record(week, student.clone(), status);
        Ok(())
    }

    /// Checks that every recorded mark falls inside `term` and names a
    /// rostered student.
    ///
    /// # Errors
    ///
    /// Returns `TabookError::InvalidWeek` or `TabookError::NotInTutorial` for
    /// the first offending mark.
    pub(crate) fn check_attendance(&self, term: &TermWeeks) -> Result<()> {
        for week in self.attendance.marked_weeks() {
            term.check(week)?;
            if let Some((student, _)) = self
                .attendance
                .week(week)
                .find(|(student, _)| !self.roster.contains(*student))
            {
                return Err(TabookError::NotInTutorial {
                    student: student.clone(),
                    slot: self.slot.clone(),
                });
            }
        }
        Ok(())
    }

    /// Records `status` in `week` for every enrolled student.
    ///
    /// Returns the number of students marked.
    pub fn mark_all_attendance(
        &mut self,
        week: u32,
        status: AttendanceStatus,
        term: &TermWeeks,
    ) -> Result<usize> {
        term.check(week)?;
        for student in &self.roster {
            self.attendance.record(week, student.clone(), status);
        }
        Ok(self.roster.len())
    }
}
