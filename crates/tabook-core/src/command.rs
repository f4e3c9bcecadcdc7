//! Commands executed against a [`Model`].
//!
//! Each [`Command`] is one request/response step: it checks the entities it
//! references, performs a single domain operation through the registry,
//! scheduler or tutorial, and reports a [`CommandResult`]. Invariant
//! violations come back as [`TabookError`] values whose `Display` text is
//! the user-facing message. Nothing is rendered here beyond that text; the
//! `refresh_person_list` flag tells the caller what presentation state went
//! stale.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use tabook_core::{Command, Config, Consultation, Model, Person, StudentId};
//!
//! let mut model = Model::new(&Config::default());
//! let alex = StudentId::new("E1234567").unwrap();
//! model.add_person(Person::new(alex.clone(), "Alex Yeoh"));
//!
//! let day = NaiveDate::from_ymd_opt(2025, 10, 10).unwrap();
//! let consultation = Consultation::new(
//!     alex,
//!     day.and_hms_opt(14, 0, 0).unwrap(),
//!     day.and_hms_opt(16, 0, 0).unwrap(),
//! )
//! .unwrap();
//!
//! let now = day.and_hms_opt(9, 0, 0).unwrap();
//! let result = Command::AddConsultation(consultation)
//!     .execute(&mut model, now)
//!     .unwrap();
//! assert!(result.advisories.is_empty());
//! assert!(result.refresh_person_list);
//! ```

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use tracing::{info, warn};

use crate::attendance::AttendanceStatus;
use crate::consultation::Consultation;
use crate::error::{Result, TabookError};
use crate::ids::{SlotId, StudentId};
use crate::model::{Model, PersonDirectory};
use crate::tutorial::Tutorial;

// ============================================================================
// Advisory
// ============================================================================

/// Non-blocking note attached to a successful consultation booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// The booking is longer than the configured limit.
    DurationTooLong {
        /// The configured limit, in minutes.
        limit_minutes: i64,
    },
    /// The booking ended at or before the time of the command.
    AlreadyEnded,
    /// The booking had started but not ended at the time of the command.
    Ongoing,
}

impl Advisory {
    /// Advisories for `consultation` as of `now`.
    ///
    /// The duration advisory is independent of the other two; at most one of
    /// `AlreadyEnded` and `Ongoing` applies.
    pub fn evaluate(consultation: &Consultation, now: NaiveDateTime, limit: Duration) -> Vec<Self> {
        let mut advisories = Vec::new();
        if consultation.duration() > limit {
            advisories.push(Self::DurationTooLong {
                limit_minutes: limit.num_minutes(),
            });
        }
        if now >= consultation.to() {
            advisories.push(Self::AlreadyEnded);
        } else if now >= consultation.from() {
            advisories.push(Self::Ongoing);
        }
        advisories
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DurationTooLong { limit_minutes } => {
                write!(f, "Friendly reminder: Consultation duration exceeds ")?;
                match (limit_minutes / 60, limit_minutes % 60) {
                    (1, 0) => write!(f, "1 hour!"),
                    (hours, 0) => write!(f, "{hours} hours!"),
                    _ => write!(f, "{limit_minutes} minutes!"),
                }
            }
            Self::AlreadyEnded => write!(f, "Friendly reminder: Consultation has ended!"),
            Self::Ongoing => write!(f, "Friendly reminder: Consultation is ongoing!"),
        }
    }
}

// ============================================================================
// CommandResult
// ============================================================================

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    /// Confirmation message.
    pub message: String,

    /// Non-blocking notes, one line each in [`CommandResult::feedback`].
    pub advisories: Vec<Advisory>,

    /// Whether the caller's person list view is now stale.
    pub refresh_person_list: bool,

    /// Whether the model changed and should be persisted.
    pub mutated: bool,
}

impl CommandResult {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            advisories: Vec::new(),
            refresh_person_list: false,
            mutated: false,
        }
    }

    fn with_advisories(mut self, advisories: Vec<Advisory>) -> Self {
        self.advisories = advisories;
        self
    }

    const fn refreshing_person_list(mut self) -> Self {
        self.refresh_person_list = true;
        self
    }

    const fn mutating(mut self) -> Self {
        self.mutated = true;
        self
    }

    /// The message followed by one line per advisory.
    pub fn feedback(&self) -> String {
        let mut text = self.message.clone();
        for advisory in &self.advisories {
            text.push('\n');
            text.push_str(&advisory.to_string());
        }
        text
    }
}

// ============================================================================
// Command
// ============================================================================

/// The closed set of engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Book a consultation for its owner.
    AddConsultation(Consultation),

    /// Cancel the consultation held by a student.
    DeleteConsultation(StudentId),

    /// Record one student's attendance in one week.
    MarkAttendance {
        /// Tutorial slot.
        slot: SlotId,
        /// Term week.
        week: u32,
        /// Student to mark.
        student: StudentId,
        /// Status to record.
        status: AttendanceStatus,
    },

    /// Record the same status for every enrolled student in one week.
    MarkAllAttendance {
        /// Tutorial slot.
        slot: SlotId,
        /// Term week.
        week: u32,
        /// Status to record.
        status: AttendanceStatus,
    },

    /// Create an empty tutorial on a free slot.
    RegisterTutorial(SlotId),

    /// Add a student to a tutorial's roster.
    EnrollStudent {
        /// Tutorial slot.
        slot: SlotId,
        /// Student to enroll.
        student: StudentId,
    },

    /// List every active consultation by start time.
    ListConsultations,

    /// List the students enrolled in a tutorial.
    ListTutorial(SlotId),
}

impl Command {
    /// Short stable name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddConsultation(_) => "add_consultation",
            Self::DeleteConsultation(_) => "delete_consultation",
            Self::MarkAttendance { .. } => "mark_attendance",
            Self::MarkAllAttendance { .. } => "mark_all_attendance",
            Self::RegisterTutorial(_) => "register_tutorial",
            Self::EnrollStudent { .. } => "enroll_student",
            Self::ListConsultations => "list_consultations",
            Self::ListTutorial(_) => "list_tutorial",
        }
    }

    /// Runs the command against `model`.
    ///
    /// `now` is the wall-clock reading for this execution, used only for
    /// consultation advisories. On error the model is unchanged.
    pub fn execute(&self, model: &mut Model, now: NaiveDateTime) -> Result<CommandResult> {
        info!(command = self.name(), "Executing command");

        let result = match self {
            Self::AddConsultation(consultation) => add_consultation(model, consultation, now),
            Self::DeleteConsultation(student) => delete_consultation(model, student),
            Self::MarkAttendance {
                slot,
                week,
                student,
                status,
            } => mark_attendance(model, slot, *week, student, *status),
            Self::MarkAllAttendance { slot, week, status } => {
                mark_all_attendance(model, slot, *week, *status)
            }
            Self::RegisterTutorial(slot) => register_tutorial(model, slot),
            Self::EnrollStudent { slot, student } => enroll_student(model, slot, student),
            Self::ListConsultations => Ok(list_consultations(model)),
            Self::ListTutorial(slot) => list_tutorial(model, slot),
        };

        match &result {
            Ok(outcome) => info!(
                command = self.name(),
                mutated = outcome.mutated,
                advisories = outcome.advisories.len(),
                "Command succeeded"
            ),
            Err(e) => warn!(
                command = self.name(),
                kind = %e.kind(),
                error = %e,
                "Command rejected"
            ),
        }

        result
    }
}

fn require_person<'a>(model: &'a Model, student: &StudentId) -> Result<&'a str> {
    model
        .find_person(student)
        .map(|person| person.name.as_str())
        .ok_or_else(|| TabookError::StudentNotFound {
            student: student.clone(),
        })
}

fn require_tutorial<'a>(model: &'a mut Model, slot: &SlotId) -> Result<&'a mut Tutorial> {
    model
        .tutorials_mut()
        .find_by_slot_mut(slot)
        .ok_or_else(|| TabookError::TutorialNotFound { slot: slot.clone() })
}

fn add_consultation(
    model: &mut Model,
    consultation: &Consultation,
    now: NaiveDateTime,
) -> Result<CommandResult> {
    require_person(model, consultation.owner())?;
    model.consultations_mut().add(consultation.clone())?;

    let advisories = Advisory::evaluate(consultation, now, model.max_consultation_duration());
    Ok(
        CommandResult::new(format!("New consultation added: {consultation}"))
            .with_advisories(advisories)
            .refreshing_person_list()
            .mutating(),
    )
}

fn delete_consultation(model: &mut Model, student: &StudentId) -> Result<CommandResult> {
    require_person(model, student)?;
    let removed = model.consultations_mut().delete(student)?;

    Ok(
        CommandResult::new(format!("Deleted consultation: {removed}"))
            .refreshing_person_list()
            .mutating(),
    )
}

fn mark_attendance(
    model: &mut Model,
    slot: &SlotId,
    week: u32,
    student: &StudentId,
    status: AttendanceStatus,
) -> Result<CommandResult> {
    let term = *model.term_weeks();
    if model.tutorials().find_by_slot(slot).is_none() {
        return Err(TabookError::TutorialNotFound { slot: slot.clone() });
    }
    let name = require_person(model, student)?.to_string();

    require_tutorial(model, slot)?.mark_attendance(week, student, status, &term)?;

    Ok(CommandResult::new(format!(
        "Attendance marked: {name} {status} on Week {week}."
    ))
    .mutating())
}

fn mark_all_attendance(
    model: &mut Model,
    slot: &SlotId,
    week: u32,
    status: AttendanceStatus,
) -> Result<CommandResult> {
    let term = *model.term_weeks();
    let marked = require_tutorial(model, slot)?.mark_all_attendance(week, status, &term)?;

    let noun = if marked == 1 { "student" } else { "students" };
    Ok(CommandResult::new(format!(
        "Attendance marked: {marked} {noun} in {slot} {status} on Week {week}."
    ))
    .mutating())
}

fn register_tutorial(model: &mut Model, slot: &SlotId) -> Result<CommandResult> {
    model
        .tutorials_mut()
        .register(Tutorial::new(slot.clone()))?;

    Ok(CommandResult::new(format!("New tutorial registered: {slot}")).mutating())
}

fn enroll_student(model: &mut Model, slot: &SlotId, student: &StudentId) -> Result<CommandResult> {
    let name = require_person(model, student)?.to_string();
    require_tutorial(model, slot)?.enroll(student.clone())?;

    Ok(
        CommandResult::new(format!("Added {name} to tutorial {slot}"))
            .refreshing_person_list()
            .mutating(),
    )
}

fn list_consultations(model: &Model) -> CommandResult {
    let consultations = model.consultations();
    if consultations.is_empty() {
        return CommandResult::new("No consultations scheduled");
    }

    let mut message = String::from("Listed all consultations:");
    for (index, consultation) in consultations.iter().enumerate() {
        message.push_str(&format!("\n{}. {consultation}", index + 1));
    }
    CommandResult::new(message)
}

fn list_tutorial(model: &Model, slot: &SlotId) -> Result<CommandResult> {
    let tutorial = model
        .tutorials()
        .find_by_slot(slot)
        .ok_or_else(|| TabookError::TutorialNotFound { slot: slot.clone() })?;
    if tutorial.roster().next().is_none() {
        return Ok(CommandResult::new(format!("No students in tutorial {slot}")));
    }

    let mut message = format!("Listed students in tutorial {slot}:");
    for (index, student) in tutorial.roster().enumerate() {
        message.push_str(&format!("\n{}. {student}", index + 1));
        if let Some(person) = model.find_person(student) {
            message.push(' ');
            message.push_str(&person.name);
        }
    }
    Ok(CommandResult::new(message))
}
