//! JSON shape of batch entries.
//!
//! The batch is read as an array of raw JSON values and each entry is
//! decoded on its own by [`parse_entry`]. Identifiers, timestamps and
//! statuses arrive as plain strings and are validated per entry too, so an
//! unknown command, a missing field or a malformed value rejects only that
//! entry rather than the whole batch.

use chrono::NaiveDateTime;
use serde::Deserialize;
use tabook_core::{AttendanceStatus, Command, Consultation, SlotId, StudentId};

/// Accepted timestamp layouts, tried in order.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y%m%d %H%M", "%Y-%m-%dT%H:%M:%S"];

/// One entry of a command batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    /// Book a consultation.
    AddConsultation {
        student: String,
        from: String,
        to: String,
    },
    /// Cancel a student's consultation.
    DeleteConsultation { student: String },
    /// Mark one student's attendance.
    MarkAttendance {
        slot: String,
        week: u32,
        student: String,
        status: String,
    },
    /// Mark every enrolled student's attendance.
    MarkAllAttendance {
        slot: String,
        week: u32,
        status: String,
    },
    /// Create a tutorial.
    RegisterTutorial { slot: String },
    /// Add a student to a tutorial.
    EnrollStudent { slot: String, student: String },
    /// List consultations.
    ListConsultations,
    /// List a tutorial's roster.
    ListTutorial { slot: String },
}

/// Decodes and validates one batch entry.
pub fn parse_entry(entry: serde_json::Value) -> anyhow::Result<Command> {
    let request: Request = serde_json::from_value(entry)
        .map_err(|e| anyhow::anyhow!("Invalid command entry: {e}"))?;
    Command::try_from(request)
}

fn parse_timestamp(value: &str) -> anyhow::Result<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value.trim(), format).ok())
        .ok_or_else(|| {
            anyhow::anyhow!("Invalid date-time '{value}': expected 'YYYYMMDD HHMM', e.g. '20251010 1400'")
        })
}

fn parse_status(value: &str) -> anyhow::Result<AttendanceStatus> {
    value.parse().map_err(|e: String| anyhow::anyhow!(e))
}

impl TryFrom<Request> for Command {
    type Error = anyhow::Error;

    fn try_from(request: Request) -> anyhow::Result<Self> {
        let command = match request {
            Request::AddConsultation { student, from, to } => {
                Self::AddConsultation(Consultation::new(
                    StudentId::new(student)?,
                    parse_timestamp(&from)?,
                    parse_timestamp(&to)?,
                )?)
            }
            Request::DeleteConsultation { student } => {
                Self::DeleteConsultation(StudentId::new(student)?)
            }
            Request::MarkAttendance {
                slot,
                week,
                student,
                status,
            } => Self::MarkAttendance {
                slot: SlotId::new(slot)?,
                week,
                student: StudentId::new(student)?,
                status: parse_status(&status)?,
            },
            Request::MarkAllAttendance { slot, week, status } => Self::MarkAllAttendance {
                slot: SlotId::new(slot)?,
                week,
                status: parse_status(&status)?,
            },
            Request::RegisterTutorial { slot } => Self::RegisterTutorial(SlotId::new(slot)?),
            Request::EnrollStudent { slot, student } => Self::EnrollStudent {
                slot: SlotId::new(slot)?,
                student: StudentId::new(student)?,
            },
            Request::ListConsultations => Self::ListConsultations,
            Request::ListTutorial { slot } => Self::ListTutorial(SlotId::new(slot)?),
        };
        Ok(command)
    }
}
