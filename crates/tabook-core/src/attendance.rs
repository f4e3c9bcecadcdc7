//! Attendance status and the per-tutorial attendance sheet.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::StudentId;

/// Attendance recorded for one student in one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttendanceStatus {
    /// Student attended.
    Present,
    /// Student did not attend.
    Absent,
    /// Student was excused.
    Excused,
}

impl AttendanceStatus {
    /// Parses a string into an `AttendanceStatus`, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            "excused" => Some(Self::Excused),
            _ => None,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Excused => "excused",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_case_insensitive(s).ok_or_else(|| {
            format!("invalid attendance status '{s}': expected one of 'present', 'absent', 'excused'")
        })
    }
}

impl<'de> Deserialize<'de> for AttendanceStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for AttendanceStatus {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// One recorded mark, as stored in snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    /// Term week the mark applies to.
    pub week: u32,
    /// Student the mark applies to.
    pub student: StudentId,
    /// Recorded status.
    pub status: AttendanceStatus,
}

/// Per-status counts for a single week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WeekSummary {
    /// Students marked present.
    pub present: usize,
    /// Students marked absent.
    pub absent: usize,
    /// Students marked excused.
    pub excused: usize,
}

impl WeekSummary {
    /// Total number of marks in the week.
    pub const fn total(&self) -> usize {
        self.present + self.absent + self.excused
    }
}

/// Mapping `(week, student) -> status` owned by a single tutorial.
///
/// Holds at most one status per pair; a later mark replaces the earlier one.
/// Week and roster checks live on [`crate::Tutorial`], which is the only
/// writer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<AttendanceEntry>", into = "Vec<AttendanceEntry>")]
pub struct AttendanceSheet {
    weeks: BTreeMap<u32, BTreeMap<StudentId, AttendanceStatus>>,
}

impl AttendanceSheet {
    /// Creates an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, week: u32, student: StudentId, status: AttendanceStatus) {
        self.weeks.entry(week).or_default().insert(student, status);
    }

    /// Status recorded for `student` in `week`, if any.
    pub fn status(&self, week: u32, student: &StudentId) -> Option<AttendanceStatus> {
        self.weeks.get(&week)?.get(student).copied()
    }

    /// All marks for `week`, ordered by student.
    pub fn week(&self, week: u32) -> impl Iterator<Item = (&StudentId, AttendanceStatus)> {
        self.weeks
            .get(&week)
            .into_iter()
            .flat_map(|marks| marks.iter().map(|(student, status)| (student, *status)))
    }

    /// Weeks that have at least one mark, ascending.
    pub fn marked_weeks(&self) -> impl Iterator<Item = u32> + '_ {
        self.weeks.keys().copied()
    }

    /// Counts marks per status for `week`.
    pub fn summary(&self, week: u32) -> WeekSummary {
        self.week(week)
            .fold(WeekSummary::default(), |mut acc, (_, status)| {
                match status {
                    AttendanceStatus::Present => acc.present += 1,
                    AttendanceStatus::Absent => acc.absent += 1,
                    AttendanceStatus::Excused => acc.excused += 1,
                }
                acc
            })
    }

    /// Number of recorded marks across all weeks.
    pub fn len(&self) -> usize {
        self.weeks.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if nothing has been marked.
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

impl From<Vec<AttendanceEntry>> for AttendanceSheet {
    fn from(entries: Vec<AttendanceEntry>) -> Self {
        let mut sheet = Self::new();
        for entry in entries {
            sheet.record(entry.week, entry.student, entry.status);
        }
        sheet
    }
}

impl From<AttendanceSheet> for Vec<AttendanceEntry> {
    fn from(sheet: AttendanceSheet) -> Self {
        sheet
            .weeks
            .into_iter()
            .flat_map(|(week, marks)| {
                marks.into_iter().map(move |(student, status)| AttendanceEntry {
                    week,
                    student,
                    status,
                })
            })
            .collect()
    }
}
