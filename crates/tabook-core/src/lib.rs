//! Tabook Core
//!
//! Consultation scheduling and tutorial attendance engine: non-overlapping
//! bookings with one per student, slot-keyed tutorials, and per-week
//! attendance sheets, driven through a closed set of commands.

pub mod attendance;
pub mod clock;
pub mod command;
pub mod config;
pub mod consultation;
pub mod error;
pub mod ids;
pub mod model;
pub mod registry;
pub mod runner;
pub mod scheduler;
pub mod store;
pub mod tutorial;

pub use attendance::{AttendanceEntry, AttendanceSheet, AttendanceStatus, WeekSummary};
pub use clock::{Clock, FixedClock, SystemClock};
pub use command::{Advisory, Command, CommandResult};
pub use config::{Config, TermWeeks};
pub use consultation::Consultation;
pub use error::{ErrorKind, Result, TabookError};
pub use ids::{SlotId, StudentId};
pub use model::{Model, Person, PersonDirectory, Snapshot};
pub use registry::TutorialRegistry;
pub use runner::{CommandRunner, NoPersistence, Persistence};
pub use scheduler::ConsultationScheduler;
pub use store::JsonStore;
pub use tutorial::Tutorial;
