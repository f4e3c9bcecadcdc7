//! The state container every command runs against.
//!
//! A [`Model`] is built once at startup, either empty or from a
//! [`Snapshot`], and then handed to each command by `&mut`. It holds the
//! person directory, the tutorial registry, the consultation scheduler and
//! the configured term weeks. The engine takes no locks; an embedder sharing
//! a model between callers must serialize access around it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{Config, TermWeeks};
use crate::consultation::Consultation;
use crate::error::{Result, TabookError};
use crate::ids::StudentId;
use crate::registry::TutorialRegistry;
use crate::scheduler::ConsultationScheduler;
use crate::tutorial::Tutorial;

/// A student record, reduced to what the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Identifier of the student.
    pub id: StudentId,
    /// Display name used in command feedback.
    pub name: String,
}

impl Person {
    /// Creates a person record.
    pub fn new(id: StudentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Lookup of people by identifier.
pub trait PersonDirectory {
    /// Returns the person with the given identifier.
    fn find_person(&self, id: &StudentId) -> Option<&Person>;

    /// Whether a person with the given identifier exists.
    fn person_exists(&self, id: &StudentId) -> bool {
        self.find_person(id).is_some()
    }
}

/// Serializable image of a [`Model`], minus configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All known people.
    #[serde(default)]
    pub persons: Vec<Person>,
    /// All registered tutorials.
    #[serde(default)]
    pub tutorials: Vec<Tutorial>,
    /// All active consultations.
    #[serde(default)]
    pub consultations: Vec<Consultation>,
}

/// Explicit engine state.
#[derive(Debug, Clone)]
pub struct Model {
    persons: BTreeMap<StudentId, Person>,
    tutorials: TutorialRegistry,
    consultations: ConsultationScheduler,
    term_weeks: TermWeeks,
    max_consultation_duration: chrono::Duration,
}

impl Model {
    /// Creates an empty model configured by `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            persons: BTreeMap::new(),
            tutorials: TutorialRegistry::new(),
            consultations: ConsultationScheduler::new(),
            term_weeks: config.term_weeks,
            max_consultation_duration: config.max_consultation_duration(),
        }
    }

    /// Rebuilds a model from a snapshot.
    ///
    /// Tutorials and consultations are re-inserted through the registry and
    /// scheduler, so a snapshot that breaks an engine invariant is rejected
    /// with the same error a command would have produced. References between
    /// records are then checked: every booking owner and roster entry must be
    /// a known person, and every attendance mark must fall inside the term
    /// and name a rostered student. A later person record with a repeated
    /// identifier replaces the earlier one.
    pub fn from_snapshot(config: &Config, snapshot: Snapshot) -> Result<Self> {
        let mut model = Self::new(config);
        for person in snapshot.persons {
            model.add_person(person);
        }
        for tutorial in snapshot.tutorials {
            model.tutorials.register(tutorial)?;
        }
        for consultation in snapshot.consultations {
            model.consultations.add(consultation)?;
        }
        model.check_references()?;
        Ok(model)
    }

    fn check_references(&self) -> Result<()> {
        for consultation in self.consultations.iter() {
            self.require_known(consultation.owner())?;
        }
        for tutorial in self.tutorials.iter() {
            for student in tutorial.roster() {
                self.require_known(student)?;
            }
            tutorial.check_attendance(&self.term_weeks)?;
        }
        Ok(())
    }

    fn require_known(&self, student: &StudentId) -> Result<()> {
        if self.persons.contains_key(student) {
            Ok(())
        } else {
            Err(TabookError::StudentNotFound {
                student: student.clone(),
            })
        }
    }

    /// Captures the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            persons: self.persons.values().cloned().collect(),
            tutorials: self.tutorials.iter().cloned().collect(),
            consultations: self.consultations.iter().cloned().collect(),
        }
    }

    /// Inserts or replaces a person record.
    pub fn add_person(&mut self, person: Person) {
        self.persons.insert(person.id.clone(), person);
    }

    /// All people, in identifier order.
    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }

    /// The tutorial registry.
    pub const fn tutorials(&self) -> &TutorialRegistry {
        &self.tutorials
    }

    /// Mutable access to the tutorial registry.
    pub fn tutorials_mut(&mut self) -> &mut TutorialRegistry {
        &mut self.tutorials
    }

    /// The consultation scheduler.
    pub const fn consultations(&self) -> &ConsultationScheduler {
        &self.consultations
    }

    /// Mutable access to the consultation scheduler.
    pub fn consultations_mut(&mut self) -> &mut ConsultationScheduler {
        &mut self.consultations
    }

    /// Weeks in which attendance may be marked.
    pub const fn term_weeks(&self) -> &TermWeeks {
        &self.term_weeks
    }

    /// Consultation length above which an advisory is attached.
    pub const fn max_consultation_duration(&self) -> chrono::Duration {
        self.max_consultation_duration
    }
}

impl PersonDirectory for Model {
    fn find_person(&self, id: &StudentId) -> Option<&Person> {
        self.persons.get(id)
    }
}
