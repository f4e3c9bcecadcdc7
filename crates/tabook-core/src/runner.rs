//! Command execution loop.
//!
//! [`CommandRunner`] owns the [`Model`] for the lifetime of a session. For
//! every command it reads the clock once, executes against a working copy,
//! and hands that copy to the [`Persistence`] collaborator if the command
//! changed it. The copy replaces the model only once it has been saved, so
//! an `Err` from [`CommandRunner::run`] always means nothing was applied.
//! Rejected commands never reach persistence.

use crate::clock::Clock;
use crate::command::{Command, CommandResult};
use crate::error::Result;
use crate::model::Model;

/// Receives the model after each successful mutation.
pub trait Persistence {
    /// Persists the current state.
    fn save(&mut self, model: &Model) -> Result<()>;
}

/// Discards save notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersistence;

impl Persistence for NoPersistence {
    fn save(&mut self, _model: &Model) -> Result<()> {
        Ok(())
    }
}

/// Runs commands one at a time against an owned model.
#[derive(Debug)]
pub struct CommandRunner<C, P> {
    model: Model,
    clock: C,
    persistence: P,
}

impl<C: Clock, P: Persistence> CommandRunner<C, P> {
    /// Creates a runner over `model`.
    pub const fn new(model: Model, clock: C, persistence: P) -> Self {
        Self {
            model,
            clock,
            persistence,
        }
    }

    /// Executes `command` and persists the model if it changed.
    ///
    /// If saving fails the change is discarded and the storage error is
    /// returned, leaving the model as it was before the command.
    pub fn run(&mut self, command: &Command) -> Result<CommandResult> {
        let now = self.clock.now();
        let mut working = self.model.clone();
        let result = command.execute(&mut working, now)?;
        if result.mutated {
            self.persistence.save(&working)?;
            self.model = working;
        }
        Ok(result)
    }

    /// The current model.
    pub const fn model(&self) -> &Model {
        &self.model
    }

    /// The persistence collaborator.
    pub const fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Consumes the runner, returning the model.
    pub fn into_model(self) -> Model {
        self.model
    }
}
