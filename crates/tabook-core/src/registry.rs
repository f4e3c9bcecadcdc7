//! Slot-keyed tutorial registry.

use std::collections::HashMap;

use crate::error::{Result, TabookError};
use crate::ids::SlotId;
use crate::tutorial::Tutorial;

/// One-to-one mapping from [`SlotId`] to [`Tutorial`].
///
/// Lookups are keyed retrievals; the slot stored inside each tutorial is
/// always the key it is filed under.
#[derive(Debug, Clone, Default)]
pub struct TutorialRegistry {
    tutorials: HashMap<SlotId, Tutorial>,
}

impl TutorialRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the tutorial occupying `slot`.
    pub fn find_by_slot(&self, slot: &SlotId) -> Option<&Tutorial> {
        self.tutorials.get(slot)
    }

    /// Mutable lookup of the tutorial occupying `slot`.
    pub fn find_by_slot_mut(&mut self, slot: &SlotId) -> Option<&mut Tutorial> {
        self.tutorials.get_mut(slot)
    }

    /// Files `tutorial` under its slot.
    ///
    /// # Errors
    ///
    /// Returns `TabookError::DuplicateSlot` if the slot is already occupied;
    /// the registry is left unchanged.
    pub fn register(&mut self, tutorial: Tutorial) -> Result<()> {
        if self.tutorials.contains_key(tutorial.slot()) {
            return Err(TabookError::DuplicateSlot {
                slot: tutorial.slot().clone(),
            });
        }
        self.tutorials.insert(tutorial.slot().clone(), tutorial);
        Ok(())
    }

    /// All tutorials, ordered by slot.
    pub fn iter(&self) -> impl Iterator<Item = &Tutorial> {
        let mut tutorials: Vec<&Tutorial> = self.tutorials.values().collect();
        tutorials.sort_by(|a, b| a.slot().cmp(b.slot()));
        tutorials.into_iter()
    }

    /// Number of registered tutorials.
    pub fn len(&self) -> usize {
        self.tutorials.len()
    }

    /// Returns `true` if no tutorial is registered.
    pub fn is_empty(&self) -> bool {
        self.tutorials.is_empty()
    }
}
