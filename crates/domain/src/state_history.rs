//! Operating-state history: an undo/redo stack of value mementos.
//!
//! The history is a plain `Vec` with a cursor. Pushing after an undo drops
//! every entry past the cursor, so redo is only possible along the branch
//! that was last walked.

use serde::{Deserialize, Serialize};

use crate::error::HistoryError;
use crate::operating_state::OperatingState;

/// Immutable snapshot of an operating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMemento(OperatingState);

impl StateMemento {
    #[must_use]
    pub fn new(state: OperatingState) -> Self {
        Self(state)
    }

    #[must_use]
    pub fn state(self) -> OperatingState {
        self.0
    }
}

/// Append-only sequence of mementos with a movable cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateHistory {
    entries: Vec<StateMemento>,
    cursor: usize,
}

impl StateHistory {
    /// Start a history whose only entry is the startup state.
    #[must_use]
    pub fn new(initial: OperatingState) -> Self {
        Self {
            entries: vec![StateMemento::new(initial)],
            cursor: 0,
        }
    }

    /// Drop any redo-able future, append `state` and move the cursor onto it.
    pub fn push(&mut self, state: OperatingState) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(StateMemento::new(state));
        self.cursor = self.entries.len() - 1;
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Step back one entry.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NothingToUndo`] at the oldest entry; the
    /// cursor is left unchanged.
    pub fn undo(&mut self) -> Result<StateMemento, HistoryError> {
        if !self.can_undo() {
            return Err(HistoryError::NothingToUndo);
        }
        self.cursor -= 1;
        Ok(self.entries[self.cursor])
    }

    /// Step forward one entry.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NothingToRedo`] at the newest entry; the
    /// cursor is left unchanged.
    pub fn redo(&mut self) -> Result<StateMemento, HistoryError> {
        if !self.can_redo() {
            return Err(HistoryError::NothingToRedo);
        }
        self.cursor += 1;
        Ok(self.entries[self.cursor])
    }

    /// Memento under the cursor, `None` only after [`clear`](Self::clear).
    #[must_use]
    pub fn current(&self) -> Option<StateMemento> {
        self.entries.get(self.cursor).copied()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Used at teardown only.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::new(OperatingState::default())
    }
}
