//! Create/edit mode tracking.
//!
//! # Invariants
//! - `Editing { index }` always points at an existing row.
//! - Removing the edited row ends the session; removing an earlier row
//!   shifts the session index down with it.

use log::debug;

/// Which mutation a form submit performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditSession {
    /// Submits append a new record.
    #[default]
    Creating,
    /// Submits replace the record at `index`.
    Editing { index: usize },
}

impl EditSession {
    pub fn is_editing(self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    pub fn editing_index(self) -> Option<usize> {
        match self {
            Self::Creating => None,
            Self::Editing { index } => Some(index),
        }
    }

    /// Enters (or retargets) edit mode.
    pub fn begin(&mut self, index: usize) {
        *self = Self::Editing { index };
    }

    /// Returns to create mode.
    pub fn reset(&mut self) {
        *self = Self::Creating;
    }

    /// Keeps the session aligned after the row at `removed` was deleted.
    ///
    /// Returns `true` when the edited row itself was removed.
    pub fn on_row_removed(&mut self, removed: usize) -> bool {
        let Self::Editing { index } = *self else {
            return false;
        };

        if removed == index {
            debug!("event=session_reset module=session reason=edited_row_removed");
            self.reset();
            true
        } else {
            if removed < index {
                *self = Self::Editing { index: index - 1 };
            }
            false
        }
    }
}
