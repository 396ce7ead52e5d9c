//! Detail/edit dialog state machine.
//!
//! `Closed -> Viewing -> Editing -> Viewing -> Closed`
//!
//! # Invariants
//! - At most one record is active; `Closed` has none.
//! - `Editing` is reachable only from `Viewing`.
//! - The edit draft lives only in `Editing` and is discarded on cancel/close.

use crate::model::contact::ContactId;
use crate::model::form::{ContactField, ContactForm};

/// Dialog state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Viewing {
        contact_id: ContactId,
    },
    Editing {
        contact_id: ContactId,
        draft: ContactForm,
    },
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// Record the dialog is bound to.
    pub fn active_id(&self) -> Option<ContactId> {
        match self {
            Self::Closed => None,
            Self::Viewing { contact_id } | Self::Editing { contact_id, .. } => Some(*contact_id),
        }
    }

    pub fn draft(&self) -> Option<&ContactForm> {
        match self {
            Self::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Opens (or retargets) the dialog in view mode.
    pub fn open(&mut self, contact_id: ContactId) {
        *self = Self::Viewing { contact_id };
    }

    /// Enters edit mode with `draft`; ignored unless viewing.
    pub fn begin_edit(&mut self, draft: ContactForm) -> bool {
        let Self::Viewing { contact_id } = *self else {
            return false;
        };
        *self = Self::Editing { contact_id, draft };
        true
    }

    /// Updates one draft field; ignored unless editing.
    pub fn set_draft_field(&mut self, field: ContactField, value: impl Into<String>) -> bool {
        match self {
            Self::Editing { draft, .. } => {
                draft.set(field, value);
                true
            }
            _ => false,
        }
    }

    /// Leaves edit mode, dropping the draft. No-op unless editing.
    pub fn end_edit(&mut self) {
        if let Self::Editing { contact_id, .. } = *self {
            *self = Self::Viewing { contact_id };
        }
    }

    pub fn close(&mut self) {
        *self = Self::Closed;
    }
}
