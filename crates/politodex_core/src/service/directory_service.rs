//! Directory session: the single state holder behind the widget.
//!
//! # Responsibility
//! - Own the contact store, search query, dialog state and drag tracker.
//! - Translate user events into store mutations and render instructions.
//!
//! # Invariants
//! - Every handler runs to completion; photo uploads are encoded inside the
//!   submit handler, so submissions are strictly sequenced.
//! - The dialog is bound to a stable contact id; its position is re-resolved
//!   before each indexed access and a vanished record makes the call a no-op.
//! - Storage failures are logged by the store and never surface here.

use crate::config::DirectoryConfig;
use crate::model::contact::ContactId;
use crate::model::form::{ContactField, ContactForm, ContactPatch};
use crate::repo::contact_store::ContactStore;
use crate::service::photo::{encode_upload, placeholder_portrait, PhotoUpload};
use crate::storage::KeyValueStorage;
use crate::view::carousel::{
    nav_button_state, scroll_by, DragTracker, DragUpdate, NavButtonState, PointerPress,
    PointerRelease, ScrollCommand, TrackMetrics,
};
use crate::view::modal::ModalState;
use crate::view::{
    detail_view, edit_form_from, edit_form_view, render_list, DetailView, EditFormView,
    TrackRender,
};
use log::{info, warn};

/// Open dialog contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    /// Current store position of the active record.
    pub index: usize,
    pub contact_id: ContactId,
    pub editing: bool,
    pub detail: DetailView,
    pub edit_form: EditFormView,
}

/// Result of submitting the create form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub contact_id: ContactId,
    pub track: TrackRender,
    /// User-facing message, e.g. for an oversized upload.
    pub alert: Option<String>,
    /// Store index of the first rendered card, which receives focus.
    pub focus_index: Option<usize>,
}

/// Result of submitting the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub track: TrackRender,
    /// Refreshed dialog, back in view mode.
    pub modal: ModalView,
    pub alert: Option<String>,
}

/// Previous/next carousel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Previous,
    Next,
}

/// Effect of a window-level key press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    Scroll(ScrollCommand),
    ModalClosed,
    Ignored,
}

/// Headless directory widget state.
pub struct DirectoryService<S: KeyValueStorage> {
    store: ContactStore<S>,
    config: DirectoryConfig,
    query: String,
    modal: ModalState,
    drag: DragTracker,
}

impl<S: KeyValueStorage> DirectoryService<S> {
    /// Restores (or seeds) the store and starts with the dialog closed.
    pub fn new(storage: S, config: DirectoryConfig) -> Self {
        let store = ContactStore::load(storage, config.storage_key.clone());
        info!(
            "event=directory_start module=service status=ok count={}",
            store.len()
        );
        let drag = DragTracker::with_threshold(config.drag_threshold);
        Self {
            store,
            config,
            query: String::new(),
            modal: ModalState::default(),
            drag,
        }
    }

    pub fn store(&self) -> &ContactStore<S> {
        &self.store
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn modal_state(&self) -> &ModalState {
        &self.modal
    }

    /// Ends the session and hands back the storage backend.
    pub fn into_storage(self) -> S {
        self.store.into_storage()
    }

    /// Card track for the current query.
    pub fn render(&self) -> TrackRender {
        render_list(self.store.contacts(), self.query.as_str())
    }

    /// Updates the search query and re-renders.
    pub fn search(&mut self, query: impl Into<String>) -> TrackRender {
        self.query = query.into();
        self.render()
    }

    /// Creates a contact from the create form.
    ///
    /// Text fields are trimmed; the photo is the encoded upload, or an
    /// initials placeholder when there is none or it was rejected.
    pub fn submit_create(
        &mut self,
        form: &ContactForm,
        photo: Option<&PhotoUpload>,
    ) -> CreateOutcome {
        let mut record = form.to_record();
        let (encoded, alert) = self.resolve_upload(photo);
        record.photo = Some(encoded.unwrap_or_else(|| placeholder_portrait(record.name.as_str())));
        let contact_id = record.id;

        self.store.add(record);
        info!(
            "event=contact_create module=service status=ok count={} photo_alert={}",
            self.store.len(),
            alert.is_some()
        );

        let track = self.render();
        let focus_index = track.cards().first().map(|card| card.index);
        CreateOutcome {
            contact_id,
            track,
            alert,
            focus_index,
        }
    }

    /// Store position of the record bound to the dialog.
    pub fn active_index(&self) -> Option<usize> {
        self.modal
            .active_id()
            .and_then(|id| self.store.position_of(id))
    }

    /// Opens the dialog in view mode; `None` for a stale index.
    pub fn open_detail(&mut self, index: usize) -> Option<ModalView> {
        let contact_id = self.store.get(index)?.id;
        self.modal.open(contact_id);
        self.modal_view()
    }

    /// Closes the dialog from either mode and clears the active record.
    pub fn close_detail(&mut self) {
        self.modal.close();
    }

    /// Current dialog contents, or `None` when closed or stale.
    pub fn modal_view(&self) -> Option<ModalView> {
        let contact_id = self.modal.active_id()?;
        let index = self.store.position_of(contact_id)?;
        let record = self.store.get(index)?;
        let edit_form = match self.modal.draft() {
            Some(draft) => edit_form_from(draft),
            None => edit_form_view(record),
        };
        Some(ModalView {
            index,
            contact_id,
            editing: self.modal.is_editing(),
            detail: detail_view(record),
            edit_form,
        })
    }

    /// Enters edit mode with the form reset to stored values.
    pub fn begin_edit(&mut self) -> Option<ModalView> {
        let index = self.active_index()?;
        let draft = ContactForm::from_record(self.store.get(index)?);
        if !self.modal.begin_edit(draft) {
            return None;
        }
        self.modal_view()
    }

    /// Records one keystroke in the edit form; ignored outside edit mode.
    pub fn set_edit_field(&mut self, field: ContactField, value: impl Into<String>) -> bool {
        self.modal.set_draft_field(field, value)
    }

    /// Leaves edit mode without persisting; the form shows stored values.
    pub fn cancel_edit(&mut self) -> Option<ModalView> {
        self.modal.end_edit();
        self.modal_view()
    }

    /// Applies the edit form to the active record.
    ///
    /// Submitted text fields replace stored ones (trimmed); the photo is
    /// replaced only by an accepted upload. A record left without any photo
    /// gets an initials placeholder. Returns `None` unless editing a record
    /// that still exists.
    pub fn submit_edit(
        &mut self,
        form: &ContactForm,
        photo: Option<&PhotoUpload>,
    ) -> Option<EditOutcome> {
        if !self.modal.is_editing() {
            return None;
        }
        let Some(index) = self.active_index() else {
            warn!("event=contact_edit module=service status=skipped reason=stale_active_record");
            self.modal.close();
            return None;
        };

        let mut patch = form.to_patch();
        let (encoded, alert) = self.resolve_upload(photo);
        patch.photo = encoded;
        self.fill_missing_photo(index, &mut patch);

        self.store.update(index, &patch)?;
        self.modal.end_edit();
        info!(
            "event=contact_edit module=service status=ok index={} photo_alert={}",
            index,
            alert.is_some()
        );

        Some(EditOutcome {
            track: self.render(),
            modal: self.modal_view()?,
            alert,
        })
    }

    /// Scroll instruction for a carousel button.
    pub fn nav_button(&self, direction: NavDirection) -> ScrollCommand {
        match direction {
            NavDirection::Previous => scroll_by(-self.config.nav_button_step),
            NavDirection::Next => scroll_by(self.config.nav_button_step),
        }
    }

    /// Button enablement for the reported track geometry.
    pub fn nav_state(&self, metrics: TrackMetrics) -> NavButtonState {
        nav_button_state(metrics)
    }

    /// Window-level keys: arrows scroll, Escape closes the dialog.
    pub fn key_down(&mut self, key: &str) -> KeyOutcome {
        match key {
            "ArrowLeft" => KeyOutcome::Scroll(scroll_by(-self.config.arrow_key_step)),
            "ArrowRight" => KeyOutcome::Scroll(scroll_by(self.config.arrow_key_step)),
            "Escape" => {
                self.close_detail();
                KeyOutcome::ModalClosed
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Enter/Space on a focused card opens it.
    pub fn card_key(&mut self, index: usize, key: &str) -> Option<ModalView> {
        match key {
            "Enter" | " " => self.open_detail(index),
            _ => None,
        }
    }

    /// Card click; swallowed when it ends a drag.
    pub fn card_click(&mut self, index: usize) -> Option<ModalView> {
        if !self.drag.take_click() {
            return None;
        }
        self.open_detail(index)
    }

    pub fn pointer_down(&mut self, press: PointerPress, scroll_left: f64) -> bool {
        self.drag.press(press, scroll_left)
    }

    pub fn pointer_move(&mut self, client_x: f64) -> Option<DragUpdate> {
        self.drag.move_to(client_x)
    }

    /// Pointer up, cancel or leave.
    pub fn pointer_up(&mut self) -> Option<PointerRelease> {
        self.drag.release()
    }

    pub fn animation_frame(&mut self) {
        self.drag.animation_frame();
    }

    fn resolve_upload(&self, photo: Option<&PhotoUpload>) -> (Option<String>, Option<String>) {
        let Some(upload) = photo else {
            return (None, None);
        };
        match encode_upload(upload, self.config.max_photo_bytes) {
            Ok(encoded) => (Some(encoded), None),
            Err(err) => {
                warn!("event=photo_encode module=service status=rejected error={err}");
                (None, err.alert_message())
            }
        }
    }

    fn fill_missing_photo(&self, index: usize, patch: &mut ContactPatch) {
        let Some(existing) = self.store.get(index) else {
            return;
        };
        let mut merged = existing.clone();
        patch.apply(&mut merged);
        if merged.usable_photo().is_none() {
            patch.photo = Some(placeholder_portrait(merged.name.as_str()));
        }
    }
}
