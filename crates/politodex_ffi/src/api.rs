//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the directory session to Dart via FRB as flat request/response
//!   envelopes.
//! - Own exactly one process-wide session backed by a SQLite key-value file.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Session access is serialized; every call runs to completion.
//! - An unusable database degrades to in-memory storage with seed data.

use log::{error, info};
use politodex_core::{
    core_version as core_version_inner, file_label as file_label_inner,
    init_logging as init_logging_inner, ping as ping_inner,
    ContactField, ContactForm, DirectoryConfig, DirectoryService, KeyOutcome, KeyValueStorage,
    MemoryStorage, ModalView, NavDirection, PhotoUpload, PointerKind, PointerPress,
    SqliteKeyValueStorage, TrackMetrics, TrackRender,
};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

const DIRECTORY_DB_FILE_NAME: &str = "politodex_directory.sqlite3";
#[cfg_attr(test, allow(dead_code))]
const ENV_DB_PATH: &str = "POLITODEX_DB_PATH";

type SessionStorage = Box<dyn KeyValueStorage + Send>;

static SESSION: OnceLock<Mutex<DirectoryService<SessionStorage>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Text fields submitted by the create or edit form.
///
/// `None` means the control was not part of the submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFieldsInput {
    pub name: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// File chosen in a photo input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoInput {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// One carousel card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardItem {
    /// True store position; pass back to `contact_open`.
    pub index: u32,
    pub contact_id: String,
    pub name: String,
    pub company: String,
    pub portrait_src: String,
    pub portrait_alt: String,
    pub aria_label: String,
}

/// Card track contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRenderResponse {
    pub cards: Vec<CardItem>,
    /// Set when nothing matched the current search.
    pub empty_message: Option<String>,
}

/// Dialog contents; `open=false` means the dialog must be hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalResponse {
    pub open: bool,
    pub editing: bool,
    pub index: Option<u32>,
    pub portrait_src: String,
    pub portrait_alt: String,
    pub name: String,
    pub company: String,
    pub industry: String,
    pub email_text: String,
    pub email_href: Option<String>,
    pub phone_text: String,
    pub phone_href: Option<String>,
    pub notes: String,
    /// Edit form values keyed by control name.
    pub edit_fields: Vec<(String, String)>,
    pub edit_file_label: String,
}

/// Result of a create/edit submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    pub ok: bool,
    pub contact_id: Option<String>,
    /// Message to show in an alert dialog.
    pub alert: Option<String>,
    /// Human-readable response message for diagnostics.
    pub message: String,
    pub render: DirectoryRenderResponse,
    pub modal: ModalResponse,
    /// Store index of the card that should receive focus.
    pub focus_index: Option<u32>,
}

/// Effect of a window-level key press.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyResponse {
    pub scroll_delta: Option<f64>,
    pub modal_closed: bool,
}

/// Navigation-button enablement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavStateResponse {
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// Renders the card track for the current search query.
#[flutter_rust_bridge::frb(sync)]
pub fn directory_render() -> DirectoryRenderResponse {
    with_session(|session| to_render_response(session.render()))
}

/// Sets the search query and re-renders.
#[flutter_rust_bridge::frb(sync)]
pub fn directory_search(query: String) -> DirectoryRenderResponse {
    with_session(|session| to_render_response(session.search(query)))
}

/// Submits the create form.
///
/// # FFI contract
/// - Never panics; storage failures are logged and the session keeps the
///   new record in memory.
/// - `alert` is set when the photo was rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_create(
    fields: ContactFieldsInput,
    photo: Option<PhotoInput>,
) -> ContactActionResponse {
    let form = to_form(&fields);
    let upload = photo.map(to_upload);
    with_session(|session| {
        let outcome = session.submit_create(&form, upload.as_ref());
        let modal = to_modal_response(session.modal_view());
        ContactActionResponse {
            ok: true,
            contact_id: Some(outcome.contact_id.to_string()),
            alert: outcome.alert,
            message: "Contact created.".to_string(),
            render: to_render_response(outcome.track),
            modal,
            focus_index: outcome.focus_index.map(to_u32),
        }
    })
}

/// Opens the detail dialog for the card at store `index`.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_open(index: u32) -> ModalResponse {
    with_session(|session| to_modal_response(session.open_detail(index as usize)))
}

/// Click on a card; ignored when the click ends a drag.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_card_click(index: u32) -> ModalResponse {
    with_session(|session| {
        session.card_click(index as usize);
        to_modal_response(session.modal_view())
    })
}

/// Key press on a focused card; Enter or Space opens it.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_card_key(index: u32, key: String) -> ModalResponse {
    with_session(|session| {
        session.card_key(index as usize, key.as_str());
        to_modal_response(session.modal_view())
    })
}

/// Label shown next to a photo input for the chosen file.
#[flutter_rust_bridge::frb(sync)]
pub fn photo_file_label(file_name: Option<String>) -> String {
    file_label_inner(file_name.as_deref())
}

#[flutter_rust_bridge::frb(sync)]
pub fn contact_close() -> ModalResponse {
    with_session(|session| {
        session.close_detail();
        ModalResponse::default()
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn contact_begin_edit() -> ModalResponse {
    with_session(|session| {
        session.begin_edit();
        to_modal_response(session.modal_view())
    })
}

/// Records a keystroke in the edit form. Returns `false` outside edit mode
/// or for an unknown control name.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_edit_field(field: String, value: String) -> bool {
    let Some(field) = ContactField::parse(field.as_str()) else {
        return false;
    };
    with_session(|session| session.set_edit_field(field, value))
}

#[flutter_rust_bridge::frb(sync)]
pub fn contact_cancel_edit() -> ModalResponse {
    with_session(|session| to_modal_response(session.cancel_edit()))
}

/// Submits the edit form against the open record.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_submit_edit(
    fields: ContactFieldsInput,
    photo: Option<PhotoInput>,
) -> ContactActionResponse {
    let form = to_form(&fields);
    let upload = photo.map(to_upload);
    with_session(|session| match session.submit_edit(&form, upload.as_ref()) {
        Some(outcome) => ContactActionResponse {
            ok: true,
            contact_id: Some(outcome.modal.contact_id.to_string()),
            alert: outcome.alert,
            message: "Contact updated.".to_string(),
            render: to_render_response(outcome.track),
            focus_index: None,
            modal: to_modal_response(Some(outcome.modal)),
        },
        None => ContactActionResponse {
            ok: false,
            contact_id: None,
            alert: None,
            message: "contact_submit_edit skipped: no contact is being edited".to_string(),
            render: to_render_response(session.render()),
            focus_index: None,
            modal: to_modal_response(session.modal_view()),
        },
    })
}

/// Window-level key press (`ArrowLeft`, `ArrowRight`, `Escape`).
#[flutter_rust_bridge::frb(sync)]
pub fn directory_key(key: String) -> KeyResponse {
    with_session(|session| match session.key_down(key.as_str()) {
        KeyOutcome::Scroll(command) => KeyResponse {
            scroll_delta: Some(command.delta),
            modal_closed: false,
        },
        KeyOutcome::ModalClosed => KeyResponse {
            scroll_delta: None,
            modal_closed: true,
        },
        KeyOutcome::Ignored => KeyResponse::default(),
    })
}

/// Smooth-scroll delta for the previous (`next=false`) or next button.
#[flutter_rust_bridge::frb(sync)]
pub fn directory_nav(next: bool) -> f64 {
    let direction = if next {
        NavDirection::Next
    } else {
        NavDirection::Previous
    };
    with_session(|session| session.nav_button(direction).delta)
}

#[flutter_rust_bridge::frb(sync)]
pub fn directory_nav_state(
    scroll_left: f64,
    scroll_width: f64,
    client_width: f64,
) -> NavStateResponse {
    let metrics = TrackMetrics {
        scroll_left,
        scroll_width,
        client_width,
    };
    with_session(|session| {
        let state = session.nav_state(metrics);
        NavStateResponse {
            prev_disabled: state.prev_disabled,
            next_disabled: state.next_disabled,
        }
    })
}

/// Pointer down on the track. `kind` is `mouse|touch|pen`.
#[flutter_rust_bridge::frb(sync)]
pub fn track_pointer_down(
    pointer_id: i64,
    kind: String,
    button: i16,
    is_primary: bool,
    client_x: f64,
    scroll_left: f64,
) -> bool {
    let kind = match kind.trim().to_ascii_lowercase().as_str() {
        "mouse" => PointerKind::Mouse,
        "pen" => PointerKind::Pen,
        _ => PointerKind::Touch,
    };
    let press = PointerPress {
        pointer_id,
        kind,
        button,
        is_primary,
        client_x,
    };
    with_session(|session| session.pointer_down(press, scroll_left))
}

/// Returns the scroll offset to apply while dragging.
#[flutter_rust_bridge::frb(sync)]
pub fn track_pointer_move(client_x: f64) -> Option<f64> {
    with_session(|session| {
        session
            .pointer_move(client_x)
            .map(|update| update.scroll_left)
    })
}

/// Pointer up/cancel/leave; returns whether the press was a drag.
#[flutter_rust_bridge::frb(sync)]
pub fn track_pointer_up() -> bool {
    with_session(|session| {
        session
            .pointer_up()
            .is_some_and(|release| release.was_drag)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn track_animation_frame() {
    with_session(|session| session.animation_frame());
}

fn with_session<T>(f: impl FnOnce(&mut DirectoryService<SessionStorage>) -> T) -> T {
    let session = SESSION.get_or_init(|| Mutex::new(new_session()));
    // A panic inside a previous call must not brick the session.
    let mut guard = session.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut *guard)
}

#[cfg(not(test))]
fn new_session() -> DirectoryService<SessionStorage> {
    let db_path = resolve_directory_db_path(std::env::var(ENV_DB_PATH).ok());
    open_session(&db_path, DirectoryConfig::from_env())
}

// Unit tests share the process-wide session; keep it off the on-disk file.
#[cfg(test)]
fn new_session() -> DirectoryService<SessionStorage> {
    DirectoryService::new(Box::new(MemoryStorage::new()), DirectoryConfig::default())
}

fn open_session(db_path: &Path, config: DirectoryConfig) -> DirectoryService<SessionStorage> {
    let storage: SessionStorage = match SqliteKeyValueStorage::open(db_path) {
        Ok(storage) => {
            info!("event=session_open module=ffi status=ok backend=sqlite");
            Box::new(storage)
        }
        Err(err) => {
            error!(
                "event=session_open module=ffi status=degraded backend=memory error_code=db_open_failed error={err}"
            );
            Box::new(MemoryStorage::new())
        }
    };
    DirectoryService::new(storage, config)
}

/// `raw` is the value of `POLITODEX_DB_PATH`; blank means unset.
fn resolve_directory_db_path(raw: Option<String>) -> PathBuf {
    if let Some(raw) = raw {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DIRECTORY_DB_FILE_NAME)
}

fn to_form(fields: &ContactFieldsInput) -> ContactForm {
    let mut form = ContactForm::new();
    let pairs = [
        (ContactField::Name, &fields.name),
        (ContactField::Company, &fields.company),
        (ContactField::Industry, &fields.industry),
        (ContactField::Email, &fields.email),
        (ContactField::Phone, &fields.phone),
        (ContactField::Notes, &fields.notes),
    ];
    for (field, value) in pairs {
        if let Some(value) = value {
            form.set(field, value.clone());
        }
    }
    form
}

fn to_upload(photo: PhotoInput) -> PhotoUpload {
    PhotoUpload::from_bytes(photo.file_name, photo.bytes)
}

fn to_render_response(track: TrackRender) -> DirectoryRenderResponse {
    match track {
        TrackRender::Empty { message } => DirectoryRenderResponse {
            cards: Vec::new(),
            empty_message: Some(message),
        },
        TrackRender::Cards(cards) => DirectoryRenderResponse {
            cards: cards
                .into_iter()
                .map(|card| CardItem {
                    index: to_u32(card.index),
                    contact_id: card.contact_id.to_string(),
                    name: card.name,
                    company: card.company,
                    portrait_src: card.portrait_src,
                    portrait_alt: card.portrait_alt,
                    aria_label: card.aria_label,
                })
                .collect(),
            empty_message: None,
        },
    }
}

fn to_modal_response(view: Option<ModalView>) -> ModalResponse {
    let Some(view) = view else {
        return ModalResponse::default();
    };
    let detail = view.detail;
    ModalResponse {
        open: true,
        editing: view.editing,
        index: Some(to_u32(view.index)),
        portrait_src: detail.portrait_src,
        portrait_alt: detail.portrait_alt,
        name: detail.name,
        company: detail.company,
        industry: detail.industry,
        email_text: detail.email.text,
        email_href: detail.email.href,
        phone_text: detail.phone.text,
        phone_href: detail.phone.href,
        notes: detail.notes,
        edit_fields: view
            .edit_form
            .fields
            .into_iter()
            .map(|(field, value)| (field.as_str().to_string(), value))
            .collect(),
        edit_file_label: view.edit_form.file_label,
    }
}

fn to_u32(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        contact_begin_edit, contact_cancel_edit, contact_card_key, contact_close, contact_create,
        contact_edit_field, contact_open, contact_submit_edit, core_version, directory_key,
        directory_nav, directory_nav_state, directory_render, init_logging, open_session,
        photo_file_label, ping, resolve_directory_db_path, ContactFieldsInput, PhotoInput,
        DIRECTORY_DB_FILE_NAME,
    };
    use politodex_core::DirectoryConfig;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn arrow_keys_and_nav_buttons_scroll() {
        let right = directory_key("ArrowRight".to_string());
        assert_eq!(right.scroll_delta, Some(250.0));
        assert!(!right.modal_closed);
        let left = directory_key("ArrowLeft".to_string());
        assert_eq!(left.scroll_delta, Some(-250.0));
        assert_eq!(directory_key("Tab".to_string()).scroll_delta, None);
        assert_eq!(directory_nav(true), 300.0);
        assert_eq!(directory_nav(false), -300.0);

        let state = directory_nav_state(0.0, 900.0, 300.0);
        assert!(state.prev_disabled);
        assert!(!state.next_disabled);
    }

    // Single test drives the shared session so dialog state is not raced by
    // other tests.
    #[test]
    fn create_open_edit_cancel_submit_close_flow() {
        let name = unique_token("ffi-contact");
        let created = contact_create(
            ContactFieldsInput {
                name: Some(format!("  {name} ")),
                phone: Some("+1 (555) 000-1111".to_string()),
                ..ContactFieldsInput::default()
            },
            Some(PhotoInput {
                file_name: "huge.png".to_string(),
                bytes: vec![0; 5 * 1024 * 1024],
            }),
        );
        assert!(created.ok, "{}", created.message);
        assert!(created.alert.is_some());

        let rendered = directory_render();
        let card = rendered
            .cards
            .iter()
            .find(|card| card.name == name)
            .expect("created card should render");
        assert!(card.portrait_src.starts_with("data:image/svg+xml;base64,"));

        let opened = contact_open(card.index);
        assert!(opened.open && !opened.editing);
        assert_eq!(opened.phone_href.as_deref(), Some("tel:+15550001111"));

        assert!(contact_begin_edit().editing);
        assert!(contact_edit_field("phone".to_string(), "555-1234".to_string()));
        assert!(!contact_edit_field("photo".to_string(), "x".to_string()));
        let cancelled = contact_cancel_edit();
        assert!(!cancelled.editing);
        assert_eq!(cancelled.phone_text, "+1 (555) 000-1111");

        contact_begin_edit();
        let submitted = contact_submit_edit(
            ContactFieldsInput {
                notes: Some(" met at the citadel ".to_string()),
                ..ContactFieldsInput::default()
            },
            None,
        );
        assert!(submitted.ok, "{}", submitted.message);
        assert_eq!(submitted.modal.notes, "met at the citadel");
        assert_eq!(submitted.modal.name, name);

        assert!(!contact_close().open);
        assert!(!contact_card_key(card.index, "Tab".to_string()).open);
        let reopened = contact_card_key(card.index, "Enter".to_string());
        assert!(reopened.open);
        assert_eq!(reopened.name, name);
        assert!(!contact_close().open);

        let skipped = contact_submit_edit(ContactFieldsInput::default(), None);
        assert!(!skipped.ok);
    }

    #[test]
    fn photo_file_label_falls_back_when_nothing_chosen() {
        assert_eq!(photo_file_label(Some("face.png".to_string())), "face.png");
        assert_eq!(photo_file_label(None), "No file selected");
    }

    #[test]
    fn db_path_uses_override_or_temp_dir() {
        assert_eq!(
            resolve_directory_db_path(Some(" /data/contacts.sqlite3 ".to_string())),
            PathBuf::from("/data/contacts.sqlite3")
        );
        let fallback = std::env::temp_dir().join(DIRECTORY_DB_FILE_NAME);
        assert_eq!(resolve_directory_db_path(Some("  ".to_string())), fallback);
        assert_eq!(resolve_directory_db_path(None), fallback);
    }

    #[test]
    fn open_session_persists_to_the_given_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("directory.sqlite3");
        let mut form = politodex_core::ContactForm::new();
        form.set(politodex_core::ContactField::Name, "Ana Ray");

        let mut session = open_session(&path, DirectoryConfig::default());
        session.submit_create(&form, None);
        drop(session);

        let reopened = open_session(&path, DirectoryConfig::default());
        assert_eq!(reopened.store().len(), 3);
        assert_eq!(reopened.store().contacts()[0].name, "Ana Ray");
    }

    #[test]
    fn open_session_degrades_to_memory_when_the_file_is_unusable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing").join("directory.sqlite3");
        let session = open_session(&path, DirectoryConfig::default());
        assert_eq!(session.store().len(), 2);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
