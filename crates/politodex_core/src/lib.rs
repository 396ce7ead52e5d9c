//! Core domain logic for the Politodex contact directory.
//! This crate is the single source of truth for directory state; UI
//! adapters only apply the render instructions it returns.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;
pub mod view;

pub use config::DirectoryConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{seed_contacts, ContactId, ContactRecord};
pub use model::form::{ContactField, ContactForm, ContactPatch};
pub use repo::contact_store::{ContactStore, DEFAULT_STORAGE_KEY};
pub use service::directory_service::{
    CreateOutcome, DirectoryService, EditOutcome, KeyOutcome, ModalView, NavDirection,
};
pub use service::photo::{
    encode_upload, initials, placeholder_portrait, PhotoError, PhotoUpload,
    DEFAULT_MAX_PHOTO_BYTES,
};
pub use storage::{
    KeyValueStorage, MemoryStorage, SqliteKeyValueStorage, StorageError, StorageResult,
};
pub use view::carousel::{
    DragUpdate, NavButtonState, PointerKind, PointerPress, PointerRelease, ScrollBehavior,
    ScrollCommand, TrackMetrics,
};
pub use view::modal::ModalState;
pub use view::{file_label, CardView, ContactLink, DetailView, EditFormView, TrackRender};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
