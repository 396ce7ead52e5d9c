//! Directory configuration defaults and environment overrides.
//!
//! # Invariants
//! - Invalid override values are ignored (logged) and the default is kept.
//! - Configuration never fails to build.

use crate::repo::contact_store::DEFAULT_STORAGE_KEY;
use crate::service::photo::DEFAULT_MAX_PHOTO_BYTES;
use crate::view::carousel::{ARROW_KEY_STEP, DRAG_THRESHOLD, NAV_BUTTON_STEP};
use log::warn;

pub const ENV_STORAGE_KEY: &str = "POLITODEX_STORAGE_KEY";
pub const ENV_MAX_PHOTO_BYTES: &str = "POLITODEX_MAX_PHOTO_BYTES";

/// Runtime knobs for one directory session.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryConfig {
    /// Storage key holding the persisted contact array.
    pub storage_key: String,
    /// Upload ceiling; larger photos are rejected with an alert.
    pub max_photo_bytes: u64,
    /// Scroll distance of the previous/next buttons.
    pub nav_button_step: f64,
    /// Scroll distance of the arrow keys.
    pub arrow_key_step: f64,
    /// Pointer travel (px) after which a press on the track is a drag.
    pub drag_threshold: f64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
            nav_button_step: NAV_BUTTON_STEP,
            arrow_key_step: ARROW_KEY_STEP,
            drag_threshold: DRAG_THRESHOLD,
        }
    }
}

impl DirectoryConfig {
    /// Defaults overridden by `POLITODEX_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_STORAGE_KEY) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                warn!("event=config_override module=config status=ignored key={ENV_STORAGE_KEY} reason=empty");
            } else {
                config.storage_key = trimmed.to_string();
            }
        }

        if let Some(raw) = lookup(ENV_MAX_PHOTO_BYTES) {
            match raw.trim().parse::<u64>() {
                Ok(value) if value > 0 => config.max_photo_bytes = value,
                _ => warn!(
                    "event=config_override module=config status=ignored key={ENV_MAX_PHOTO_BYTES} reason=invalid_number"
                ),
            }
        }

        config
    }
}
