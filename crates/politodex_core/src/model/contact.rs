//! Contact record and built-in seed data.
//!
//! # Invariants
//! - Text fields are never `null`; missing values read as empty strings and
//!   scalar values (numbers, booleans) read as their text form.
//! - `photo` is `None` or a non-empty image URL / `data:` URL.
//! - Keys this model does not know are carried through a save unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Stable identifier assigned to every contact at creation time.
pub type ContactId = Uuid;

/// One directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Generated for records restored without a valid one.
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient_id")]
    pub id: ContactId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub industry: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
    /// Remote URL or inline `data:` URL.
    #[serde(default, deserialize_with = "non_empty_photo")]
    pub photo: Option<String>,
    /// Stored keys written by other clients.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContactRecord {
    /// Creates an empty record with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            company: String::new(),
            industry: String::new(),
            email: String::new(),
            phone: String::new(),
            notes: String::new(),
            photo: None,
            extra: Map::new(),
        }
    }

    /// Returns the stored photo when it is usable as an image source.
    pub fn usable_photo(&self) -> Option<&str> {
        self.photo
            .as_deref()
            .map(str::trim)
            .filter(|photo| !photo.is_empty())
    }

    /// Case-insensitive substring match against `name`.
    ///
    /// `needle_lower` must already be lowercased; an empty needle matches.
    pub fn name_matches(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty() || self.name.to_lowercase().contains(needle_lower)
    }
}

/// Built-in records used when nothing valid is persisted.
pub fn seed_contacts() -> Vec<ContactRecord> {
    vec![
        ContactRecord {
            id: Uuid::new_v4(),
            name: "Rick Sanchez".to_string(),
            company: "Campaign for Galactic Unity".to_string(),
            industry: "Multiverse Strategy".to_string(),
            email: "rick@citadel.gov".to_string(),
            phone: "+44 020 1234 567".to_string(),
            notes: "Chief strategist specializing in cross-reality outreach initiatives. Prefers unconventional tactics.".to_string(),
            photo: Some(
                "https://images.unsplash.com/photo-1527980965255-d3b416303d12?auto=format&fit=crop&w=400&q=80"
                    .to_string(),
            ),
            extra: Map::new(),
        },
        ContactRecord {
            id: Uuid::new_v4(),
            name: "President Morty".to_string(),
            company: "Citadel Governance Council".to_string(),
            industry: "Executive Leadership".to_string(),
            email: "president.morty@citadel.gov".to_string(),
            phone: "+1 (202) 555-0110".to_string(),
            notes: "Progressive liaison and key power broker when navigating citadel-level policy decisions.".to_string(),
            photo: Some(
                "https://images.unsplash.com/photo-1603415527039-36e4abcc2cb9?auto=format&fit=crop&w=400&q=80"
                    .to_string(),
            ),
            extra: Map::new(),
        },
    ]
}

/// Text form of a stored JSON value; `null` reads as empty.
fn value_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        composite => composite.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(Value::deserialize(deserializer)?))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<ContactId, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Value::deserialize(deserializer)? {
        Value::String(text) => Uuid::parse_str(text.trim()).ok(),
        _ => None,
    };
    Ok(id.unwrap_or_else(Uuid::new_v4))
}

fn non_empty_photo<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let photo = match Value::deserialize(deserializer)? {
        Value::String(photo) => Some(photo),
        _ => None,
    };
    Ok(photo.filter(|photo| !photo.trim().is_empty()))
}
