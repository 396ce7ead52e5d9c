//! Ordered contact store persisted as one JSON array.
//!
//! # Responsibility
//! - Restore the sequence at startup (seed-or-restore).
//! - Provide positional add/update/read APIs and name filtering.
//!
//! # Invariants
//! - New records are prepended.
//! - Position is the operational identity for updates; ids are stable.
//! - The persisted value is always the full sequence.

use crate::model::contact::{seed_contacts, ContactId, ContactRecord};
use crate::model::form::ContactPatch;
use crate::storage::{KeyValueStorage, StorageError, StorageResult};
use log::{debug, error, warn};
use serde_json::Value;

/// Default storage key for the persisted contact array.
pub const DEFAULT_STORAGE_KEY: &str = "politodex-contacts";

/// In-memory contact sequence backed by a key-value slot.
pub struct ContactStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    contacts: Vec<ContactRecord>,
}

impl<S: KeyValueStorage> ContactStore<S> {
    /// Restores the persisted sequence, falling back to seed data.
    ///
    /// Never fails: a missing key, a storage read error, malformed JSON or a
    /// non-array value all yield the built-in seed list. Inside an array,
    /// elements that are not objects are skipped and the rest are kept.
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let contacts = restore_contacts(&storage, key.as_str());
        Self {
            storage,
            key,
            contacts,
        }
    }

    /// Storage key this store writes to.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn contacts(&self) -> &[ContactRecord] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ContactRecord> {
        self.contacts.get(index)
    }

    /// Current position of the record with stable `id`.
    pub fn position_of(&self, id: ContactId) -> Option<usize> {
        self.contacts.iter().position(|record| record.id == id)
    }

    /// Prepends `record` and persists the sequence.
    pub fn add(&mut self, record: ContactRecord) {
        self.contacts.insert(0, record);
        debug!(
            "event=contact_add module=store status=ok count={}",
            self.contacts.len()
        );
        let _ = self.save();
    }

    /// Merges `patch` into the record at `index` and persists the sequence.
    ///
    /// Returns the updated record, or `None` (no-op) for a stale index.
    pub fn update(&mut self, index: usize, patch: &ContactPatch) -> Option<&ContactRecord> {
        if index >= self.contacts.len() {
            warn!(
                "event=contact_update module=store status=skipped reason=stale_index index={} count={}",
                index,
                self.contacts.len()
            );
            return None;
        }
        patch.apply(&mut self.contacts[index]);
        debug!("event=contact_update module=store status=ok index={index}");
        let _ = self.save();
        self.contacts.get(index)
    }

    /// Case-insensitive name filter, keeping each record's store index.
    ///
    /// The query is trimmed; an empty query matches every record.
    pub fn filtered(&self, query: &str) -> Vec<(usize, &ContactRecord)> {
        let needle = query.trim().to_lowercase();
        self.contacts
            .iter()
            .enumerate()
            .filter(|(_, record)| record.name_matches(needle.as_str()))
            .collect()
    }

    /// Writes the full sequence to storage.
    ///
    /// Failures are logged and returned for diagnostics; mutation APIs
    /// ignore them so the session keeps its in-memory state.
    pub fn save(&mut self) -> StorageResult<()> {
        let payload = match serde_json::to_string(&self.contacts) {
            Ok(payload) => payload,
            Err(err) => {
                error!("event=contacts_save module=store status=error error_code=serialize_failed error={err}");
                return Err(StorageError::Encode(err));
            }
        };

        match self.storage.set_item(self.key.as_str(), payload.as_str()) {
            Ok(()) => {
                debug!(
                    "event=contacts_save module=store status=ok count={} bytes={}",
                    self.contacts.len(),
                    payload.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=contacts_save module=store status=error error_code=storage_write_failed error={err}"
                );
                Err(err)
            }
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Releases the backend, e.g. to reopen it in a new session.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

fn restore_contacts<S: KeyValueStorage>(storage: &S, key: &str) -> Vec<ContactRecord> {
    let stored = match storage.get_item(key) {
        Ok(Some(stored)) if !stored.is_empty() => stored,
        Ok(_) => {
            debug!("event=contacts_load module=store status=seed reason=missing_key");
            return seed_contacts();
        }
        Err(err) => {
            error!("event=contacts_load module=store status=seed reason=storage_read_failed error={err}");
            return seed_contacts();
        }
    };

    let elements = match serde_json::from_str::<Value>(stored.as_str()) {
        Ok(Value::Array(elements)) => elements,
        Ok(_) => {
            warn!("event=contacts_load module=store status=seed reason=not_an_array");
            return seed_contacts();
        }
        Err(err) => {
            // serde_json errors carry line/column only, never field values.
            error!("event=contacts_load module=store status=seed reason=parse_failed error={err}");
            return seed_contacts();
        }
    };

    let total = elements.len();
    let contacts = elements
        .into_iter()
        .enumerate()
        .filter_map(|(position, element)| restore_record(position, element))
        .collect::<Vec<_>>();
    debug!(
        "event=contacts_load module=store status=ok count={} skipped={}",
        contacts.len(),
        total - contacts.len()
    );
    contacts
}

/// Converts one stored element; anything but an object is skipped.
fn restore_record(position: usize, element: Value) -> Option<ContactRecord> {
    if !element.is_object() {
        warn!("event=contacts_load module=store status=skipped reason=not_an_object position={position}");
        return None;
    }
    match serde_json::from_value::<ContactRecord>(element) {
        Ok(record) => Some(record),
        Err(_) => {
            // Type errors may quote stored values; keep the line metadata-only.
            warn!("event=contacts_load module=store status=skipped reason=invalid_record position={position}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactStore, DEFAULT_STORAGE_KEY};
    use crate::model::contact::ContactRecord;
    use crate::storage::{KeyValueStorage, MemoryStorage};

    #[test]
    fn filtered_trims_query_and_keeps_store_indexes() {
        let mut store = ContactStore::load(MemoryStorage::new(), DEFAULT_STORAGE_KEY);
        store.add(ContactRecord::new("Ana Ray"));

        let hits = store.filtered("  MORTY ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 2);
        assert_eq!(hits[0].1.name, "President Morty");
        assert_eq!(store.filtered("").len(), 3);
    }

    #[test]
    fn load_does_not_write_seed_back() {
        let store = ContactStore::load(MemoryStorage::new(), DEFAULT_STORAGE_KEY);
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.storage().get_item(DEFAULT_STORAGE_KEY).expect("get"),
            None
        );
    }
}
