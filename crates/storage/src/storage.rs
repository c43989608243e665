//! Record layer over a [`KeyValueStore`].
//!
//! Nothing in here returns an error. Missing or unreadable records degrade
//! to "empty library" and "zero progress", failed writes come back as
//! `false`, and every fault is logged where it happens.

use std::collections::{BTreeSet, HashMap};

use pocket_classroom_core::{Capsule, IndexEntry, Progress};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::StoreBackend;
use crate::error::StorageError;
use crate::keys::{INDEX_KEY, capsule_id_from_key, capsule_key, progress_id_from_key, progress_key};
use crate::traits::KeyValueStore;

/// Storage layer: capsule index, capsule records and progress records.
#[derive(Clone, Debug)]
pub struct Storage<S = StoreBackend> {
    store: S,
}

/// Read-only comparison of the index against the records actually stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Index entries whose capsule record is missing or unreadable
    pub missing_capsules: Vec<String>,
    /// Capsule records with no index entry
    pub unindexed_capsules: Vec<String>,
    /// Progress records whose capsule record is gone
    pub orphaned_progress: Vec<String>,
    /// Ids listed more than once in the index
    pub duplicate_entries: Vec<String>,
}

impl ConsistencyReport {
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.missing_capsules.is_empty()
            && self.unindexed_capsules.is_empty()
            && self.orphaned_progress.is_empty()
            && self.duplicate_entries.is_empty()
    }
}

impl<S: KeyValueStore> Storage<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying key-value backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.store.get(key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn write_record<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)?;
        self.store.set(key, &text)
    }

    /// All index entries in stored order; empty if absent or unreadable.
    pub fn load_index(&self) -> Vec<IndexEntry> {
        self.read_index().unwrap_or_default()
    }

    /// Index for a read-modify-write: empty if absent, `None` if unreadable.
    ///
    /// Callers rewriting the index must not replace an unreadable one.
    pub fn read_index(&self) -> Option<Vec<IndexEntry>> {
        match self.read_record::<Vec<IndexEntry>>(INDEX_KEY) {
            Ok(index) => Some(index.unwrap_or_default()),
            Err(e) => {
                tracing::error!(error = %e, "Error loading capsules index");
                None
            },
        }
    }

    /// Overwrites the whole index.
    pub fn save_index(&self, entries: &[IndexEntry]) -> bool {
        match self.write_record(INDEX_KEY, entries) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, entries = entries.len(), "Error saving capsules index");
                false
            },
        }
    }

    /// Full capsule record; `None` if absent or unreadable.
    pub fn load_capsule(&self, id: &str) -> Option<Capsule> {
        match self.read_record::<Capsule>(&capsule_key(id)) {
            Ok(Some(capsule)) => {
                if capsule.id != id {
                    tracing::warn!(capsule_id = id, stored_id = %capsule.id, "Capsule record id differs from its key");
                }
                Some(capsule)
            },
            Ok(None) => None,
            Err(e) => {
                tracing::error!(capsule_id = id, error = %e, "Error loading capsule");
                None
            },
        }
    }

    /// Overwrites the record keyed by `capsule.id`.
    pub fn save_capsule(&self, capsule: &Capsule) -> bool {
        match self.write_record(&capsule_key(&capsule.id), capsule) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(capsule_id = %capsule.id, error = %e, "Error saving capsule");
                false
            },
        }
    }

    /// Progress for `id`; zero progress if none was recorded or it is unreadable.
    pub fn load_progress(&self, id: &str) -> Progress {
        match self.read_record::<Progress>(&progress_key(id)) {
            Ok(progress) => progress.unwrap_or_default().clamped(),
            Err(e) => {
                tracing::error!(capsule_id = id, error = %e, "Error loading progress");
                Progress::default()
            },
        }
    }

    pub fn save_progress(&self, id: &str, progress: &Progress) -> bool {
        match self.write_record(&progress_key(id), progress) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(capsule_id = id, error = %e, "Error saving progress");
                false
            },
        }
    }

    /// Removes the capsule record, then its progress, then its index entry.
    ///
    /// Each step runs even if an earlier one failed. Returns `false` if any
    /// step failed, which can leave the three records out of step with each
    /// other; nothing repairs that afterwards.
    pub fn delete_capsule(&self, id: &str) -> bool {
        let mut ok = true;

        if let Err(e) = self.store.remove(&capsule_key(id)) {
            tracing::error!(capsule_id = id, error = %e, "Error deleting capsule record");
            ok = false;
        }

        if let Err(e) = self.store.remove(&progress_key(id)) {
            tracing::error!(capsule_id = id, error = %e, "Error deleting progress record");
            ok = false;
        }

        match self.read_index() {
            Some(mut index) => {
                let before = index.len();
                index.retain(|entry| entry.id != id);
                if index.len() != before && !self.save_index(&index) {
                    ok = false;
                }
            },
            None => {
                tracing::warn!(capsule_id = id, "Index unreadable, leaving it untouched");
                ok = false;
            },
        }

        if ok {
            tracing::debug!(capsule_id = id, "Capsule deleted");
        }
        ok
    }

    /// Compares the index with the stored records without changing anything.
    ///
    /// Returns `None` if the backend cannot list its keys.
    pub fn consistency_report(&self) -> Option<ConsistencyReport> {
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::error!(error = %e, "Error listing stored keys");
                return None;
            },
        };

        let stored: BTreeSet<&str> = keys.iter().filter_map(|k| capsule_id_from_key(k)).collect();
        let index = self.load_index();

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for entry in &index {
            *seen.entry(entry.id.as_str()).or_default() += 1;
        }

        let mut report = ConsistencyReport::default();
        for entry in &index {
            let missing =
                !stored.contains(entry.id.as_str()) || self.load_capsule(&entry.id).is_none();
            if missing && !report.missing_capsules.contains(&entry.id) {
                report.missing_capsules.push(entry.id.clone());
            }
        }
        report.duplicate_entries = seen
            .iter()
            .filter(|&(_, count)| *count > 1)
            .map(|(id, _)| (*id).to_owned())
            .collect();
        report.duplicate_entries.sort();
        report.unindexed_capsules = stored
            .iter()
            .filter(|id| !seen.contains_key(*id))
            .map(|id| (*id).to_owned())
            .collect();
        report.orphaned_progress = keys
            .iter()
            .filter_map(|k| progress_id_from_key(k))
            .filter(|id| !stored.contains(id))
            .map(str::to_owned)
            .collect();
        report.orphaned_progress.sort();

        Some(report)
    }
}
