//! Library operations that touch the index: create, edit, import, export,
//! delete and listing.
//!
//! Every write goes through [`LibraryService::commit`]: the capsule record is
//! written first and the index only after that write succeeded, so a failure
//! in between can leave an unlisted capsule but never an index entry without
//! its capsule.

use std::sync::Arc;

use chrono::Utc;
use pocket_classroom_core::{
    Capsule, CapsuleDraft, IndexEntry, Progress, export_file_name, generate_id,
};
use pocket_classroom_storage::{ConsistencyReport, KeyValueStore, Storage, StoreBackend};
use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};

/// Attempts at drawing an id no stored capsule already uses.
const MAX_ID_ATTEMPTS: usize = 8;

/// Index entry joined with the learner's progress, as the library lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryCard {
    #[serde(flatten)]
    pub entry: IndexEntry,
    pub best_score: u8,
    pub known_cards: usize,
}

/// Export file contents and the file name to save them under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapsuleExport {
    pub file_name: String,
    pub json: String,
}

pub struct LibraryService<S = StoreBackend> {
    storage: Arc<Storage<S>>,
}

impl<S: KeyValueStore> LibraryService<S> {
    #[must_use]
    pub const fn new(storage: Arc<Storage<S>>) -> Self {
        Self { storage }
    }

    /// Library listing in index order.
    pub fn list(&self) -> Vec<LibraryCard> {
        self.storage
            .load_index()
            .into_iter()
            .map(|entry| {
                let progress: Progress = self.storage.load_progress(&entry.id);
                LibraryCard { best_score: progress.best_score, known_cards: progress.known_count(), entry }
            })
            .collect()
    }

    /// Loads a capsule for learning or editing.
    ///
    /// # Errors
    /// [`ServiceError::NotFound`] if no readable record exists. No index
    /// entry is created as a side effect.
    pub fn get(&self, id: &str) -> ServiceResult<Capsule> {
        self.storage.load_capsule(id).ok_or_else(|| ServiceError::NotFound(id.to_owned()))
    }

    /// Validates and persists a capsule, then upserts its index entry.
    ///
    /// An existing entry with the same id is replaced in place; otherwise the
    /// entry is appended.
    ///
    /// # Errors
    /// - [`ServiceError::Validation`] before any write
    /// - [`ServiceError::CapsuleWrite`] if the record was not stored; the
    ///   index is not touched
    /// - [`ServiceError::IndexWrite`] if the record was stored but the index
    ///   was not updated, including when the stored index is unreadable and
    ///   was left as it is
    pub fn commit(&self, capsule: &Capsule) -> ServiceResult<IndexEntry> {
        capsule.validate()?;

        if !self.storage.save_capsule(capsule) {
            return Err(ServiceError::CapsuleWrite(capsule.id.clone()));
        }

        let entry = IndexEntry::from(capsule);
        let Some(mut index) = self.storage.read_index() else {
            tracing::warn!(capsule_id = %capsule.id, "Index unreadable, capsule saved without entry");
            return Err(ServiceError::IndexWrite(capsule.id.clone()));
        };
        match index.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry.clone(),
            None => index.push(entry.clone()),
        }

        if !self.storage.save_index(&index) {
            tracing::warn!(capsule_id = %capsule.id, "Capsule saved without index entry");
            return Err(ServiceError::IndexWrite(capsule.id.clone()));
        }

        tracing::info!(capsule_id = %capsule.id, title = %capsule.meta.title, "Capsule committed");
        Ok(entry)
    }

    /// Author save: turns form input into a capsule and commits it.
    ///
    /// `editing` is the id of the capsule being edited, or `None` for a new
    /// capsule. Editing keeps the id and the original creation time.
    ///
    /// # Errors
    /// [`ServiceError::NotFound`] if `editing` names a capsule that no longer
    /// exists, plus everything [`Self::commit`] returns.
    pub fn save_draft(&self, editing: Option<&str>, draft: CapsuleDraft) -> ServiceResult<Capsule> {
        let (id, created_at) = match editing {
            Some(id) => {
                let existing = self.get(id)?;
                (existing.id, Some(existing.meta.created_at))
            },
            None => (self.fresh_id(), None),
        };

        let capsule = draft.into_capsule(id, created_at, Utc::now())?;
        self.commit(&capsule)?;
        Ok(capsule)
    }

    /// Imports an exported capsule under a newly generated id.
    ///
    /// # Errors
    /// [`ServiceError::Validation`] for malformed text, a foreign schema tag,
    /// a missing title or empty content; nothing is written in those cases.
    /// Write failures as in [`Self::commit`].
    pub fn import(&self, text: &str) -> ServiceResult<Capsule> {
        let capsule = Capsule::from_import(text, self.fresh_id(), Utc::now())?;
        self.commit(&capsule)?;
        tracing::info!(capsule_id = %capsule.id, "Capsule imported");
        Ok(capsule)
    }

    /// Serializes a stored capsule for export.
    ///
    /// # Errors
    /// [`ServiceError::NotFound`] if the capsule does not exist.
    pub fn export(&self, id: &str) -> ServiceResult<CapsuleExport> {
        let capsule = self.get(id)?;
        Ok(CapsuleExport {
            file_name: export_file_name(&capsule.meta.title),
            json: capsule.to_export_json()?,
        })
    }

    /// Deletes a capsule with its progress and index entry.
    ///
    /// # Errors
    /// - [`ServiceError::NotFound`] if neither an index entry nor a record
    ///   exists for `id`; nothing is touched
    /// - [`ServiceError::DeleteFailed`] if any cascade step failed; the steps
    ///   that could run have already been applied
    pub fn delete(&self, id: &str) -> ServiceResult<IndexEntry> {
        let listed = self.storage.load_index().into_iter().find(|e| e.id == id);
        let entry = match listed {
            Some(entry) => entry,
            None => {
                let capsule = self.get(id)?;
                IndexEntry::from(&capsule)
            },
        };

        if !self.storage.delete_capsule(id) {
            return Err(ServiceError::DeleteFailed(id.to_owned()));
        }
        tracing::info!(capsule_id = id, title = %entry.title, "Capsule deleted");
        Ok(entry)
    }

    /// Read-only check of index/record drift. `None` if the store cannot be listed.
    pub fn consistency_report(&self) -> Option<ConsistencyReport> {
        self.storage.consistency_report()
    }

    fn fresh_id(&self) -> String {
        let mut id = generate_id();
        for _ in 1..MAX_ID_ATTEMPTS {
            if self.storage.load_capsule(&id).is_none() {
                break;
            }
            tracing::warn!(capsule_id = %id, "Generated id already in use, drawing another");
            id = generate_id();
        }
        id
    }
}
