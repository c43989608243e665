use std::sync::Arc;

use pocket_classroom_core::{Progress, quiz_score, score_message};
use pocket_classroom_storage::{KeyValueStore, Storage, StoreBackend};

use crate::error::{ServiceError, ServiceResult};

/// Result of folding one finished quiz into stored progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizRecord {
    pub score: u8,
    pub best_score: u8,
    pub message: &'static str,
}

pub struct ProgressService<S = StoreBackend> {
    storage: Arc<Storage<S>>,
}

impl<S: KeyValueStore> ProgressService<S> {
    #[must_use]
    pub const fn new(storage: Arc<Storage<S>>) -> Self {
        Self { storage }
    }

    /// Stored progress, or zero progress if none was recorded yet.
    pub fn progress(&self, id: &str) -> Progress {
        self.storage.load_progress(id)
    }

    /// Scores a finished quiz and keeps the better of old and new score.
    ///
    /// # Errors
    /// Same as [`Self::record_score`].
    pub fn finish_quiz(&self, id: &str, correct: usize, total: usize) -> ServiceResult<QuizRecord> {
        let score = quiz_score(correct, total);
        let best_score = self.record_score(id, score)?;
        Ok(QuizRecord { score, best_score, message: score_message(score) })
    }

    /// Folds `score` into the best score. Returns the best score afterwards.
    ///
    /// # Errors
    /// - [`ServiceError::NotFound`] if the capsule does not exist; nothing is written
    /// - [`ServiceError::ProgressWrite`] if the updated record was not saved
    pub fn record_score(&self, id: &str, score: u8) -> ServiceResult<u8> {
        if self.storage.load_capsule(id).is_none() {
            return Err(ServiceError::NotFound(id.to_owned()));
        }
        let mut progress = self.storage.load_progress(id);
        let previous = progress.best_score;
        let best = progress.record_score(score);
        if best != previous && !self.storage.save_progress(id, &progress) {
            return Err(ServiceError::ProgressWrite(id.to_owned()));
        }
        tracing::debug!(capsule_id = id, score, best, "Quiz score recorded");
        Ok(best)
    }

    /// Marks the flashcard at `index` known or unknown.
    ///
    /// Positions refer to the capsule's current flashcard order.
    ///
    /// # Errors
    /// - [`ServiceError::NotFound`] if the capsule does not exist
    /// - [`ServiceError::FlashcardOutOfRange`] if `index` is past its last card
    /// - [`ServiceError::ProgressWrite`] if the record was not saved
    pub fn set_flashcard_known(&self, id: &str, index: usize, known: bool) -> ServiceResult<Progress> {
        let capsule =
            self.storage.load_capsule(id).ok_or_else(|| ServiceError::NotFound(id.to_owned()))?;
        let len = capsule.flashcards.len();
        if index >= len {
            return Err(ServiceError::FlashcardOutOfRange { id: id.to_owned(), index, len });
        }

        let mut progress = self.storage.load_progress(id);
        if progress.set_known(index, known) && !self.storage.save_progress(id, &progress) {
            return Err(ServiceError::ProgressWrite(id.to_owned()));
        }
        Ok(progress)
    }
}
