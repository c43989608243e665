//! Typed error enum for the service layer.
//!
//! Storage never fails loudly, so the write-side variants here are raised
//! from the boolean results of [`pocket_classroom_storage::Storage`].

use pocket_classroom_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Candidate capsule was refused before any write.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No capsule with this id exists.
    #[error("Capsule not found: {0}")]
    NotFound(String),

    /// Capsule record could not be written; the index was left alone.
    #[error("Error saving capsule {0}")]
    CapsuleWrite(String),

    /// Capsule record was written but its index entry was not.
    #[error("Capsule {0} was saved but the library index could not be updated")]
    IndexWrite(String),

    #[error("Error saving progress for capsule {0}")]
    ProgressWrite(String),

    /// At least one step of the delete cascade failed.
    #[error("Error deleting capsule {0}")]
    DeleteFailed(String),

    /// Flashcard position outside the capsule's deck.
    #[error("Capsule {id} has no flashcard {index} (it has {len})")]
    FlashcardOutOfRange { id: String, index: usize, len: usize },

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the request was refused before touching storage.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::FlashcardOutOfRange { .. })
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
