//! Service layer for pocket-classroom
//!
//! Keeps the capsule index and the capsule records in step, and applies
//! quiz results and flashcard toggles to progress.

mod error;
mod library_service;
mod progress_service;
#[cfg(test)]
mod tests;

pub use error::{ServiceError, ServiceResult};
pub use library_service::{CapsuleExport, LibraryCard, LibraryService};
pub use progress_service::{ProgressService, QuizRecord};
