mod import;
mod capsule_tests;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LEVEL, SCHEMA_TAG};
use crate::error::{ValidationError, ValidationResult};

pub(crate) fn default_level() -> String {
    DEFAULT_LEVEL.to_owned()
}

fn default_schema() -> String {
    SCHEMA_TAG.to_owned()
}

/// Self-contained study unit: metadata plus notes, flashcards and a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capsule {
    /// Format tag, always [`SCHEMA_TAG`] for capsules written by this crate
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Unique identifier, immutable once assigned
    pub id: String,
    pub meta: CapsuleMeta,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleMeta {
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub desc: String,
    /// Set once, when the capsule is first saved
    pub created_at: DateTime<Utc>,
    /// Refreshed on every save
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(default)]
    pub front: String,
    #[serde(default)]
    pub back: String,
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self { front: front.into(), back: back.into() }
    }
}

/// Multiple-choice question. `answer_index` points into `choices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub q: String,
    pub choices: Vec<String>,
    #[serde(default)]
    pub answer_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<String>,
}

impl QuizQuestion {
    /// Letter shown next to a choice (`0` -> `A`).
    #[must_use]
    pub fn choice_letter(index: usize) -> char {
        u8::try_from(index)
            .ok()
            .and_then(|i| b'A'.checked_add(i))
            .map_or('?', char::from)
    }

    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.answer_index
    }
}

/// Denormalized projection of a capsule used for library listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default = "default_level")]
    pub level: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&Capsule> for IndexEntry {
    fn from(capsule: &Capsule) -> Self {
        Self {
            id: capsule.id.clone(),
            title: capsule.meta.title.clone(),
            subject: capsule.meta.subject.clone(),
            level: capsule.meta.level.clone(),
            updated_at: capsule.meta.updated_at,
        }
    }
}

impl Capsule {
    /// Whether at least one section carries something to study.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.notes.iter().any(|n| !n.trim().is_empty())
            || !self.flashcards.is_empty()
            || !self.quiz.is_empty()
    }

    /// Checks the invariants every persisted capsule must satisfy.
    ///
    /// # Errors
    /// Returns the first violated rule: blank title, no content, or a quiz
    /// answer that does not address one of its choices.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.meta.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if !self.has_content() {
            return Err(ValidationError::EmptyContent);
        }
        for (question, q) in self.quiz.iter().enumerate() {
            if q.answer_index >= q.choices.len() {
                return Err(ValidationError::AnswerOutOfRange {
                    question,
                    answer_index: q.answer_index,
                    choices: q.choices.len(),
                });
            }
        }
        Ok(())
    }

    /// Pretty-printed JSON suitable for an export file.
    ///
    /// # Errors
    /// Returns error if serialization fails.
    pub fn to_export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
