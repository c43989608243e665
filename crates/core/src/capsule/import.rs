//! Import of capsules exported by this or another library.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{Capsule, CapsuleMeta, Flashcard, QuizQuestion, default_level};
use crate::constants::{CHOICES_PER_QUESTION, SCHEMA_TAG};
use crate::error::{ValidationError, ValidationResult};

impl Capsule {
    /// Parses an exported capsule and re-stamps it for this library.
    ///
    /// The imported id is never trusted: `new_id` replaces it. `createdAt` is
    /// kept when present, `updatedAt` is always `now`.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for malformed JSON, a schema tag other
    /// than [`SCHEMA_TAG`], a missing title, a question without exactly
    /// [`CHOICES_PER_QUESTION`] choices, or a capsule without content.
    /// Blank notes are dropped before the content check.
    pub fn from_import(text: &str, new_id: String, now: DateTime<Utc>) -> ValidationResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;

        match value.get("schema") {
            Some(serde_json::Value::String(tag)) if tag == SCHEMA_TAG => {},
            Some(serde_json::Value::String(tag)) => {
                return Err(ValidationError::SchemaMismatch { found: Some(tag.clone()) });
            },
            Some(other) => {
                return Err(ValidationError::SchemaMismatch { found: Some(other.to_string()) });
            },
            None => return Err(ValidationError::SchemaMismatch { found: None }),
        }

        let imported: ImportedCapsule = serde_json::from_value(value)
            .map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
        let meta = imported.meta.unwrap_or_default();
        let title = meta.title.filter(|t| !t.trim().is_empty()).ok_or(ValidationError::MissingTitle)?;

        if let Some((question, q)) = imported
            .quiz
            .iter()
            .enumerate()
            .find(|(_, q)| q.choices.len() != CHOICES_PER_QUESTION)
        {
            return Err(ValidationError::ChoiceCount {
                question,
                choices: q.choices.len(),
                expected: CHOICES_PER_QUESTION,
            });
        }

        let capsule = Self {
            schema: SCHEMA_TAG.to_owned(),
            id: new_id,
            meta: CapsuleMeta {
                title,
                subject: meta.subject,
                level: meta.level.unwrap_or_else(default_level),
                desc: meta.desc,
                created_at: meta.created_at.unwrap_or(now),
                updated_at: now,
            },
            notes: imported.notes.into_iter().filter(|note| !note.trim().is_empty()).collect(),
            flashcards: imported.flashcards,
            quiz: imported.quiz,
        };
        capsule.validate()?;
        Ok(capsule)
    }
}

/// Lenient shape of an import file; every field may be missing.
#[derive(Deserialize)]
struct ImportedCapsule {
    meta: Option<ImportedMeta>,
    #[serde(default)]
    notes: Vec<String>,
    #[serde(default)]
    flashcards: Vec<Flashcard>,
    #[serde(default)]
    quiz: Vec<QuizQuestion>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ImportedMeta {
    title: Option<String>,
    #[serde(default)]
    subject: String,
    level: Option<String>,
    #[serde(default)]
    desc: String,
    created_at: Option<DateTime<Utc>>,
}
