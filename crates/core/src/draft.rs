//! Raw authoring input and its conversion into a candidate capsule.
//!
//! A draft mirrors what the authoring form collects: free text for notes,
//! rows of flashcard inputs and blocks of question inputs, none of them
//! trimmed. [`CapsuleDraft::into_capsule`] applies the form's cleanup rules
//! and stamps identity and timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capsule::{Capsule, CapsuleMeta, Flashcard, QuizQuestion};
use crate::constants::{CHOICES_PER_QUESTION, DEFAULT_LEVEL, SCHEMA_TAG};
use crate::error::ValidationResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapsuleDraft {
    pub title: String,
    pub subject: String,
    pub level: String,
    pub desc: String,
    /// One note per line; blank lines are dropped
    pub notes: String,
    pub flashcards: Vec<Flashcard>,
    pub quiz: Vec<QuestionDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub q: String,
    pub choices: Vec<String>,
    pub answer_index: usize,
    pub explain: String,
}

impl CapsuleDraft {
    /// Draft pre-filled from a stored capsule, as the editor shows it.
    #[must_use]
    pub fn from_capsule(capsule: &Capsule) -> Self {
        Self {
            title: capsule.meta.title.clone(),
            subject: capsule.meta.subject.clone(),
            level: capsule.meta.level.clone(),
            desc: capsule.meta.desc.clone(),
            notes: capsule.notes.join("\n"),
            flashcards: capsule.flashcards.clone(),
            quiz: capsule
                .quiz
                .iter()
                .map(|q| QuestionDraft {
                    q: q.q.clone(),
                    choices: q.choices.clone(),
                    answer_index: q.answer_index,
                    explain: q.explain.clone().unwrap_or_default(),
                })
                .collect(),
        }
    }

    /// Builds and validates the capsule this draft describes.
    ///
    /// `created_at` is the original creation time when editing an existing
    /// capsule; `None` means the capsule is new and is created `now`.
    ///
    /// # Errors
    /// Returns a [`crate::ValidationError`] if the title is blank or no
    /// section keeps any content after cleanup.
    pub fn into_capsule(
        self,
        id: String,
        created_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> ValidationResult<Capsule> {
        let level = self.level.trim();
        let capsule = Capsule {
            schema: SCHEMA_TAG.to_owned(),
            id,
            meta: CapsuleMeta {
                title: self.title.trim().to_owned(),
                subject: self.subject.trim().to_owned(),
                level: if level.is_empty() { DEFAULT_LEVEL.to_owned() } else { level.to_owned() },
                desc: self.desc.trim().to_owned(),
                created_at: created_at.unwrap_or(now),
                updated_at: now,
            },
            notes: self
                .notes
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_owned)
                .collect(),
            flashcards: self
                .flashcards
                .into_iter()
                .map(|card| Flashcard::new(card.front.trim(), card.back.trim()))
                .filter(|card| !card.front.is_empty() || !card.back.is_empty())
                .collect(),
            quiz: self.quiz.into_iter().filter_map(QuestionDraft::into_question).collect(),
        };
        capsule.validate()?;
        Ok(capsule)
    }
}

impl QuestionDraft {
    /// Kept only when the question text and at least one choice are filled in.
    fn into_question(self) -> Option<QuizQuestion> {
        let q = self.q.trim().to_owned();
        let mut choices: Vec<String> = self
            .choices
            .iter()
            .take(CHOICES_PER_QUESTION)
            .map(|c| c.trim().to_owned())
            .collect();
        choices.resize(CHOICES_PER_QUESTION, String::new());

        if q.is_empty() || choices.iter().all(String::is_empty) {
            return None;
        }

        let explain = self.explain.trim();
        Some(QuizQuestion {
            q,
            choices,
            answer_index: self.answer_index.min(CHOICES_PER_QUESTION - 1),
            explain: (!explain.is_empty()).then(|| explain.to_owned()),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::ValidationError;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn trims_and_filters_sections() {
        let draft = CapsuleDraft {
            title: "  Cells ".to_owned(),
            subject: " Bio ".to_owned(),
            level: String::new(),
            desc: " d ".to_owned(),
            notes: "first\n\n   \nsecond".to_owned(),
            flashcards: vec![Flashcard::new(" A ", "B"), Flashcard::new("  ", " ")],
            quiz: vec![
                QuestionDraft {
                    q: " Q1 ".to_owned(),
                    choices: vec![" a ".into(), "b".into()],
                    answer_index: 1,
                    explain: "  ".to_owned(),
                },
                QuestionDraft {
                    q: "Q2".to_owned(),
                    choices: vec![String::new(); 4],
                    answer_index: 0,
                    explain: String::new(),
                },
            ],
        };

        let capsule = draft.into_capsule("cap_1".to_owned(), None, now()).unwrap();

        assert_eq!(capsule.meta.title, "Cells");
        assert_eq!(capsule.meta.subject, "Bio");
        assert_eq!(capsule.meta.level, "Beginner");
        assert_eq!(capsule.meta.desc, "d");
        assert_eq!(capsule.notes, vec!["first".to_owned(), "second".to_owned()]);
        assert_eq!(capsule.flashcards, vec![Flashcard::new("A", "B")]);
        assert_eq!(capsule.quiz.len(), 1);
        assert_eq!(capsule.quiz[0].choices, vec!["a", "b", "", ""]);
        assert_eq!(capsule.quiz[0].explain, None);
        assert_eq!(capsule.meta.created_at, now());
        assert_eq!(capsule.meta.updated_at, now());
    }

    #[test]
    fn keeps_original_created_at_when_editing() {
        let created = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let draft = CapsuleDraft { title: "T".to_owned(), notes: "n".to_owned(), ..Default::default() };
        let capsule = draft.into_capsule("cap_1".to_owned(), Some(created), now()).unwrap();
        assert_eq!(capsule.meta.created_at, created);
        assert_eq!(capsule.meta.updated_at, now());
    }

    #[test]
    fn blank_title_is_rejected() {
        let draft = CapsuleDraft { title: "   ".to_owned(), notes: "n".to_owned(), ..Default::default() };
        assert_eq!(
            draft.into_capsule("cap_1".to_owned(), None, now()),
            Err(ValidationError::MissingTitle)
        );
    }

    #[test]
    fn draft_with_only_blank_rows_is_empty() {
        let draft = CapsuleDraft {
            title: "T".to_owned(),
            notes: "\n \n".to_owned(),
            flashcards: vec![Flashcard::new("", "")],
            quiz: vec![QuestionDraft::default()],
            ..Default::default()
        };
        assert_eq!(
            draft.into_capsule("cap_1".to_owned(), None, now()),
            Err(ValidationError::EmptyContent)
        );
    }

    #[test]
    fn round_trips_through_editor() {
        let draft = CapsuleDraft {
            title: "T".to_owned(),
            level: "Advanced".to_owned(),
            notes: "a\nb".to_owned(),
            quiz: vec![QuestionDraft {
                q: "Q".to_owned(),
                choices: vec!["w".into(), "x".into(), "y".into(), "z".into()],
                answer_index: 3,
                explain: "because".to_owned(),
            }],
            ..Default::default()
        };
        let capsule = draft.clone().into_capsule("cap_1".to_owned(), None, now()).unwrap();
        assert_eq!(CapsuleDraft::from_capsule(&capsule), draft);
    }
}
