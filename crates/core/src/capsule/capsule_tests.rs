//! Tests for capsule validation, serialization shape and import.

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::{Capsule, CapsuleMeta, Flashcard, IndexEntry, QuizQuestion, SCHEMA_TAG, ValidationError};

    fn sample_capsule() -> Capsule {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        Capsule {
            schema: SCHEMA_TAG.to_owned(),
            id: "cap_1_abc".to_owned(),
            meta: CapsuleMeta {
                title: "Cells".to_owned(),
                subject: "Biology".to_owned(),
                level: "Beginner".to_owned(),
                desc: "Intro".to_owned(),
                created_at: at,
                updated_at: at,
            },
            notes: vec!["Cells are small".to_owned()],
            flashcards: vec![Flashcard::new("A", "B")],
            quiz: vec![QuizQuestion {
                q: "Powerhouse?".to_owned(),
                choices: vec!["Nucleus".into(), "Mitochondria".into(), "Wall".into(), "".into()],
                answer_index: 1,
                explain: Some("ATP".to_owned()),
            }],
        }
    }

    #[test]
    fn serializes_with_original_field_names() {
        let json = serde_json::to_value(sample_capsule()).unwrap();
        assert_eq!(json["schema"], "pocket-classroom/v1");
        assert!(json["meta"]["createdAt"].is_string());
        assert!(json["meta"]["updatedAt"].is_string());
        assert_eq!(json["quiz"][0]["answerIndex"], 1);
        assert_eq!(json["flashcards"][0]["front"], "A");
    }

    #[test]
    fn explain_is_omitted_when_absent() {
        let mut capsule = sample_capsule();
        capsule.quiz[0].explain = None;
        let json = serde_json::to_value(&capsule).unwrap();
        assert!(json["quiz"][0].get("explain").is_none());
    }

    #[test]
    fn parses_browser_exported_json() {
        let text = r#"{
            "schema": "pocket-classroom/v1",
            "id": " cap_1700000000000_k3j2h1g0f",
            "meta": {
                "title": "Cells",
                "subject": "Bio",
                "level": "Advanced",
                "desc": "",
                "createdAt": "2024-01-01T10:00:00.000Z",
                "updatedAt": "2024-01-02T10:00:00.000Z"
            },
            "notes": ["one"],
            "flashcards": [],
            "quiz": [{"q": "Q", "choices": ["a", "b", "c", "d"], "answerIndex": 2, "explain": ""}]
        }"#;
        let capsule: Capsule = serde_json::from_str(text).unwrap();
        assert_eq!(capsule.meta.level, "Advanced");
        assert_eq!(capsule.quiz[0].answer_index, 2);
        assert_eq!(capsule.quiz[0].explain.as_deref(), Some(""));
        assert!(capsule.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_title() {
        let mut capsule = sample_capsule();
        capsule.meta.title = "   ".to_owned();
        assert_eq!(capsule.validate(), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn validate_rejects_capsule_without_content() {
        let mut capsule = sample_capsule();
        capsule.notes = vec!["  ".to_owned()];
        capsule.flashcards.clear();
        capsule.quiz.clear();
        assert_eq!(capsule.validate(), Err(ValidationError::EmptyContent));
    }

    #[test]
    fn validate_accepts_single_section() {
        let mut capsule = sample_capsule();
        capsule.notes.clear();
        capsule.quiz.clear();
        assert!(capsule.validate().is_ok());
    }

    #[test]
    fn validate_rejects_answer_outside_choices() {
        let mut capsule = sample_capsule();
        capsule.quiz[0].answer_index = 4;
        assert!(matches!(
            capsule.validate(),
            Err(ValidationError::AnswerOutOfRange { question: 0, answer_index: 4, choices: 4 })
        ));
    }

    #[test]
    fn index_entry_projects_meta() {
        let capsule = sample_capsule();
        let entry = IndexEntry::from(&capsule);
        assert_eq!(entry.id, capsule.id);
        assert_eq!(entry.title, "Cells");
        assert_eq!(entry.subject, "Biology");
        assert_eq!(entry.level, "Beginner");
        assert_eq!(entry.updated_at, capsule.meta.updated_at);
    }

    #[test]
    fn choice_letters() {
        assert_eq!(QuizQuestion::choice_letter(0), 'A');
        assert_eq!(QuizQuestion::choice_letter(3), 'D');
    }

    #[test]
    fn import_assigns_new_id_and_restamps() {
        let original = sample_capsule();
        let text = original.to_export_json().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let imported = Capsule::from_import(&text, "cap_fresh".to_owned(), now).unwrap();

        assert_eq!(imported.id, "cap_fresh");
        assert_ne!(imported.id, original.id);
        assert_eq!(imported.meta.created_at, original.meta.created_at);
        assert_eq!(imported.meta.updated_at, now);
        assert_eq!(imported.notes, original.notes);
        assert_eq!(imported.flashcards, original.flashcards);
        assert_eq!(imported.quiz, original.quiz);
    }

    #[test]
    fn import_without_created_at_uses_now() {
        let text = r#"{"schema":"pocket-classroom/v1","meta":{"title":"T"},"notes":["n"]}"#;
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let imported = Capsule::from_import(text, "cap_x".to_owned(), now).unwrap();
        assert_eq!(imported.meta.created_at, now);
        assert_eq!(imported.meta.level, "Beginner");
        assert_eq!(imported.meta.subject, "");
    }

    #[test]
    fn import_rejects_wrong_schema() {
        let text = r#"{"schema":"pocket-classroom/v2","meta":{"title":"T"},"notes":["n"]}"#;
        let err = Capsule::from_import(text, "cap_x".to_owned(), Utc::now()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::SchemaMismatch { found: Some("pocket-classroom/v2".to_owned()) }
        );
    }

    #[test]
    fn import_rejects_missing_schema() {
        let text = r#"{"meta":{"title":"T"},"notes":["n"]}"#;
        let err = Capsule::from_import(text, "cap_x".to_owned(), Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::SchemaMismatch { found: None });
    }

    #[test]
    fn import_rejects_missing_title() {
        let text = r#"{"schema":"pocket-classroom/v1","meta":{"subject":"S"},"notes":["n"]}"#;
        let err = Capsule::from_import(text, "cap_x".to_owned(), Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::MissingTitle);

        let no_meta = r#"{"schema":"pocket-classroom/v1","notes":["n"]}"#;
        let err = Capsule::from_import(no_meta, "cap_x".to_owned(), Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::MissingTitle);
    }

    #[test]
    fn import_rejects_empty_sections() {
        let text = r#"{"schema":"pocket-classroom/v1","meta":{"title":"T"},"notes":[],"flashcards":[],"quiz":[]}"#;
        let err = Capsule::from_import(text, "cap_x".to_owned(), Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyContent);
    }

    #[test]
    fn import_rejects_malformed_json() {
        let err = Capsule::from_import("{not json", "cap_x".to_owned(), Utc::now()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidJson(_)));
    }

    #[test]
    fn import_drops_blank_notes() {
        let text = r#"{"schema":"pocket-classroom/v1","meta":{"title":"T"},"notes":["","  ","real"]}"#;
        let imported = Capsule::from_import(text, "cap_x".to_owned(), Utc::now()).unwrap();
        assert_eq!(imported.notes, vec!["real".to_owned()]);
    }

    #[test]
    fn import_with_only_blank_notes_is_empty() {
        let text = r#"{"schema":"pocket-classroom/v1","meta":{"title":"T"},"notes":["", " "]}"#;
        let err = Capsule::from_import(text, "cap_x".to_owned(), Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyContent);
    }

    #[test]
    fn import_rejects_wrong_choice_count() {
        let text = r#"{"schema":"pocket-classroom/v1","meta":{"title":"T"},
            "quiz":[{"q":"Q","choices":["a","b","c","d"],"answerIndex":0},
                    {"q":"Q2","choices":["a","b"],"answerIndex":1}]}"#;
        let err = Capsule::from_import(text, "cap_x".to_owned(), Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::ChoiceCount { question: 1, choices: 2, expected: 4 });
    }
}
