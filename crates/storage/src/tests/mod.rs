//! Test utilities and module declarations for storage tests.

use chrono::{TimeZone, Utc};
use pocket_classroom_core::{Capsule, CapsuleMeta, Flashcard, QuizQuestion, SCHEMA_TAG};

use crate::{MemoryStore, Storage};

pub fn create_memory_storage() -> (Storage<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    (Storage::new(store.clone()), store)
}

#[cfg(feature = "sqlite")]
#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_sqlite_storage() -> (Storage<crate::SqliteStore>, tempfile::TempDir) {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let storage = Storage::new(crate::SqliteStore::open(&db_path).unwrap());
    (storage, temp_dir)
}

pub fn create_test_capsule(id: &str, title: &str) -> Capsule {
    let at = Utc.with_ymd_and_hms(2024, 2, 10, 8, 0, 0).single().unwrap_or_else(Utc::now);
    Capsule {
        schema: SCHEMA_TAG.to_owned(),
        id: id.to_owned(),
        meta: CapsuleMeta {
            title: title.to_owned(),
            subject: "Biology".to_owned(),
            level: "Beginner".to_owned(),
            desc: "Test capsule".to_owned(),
            created_at: at,
            updated_at: at,
        },
        notes: vec!["Cells are the unit of life".to_owned()],
        flashcards: vec![Flashcard::new("A", "B"), Flashcard::new("C", "D")],
        quiz: vec![QuizQuestion {
            q: "Which organelle makes ATP?".to_owned(),
            choices: vec![
                "Nucleus".to_owned(),
                "Mitochondria".to_owned(),
                "Ribosome".to_owned(),
                "Golgi".to_owned(),
            ],
            answer_index: 1,
            explain: Some("Cellular respiration".to_owned()),
        }],
    }
}
