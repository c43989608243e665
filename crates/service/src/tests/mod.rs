//! Test utilities and module declarations for service tests.

use std::sync::Arc;

use pocket_classroom_core::{CapsuleDraft, Flashcard, QuestionDraft};
use pocket_classroom_storage::{MemoryStore, Storage};

use crate::{LibraryService, ProgressService};

pub struct Harness {
    pub store: MemoryStore,
    pub storage: Arc<Storage<MemoryStore>>,
    pub library: LibraryService<MemoryStore>,
    pub progress: ProgressService<MemoryStore>,
}

pub fn harness() -> Harness {
    let store = MemoryStore::new();
    let storage = Arc::new(Storage::new(store.clone()));
    Harness {
        store,
        library: LibraryService::new(Arc::clone(&storage)),
        progress: ProgressService::new(Arc::clone(&storage)),
        storage,
    }
}

pub fn cells_draft() -> CapsuleDraft {
    CapsuleDraft {
        title: "Cells".to_owned(),
        flashcards: vec![Flashcard::new("A", "B")],
        ..Default::default()
    }
}

pub fn full_draft(title: &str) -> CapsuleDraft {
    CapsuleDraft {
        title: title.to_owned(),
        subject: "Biology".to_owned(),
        level: "Intermediate".to_owned(),
        desc: "Organelles".to_owned(),
        notes: "Mitochondria make ATP\nRibosomes make protein".to_owned(),
        flashcards: vec![
            Flashcard::new("ATP", "Energy currency"),
            Flashcard::new("DNA", "Genetic code"),
            Flashcard::new("RNA", "Messenger"),
        ],
        quiz: (0..4)
            .map(|i| QuestionDraft {
                q: format!("Question {i}"),
                choices: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                answer_index: i,
                explain: String::new(),
            })
            .collect(),
    }
}

mod progress_tests;
