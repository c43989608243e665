use pocket_classroom_core::Progress;

use super::{full_draft, harness};
use crate::ServiceError;

#[test]
fn unknown_capsule_has_default_progress() {
    let h = harness();
    assert_eq!(h.progress.progress("cap_never"), Progress::default());
}

#[test]
fn best_score_is_monotonic() {
    let h = harness();
    let capsule = h.library.save_draft(None, full_draft("Q")).unwrap();

    assert_eq!(h.progress.record_score(&capsule.id, 70).unwrap(), 70);
    assert_eq!(h.progress.record_score(&capsule.id, 50).unwrap(), 70);
    assert_eq!(h.progress.progress(&capsule.id).best_score, 70);
    assert_eq!(h.progress.record_score(&capsule.id, 90).unwrap(), 90);
    assert_eq!(h.progress.progress(&capsule.id).best_score, 90);
}

#[test]
fn finish_quiz_scores_three_of_four() {
    let h = harness();
    let capsule = h.library.save_draft(None, full_draft("Q")).unwrap();
    h.progress.record_score(&capsule.id, 60).unwrap();

    let record = h.progress.finish_quiz(&capsule.id, 3, 4).unwrap();

    assert_eq!(record.score, 75);
    assert_eq!(record.best_score, 75);
    assert_eq!(record.message, "Good effort! Keep practicing.");
    assert_eq!(h.progress.progress(&capsule.id).best_score, 75);
}

#[test]
fn finish_quiz_below_best_keeps_best() {
    let h = harness();
    let capsule = h.library.save_draft(None, full_draft("Q")).unwrap();
    h.progress.record_score(&capsule.id, 100).unwrap();

    let record = h.progress.finish_quiz(&capsule.id, 1, 4).unwrap();

    assert_eq!(record.score, 25);
    assert_eq!(record.best_score, 100);
}

#[test]
fn known_then_unknown_is_idempotent() {
    let h = harness();
    let capsule = h.library.save_draft(None, full_draft("Cards")).unwrap();

    let progress = h.progress.set_flashcard_known(&capsule.id, 2, true).unwrap();
    assert!(progress.is_known(2));

    let progress = h.progress.set_flashcard_known(&capsule.id, 2, false).unwrap();
    assert!(!progress.is_known(2));
    let progress = h.progress.set_flashcard_known(&capsule.id, 2, false).unwrap();
    assert!(!progress.is_known(2));
    assert!(!h.progress.progress(&capsule.id).is_known(2));
}

#[test]
fn known_cards_are_tracked_per_capsule() {
    let h = harness();
    let a = h.library.save_draft(None, full_draft("A")).unwrap();
    let b = h.library.save_draft(None, full_draft("B")).unwrap();

    h.progress.set_flashcard_known(&a.id, 1, true).unwrap();

    assert!(h.progress.progress(&a.id).is_known(1));
    assert!(!h.progress.progress(&b.id).is_known(1));
}

#[test]
fn flashcard_past_deck_end_is_rejected() {
    let h = harness();
    let capsule = h.library.save_draft(None, full_draft("Cards")).unwrap();
    let err = h.progress.set_flashcard_known(&capsule.id, 3, true).unwrap_err();
    assert!(matches!(err, ServiceError::FlashcardOutOfRange { index: 3, len: 3, .. }));
}

#[test]
fn flashcard_on_missing_capsule_is_not_found() {
    let h = harness();
    assert!(h.progress.set_flashcard_known("cap_missing", 0, true).unwrap_err().is_not_found());
}

#[test]
fn known_positions_survive_edits_unchanged() {
    // Known flashcards are positional: removing a card does not remap them.
    let h = harness();
    let capsule = h.library.save_draft(None, full_draft("Cards")).unwrap();
    h.progress.set_flashcard_known(&capsule.id, 2, true).unwrap();

    let mut draft = full_draft("Cards");
    draft.flashcards.remove(0);
    h.library.save_draft(Some(&capsule.id), draft).unwrap();

    let progress = h.progress.progress(&capsule.id);
    assert!(progress.is_known(2));
    let deck_len = h.library.get(&capsule.id).unwrap().flashcards.len();
    assert_eq!(progress.dangling_known(deck_len).collect::<Vec<_>>(), vec![2]);
}

#[test]
fn failed_progress_write_is_reported() {
    let h = harness();
    let capsule = h.library.save_draft(None, full_draft("Cards")).unwrap();
    h.store.set_quota(Some(0));

    let err = h.progress.record_score(&capsule.id, 40).unwrap_err();
    assert!(matches!(err, ServiceError::ProgressWrite(_)));
    assert_eq!(h.progress.progress(&capsule.id).best_score, 0);
}

#[test]
fn quiz_for_unknown_capsule_is_not_found() {
    let h = harness();

    let err = h.progress.finish_quiz("cap_ghost", 3, 4).unwrap_err();

    assert!(err.is_not_found());
    assert!(h.store.is_empty());
}

#[test]
fn quiz_after_delete_leaves_no_orphan() {
    let h = harness();
    let capsule = h.library.save_draft(None, full_draft("Gone")).unwrap();
    h.library.delete(&capsule.id).unwrap();

    assert!(h.progress.record_score(&capsule.id, 90).unwrap_err().is_not_found());
    assert!(h.library.consistency_report().unwrap().is_consistent());
}
