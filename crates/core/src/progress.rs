use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_SCORE;

/// Per-capsule learning state, stored independently of the capsule itself.
///
/// `known_flashcards` holds positions into the capsule's flashcard list.
/// Editing the capsule so that cards move or disappear leaves these
/// positions pointing at different cards (or past the end); they are kept
/// as-is rather than remapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    #[serde(default)]
    pub best_score: u8,
    #[serde(default)]
    pub known_flashcards: BTreeSet<usize>,
}

impl Progress {
    /// Folds a finished quiz into the best score. Returns the new best.
    pub fn record_score(&mut self, score: u8) -> u8 {
        self.best_score = self.best_score.max(score.min(MAX_SCORE));
        self.best_score
    }

    /// Adds or removes a flashcard position. Returns `true` if the set changed.
    pub fn set_known(&mut self, index: usize, known: bool) -> bool {
        if known {
            self.known_flashcards.insert(index)
        } else {
            self.known_flashcards.remove(&index)
        }
    }

    #[must_use]
    pub fn is_known(&self, index: usize) -> bool {
        self.known_flashcards.contains(&index)
    }

    #[must_use]
    pub fn known_count(&self) -> usize {
        self.known_flashcards.len()
    }

    /// Positions that no longer address a flashcard in a deck of `deck_len`.
    pub fn dangling_known(&self, deck_len: usize) -> impl Iterator<Item = usize> + '_ {
        self.known_flashcards.range(deck_len..).copied()
    }

    /// Caps a best score read from storage to the valid percentage range.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.best_score = self.best_score.min(MAX_SCORE);
        self
    }
}

/// Percentage of correct answers, rounded half up. An empty quiz scores 0.
#[must_use]
pub fn quiz_score(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total);
    let rounded = (correct * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(MAX_SCORE)
}

/// Encouragement shown with a quiz result.
#[must_use]
pub fn score_message(score: u8) -> &'static str {
    match score {
        100.. => "Perfect! You nailed it!",
        80..=99 => "Great job! You know this material well.",
        60..=79 => "Good effort! Keep practicing.",
        _ => "Keep studying! You will get better.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero_progress() {
        let progress = Progress::default();
        assert_eq!(progress.best_score, 0);
        assert!(progress.known_flashcards.is_empty());
    }

    #[test]
    fn best_score_never_decreases() {
        let mut progress = Progress { best_score: 70, ..Default::default() };
        assert_eq!(progress.record_score(50), 70);
        assert_eq!(progress.record_score(90), 90);
        assert_eq!(progress.best_score, 90);
    }

    #[test]
    fn known_toggle_is_idempotent() {
        let mut progress = Progress::default();
        assert!(progress.set_known(2, true));
        assert!(!progress.set_known(2, true));
        assert!(progress.is_known(2));
        assert!(progress.set_known(2, false));
        assert!(!progress.set_known(2, false));
        assert!(!progress.is_known(2));
        assert_eq!(progress.known_count(), 0);
    }

    #[test]
    fn serializes_known_set_as_array() {
        let mut progress = Progress::default();
        progress.set_known(3, true);
        progress.set_known(1, true);
        let json = serde_json::to_string(&progress).unwrap();
        assert_eq!(json, r#"{"bestScore":0,"knownFlashcards":[1,3]}"#);
    }

    #[test]
    fn parses_duplicate_indices_from_legacy_array() {
        let progress: Progress =
            serde_json::from_str(r#"{"bestScore":40,"knownFlashcards":[0,0,2]}"#).unwrap();
        assert_eq!(progress.known_count(), 2);
    }

    #[test]
    fn positions_past_deck_end_are_reported_dangling() {
        let mut progress = Progress::default();
        progress.set_known(0, true);
        progress.set_known(4, true);
        progress.set_known(7, true);
        let dangling: Vec<usize> = progress.dangling_known(5).collect();
        assert_eq!(dangling, vec![7]);
    }

    #[test]
    fn clamps_out_of_range_score() {
        let progress = Progress { best_score: 140, ..Default::default() }.clamped();
        assert_eq!(progress.best_score, 100);
    }

    #[test]
    fn score_rounds_like_percentages() {
        assert_eq!(quiz_score(3, 4), 75);
        assert_eq!(quiz_score(2, 3), 67);
        assert_eq!(quiz_score(1, 3), 33);
        assert_eq!(quiz_score(1, 8), 13);
        assert_eq!(quiz_score(4, 4), 100);
        assert_eq!(quiz_score(0, 4), 0);
        assert_eq!(quiz_score(0, 0), 0);
    }

    #[test]
    fn score_message_tiers() {
        assert_eq!(score_message(100), "Perfect! You nailed it!");
        assert_eq!(score_message(80), "Great job! You know this material well.");
        assert_eq!(score_message(60), "Good effort! Keep practicing.");
        assert_eq!(score_message(59), "Keep studying! You will get better.");
    }
}
