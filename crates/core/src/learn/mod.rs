//! Learn-view state: which tab is open, where the flashcard cursor sits,
//! the notes filter, and the quiz in progress.
//!
//! Everything here is plain data owned by the caller; nothing reads or
//! writes storage. Progress updates go through the service layer.

mod quiz;

pub use quiz::{Advance, AdvanceTicket, AnswerFeedback, DeferredAdvance, QuizOutcome, QuizRun};

use crate::capsule::{Capsule, Flashcard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LearnTab {
    #[default]
    Notes,
    Flashcards,
    Quiz,
}

impl LearnTab {
    const ORDER: [Self; 3] = [Self::Notes, Self::Flashcards, Self::Quiz];

    /// Next tab in `direction` (negative = left), wrapping at both ends.
    #[must_use]
    pub fn cycle(self, direction: isize) -> Self {
        let len = Self::ORDER.len() as isize;
        let pos = Self::ORDER.iter().position(|t| *t == self).unwrap_or(0) as isize;
        let next = (pos + direction).rem_euclid(len);
        Self::ORDER[next as usize]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Flashcards => "flashcards",
            Self::Quiz => "quiz",
        }
    }
}

/// Notes containing `term`, case-insensitively. Blank notes never match.
pub fn filter_notes<'a>(notes: &'a [String], term: &str) -> Vec<&'a str> {
    let needle = term.to_lowercase();
    notes
        .iter()
        .map(String::as_str)
        .filter(|note| !note.trim().is_empty())
        .filter(|note| note.to_lowercase().contains(&needle))
        .collect()
}

/// Cursor over a capsule's flashcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    index: usize,
    flipped: bool,
}

impl FlashcardDeck {
    #[must_use]
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self { cards, index: 0, flipped: false }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        if !self.cards.is_empty() {
            self.flipped = !self.flipped;
        }
    }

    /// Text currently facing the learner.
    #[must_use]
    pub fn visible_side(&self) -> Option<&str> {
        self.current().map(|card| if self.flipped { card.back.as_str() } else { card.front.as_str() })
    }

    /// Moves to the next card. Returns `false` at the last card.
    pub fn next(&mut self) -> bool {
        self.go_to(self.index + 1)
    }

    /// Moves to the previous card. Returns `false` at the first card.
    pub fn prev(&mut self) -> bool {
        self.index.checked_sub(1).is_some_and(|i| self.go_to(i))
    }

    /// Jumps to `index`; showing a new card always starts face up.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.cards.len() {
            return false;
        }
        self.index = index;
        self.flipped = false;
        true
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.index + 1 < self.cards.len()
    }

    /// `"3/10"` style counter; `None` for an empty deck.
    #[must_use]
    pub fn counter(&self) -> Option<String> {
        (!self.cards.is_empty()).then(|| format!("{}/{}", self.index + 1, self.cards.len()))
    }
}

/// Everything the learn view needs for one open capsule.
#[derive(Debug, Clone)]
pub struct LearnSession {
    capsule: Capsule,
    tab: LearnTab,
    notes_query: String,
    deck: FlashcardDeck,
    quiz: Option<QuizRun>,
}

impl LearnSession {
    #[must_use]
    pub fn new(capsule: Capsule) -> Self {
        let deck = FlashcardDeck::new(capsule.flashcards.clone());
        Self { capsule, tab: LearnTab::Notes, notes_query: String::new(), deck, quiz: None }
    }

    #[must_use]
    pub fn capsule(&self) -> &Capsule {
        &self.capsule
    }

    #[must_use]
    pub fn tab(&self) -> LearnTab {
        self.tab
    }

    /// Switches tabs. Leaving the quiz tab abandons a running quiz.
    pub fn select_tab(&mut self, tab: LearnTab) {
        if tab == LearnTab::Quiz && self.capsule.quiz.is_empty() {
            return;
        }
        if self.tab == LearnTab::Quiz && tab != LearnTab::Quiz {
            self.cancel_quiz();
        }
        self.tab = tab;
    }

    /// Cycles tabs, skipping the quiz tab when the capsule has no questions.
    pub fn cycle_tab(&mut self, direction: isize) {
        let mut next = self.tab.cycle(direction);
        if next == LearnTab::Quiz && self.capsule.quiz.is_empty() {
            next = next.cycle(direction);
        }
        self.select_tab(next);
    }

    pub fn set_notes_query(&mut self, query: impl Into<String>) {
        self.notes_query = query.into();
    }

    #[must_use]
    pub fn visible_notes(&self) -> Vec<&str> {
        filter_notes(&self.capsule.notes, &self.notes_query)
    }

    #[must_use]
    pub fn deck(&self) -> &FlashcardDeck {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut FlashcardDeck {
        &mut self.deck
    }

    /// Starts (or restarts) the quiz. Returns `false` if there are no questions.
    pub fn start_quiz(&mut self) -> bool {
        self.cancel_quiz();
        self.quiz = QuizRun::start(self.capsule.quiz.clone());
        if self.quiz.is_some() {
            self.tab = LearnTab::Quiz;
        }
        self.quiz.is_some()
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&QuizRun> {
        self.quiz.as_ref()
    }

    pub fn quiz_mut(&mut self) -> Option<&mut QuizRun> {
        self.quiz.as_mut()
    }

    /// Abandons the running quiz so pending advances become no-ops.
    pub fn cancel_quiz(&mut self) {
        if let Some(run) = self.quiz.as_mut() {
            run.cancel();
        }
    }

    /// Closes the session, e.g. when another capsule is selected.
    pub fn close(mut self) -> Capsule {
        self.cancel_quiz();
        self.capsule
    }
}
