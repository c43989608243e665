//! A single pass through a capsule's quiz.
//!
//! After each answer the run waits in a feedback phase until the caller
//! advances it with the ticket handed out for that answer. Tickets are
//! invalidated by [`QuizRun::cancel`], so a delayed advance scheduled before
//! the learner navigated away turns into a no-op instead of moving a quiz
//! that is no longer on screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::capsule::QuizQuestion;
use crate::constants::FEEDBACK_DELAY;
use crate::progress::{quiz_score, score_message};

static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

fn next_epoch() -> u64 {
    NEXT_EPOCH.fetch_add(1, Ordering::Relaxed)
}

/// Permission to move past the question it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    epoch: u64,
    question: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_index: usize,
    pub correct_letter: char,
    pub explanation: Option<String>,
    pub ticket: AdvanceTicket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub correct: usize,
    pub total: usize,
    pub score: u8,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Now asking the question at this position
    Next(usize),
    Finished(QuizOutcome),
    /// Ticket belonged to a cancelled run or an earlier question
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Asking,
    Feedback,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct QuizRun {
    questions: Vec<QuizQuestion>,
    current: usize,
    correct: usize,
    phase: Phase,
    epoch: u64,
}

impl QuizRun {
    /// Starts a run over `questions`; `None` when there is nothing to ask.
    #[must_use]
    pub fn start(questions: Vec<QuizQuestion>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        Some(Self { questions, current: 0, correct: 0, phase: Phase::Asking, epoch: next_epoch() })
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            Phase::Asking | Phase::Feedback => self.questions.get(self.current),
            Phase::Finished | Phase::Cancelled => None,
        }
    }

    /// One-based position and total, e.g. `(2, 5)` for "2/5".
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.current + 1, self.questions.len())
    }

    #[must_use]
    pub fn correct_answers(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn is_awaiting_answer(&self) -> bool {
        self.phase == Phase::Asking
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Records the learner's choice for the current question.
    ///
    /// Returns `None` if the run is not waiting for an answer (feedback is
    /// already showing, or the run ended).
    pub fn answer(&mut self, choice: usize) -> Option<AnswerFeedback> {
        if self.phase != Phase::Asking {
            return None;
        }
        let question = self.questions.get(self.current)?;
        let correct = question.is_correct(choice);
        if correct {
            self.correct += 1;
        }
        let feedback = AnswerFeedback {
            correct,
            correct_index: question.answer_index,
            correct_letter: QuizQuestion::choice_letter(question.answer_index),
            explanation: question.explain.clone().filter(|e| !e.trim().is_empty()),
            ticket: AdvanceTicket { epoch: self.epoch, question: self.current },
        };
        self.phase = Phase::Feedback;
        Some(feedback)
    }

    /// Moves past the question `ticket` was issued for.
    pub fn advance(&mut self, ticket: AdvanceTicket) -> Advance {
        if self.phase != Phase::Feedback
            || ticket.epoch != self.epoch
            || ticket.question != self.current
        {
            return Advance::Stale;
        }
        self.current += 1;
        if self.current < self.questions.len() {
            self.phase = Phase::Asking;
            Advance::Next(self.current)
        } else {
            self.phase = Phase::Finished;
            Advance::Finished(self.outcome())
        }
    }

    /// Abandons the run; every outstanding ticket becomes stale.
    pub fn cancel(&mut self) {
        if self.phase != Phase::Finished {
            self.phase = Phase::Cancelled;
        }
        self.epoch = next_epoch();
    }

    #[must_use]
    pub fn outcome(&self) -> QuizOutcome {
        let total = self.questions.len();
        let score = quiz_score(self.correct, total);
        QuizOutcome { correct: self.correct, total, score, message: score_message(score) }
    }
}

/// An advance scheduled to fire once the feedback delay has elapsed.
///
/// Nothing blocks: the owner polls it from its event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredAdvance {
    ticket: AdvanceTicket,
    due: Instant,
}

impl DeferredAdvance {
    #[must_use]
    pub fn schedule(ticket: AdvanceTicket, now: Instant) -> Self {
        Self::schedule_after(ticket, now, FEEDBACK_DELAY)
    }

    /// Same as [`Self::schedule`] with a caller-chosen delay.
    #[must_use]
    pub fn schedule_after(ticket: AdvanceTicket, now: Instant, delay: Duration) -> Self {
        Self { ticket, due: now + delay }
    }

    #[must_use]
    pub fn due(&self) -> Instant {
        self.due
    }

    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }

    /// Fires the advance if its time has come; `None` means keep waiting.
    pub fn poll(&self, run: &mut QuizRun, now: Instant) -> Option<Advance> {
        self.is_due(now).then(|| run.advance(self.ticket))
    }
}
