//! Interactive quiz over stdin/stdout.
//!
//! The pause after each answer uses the same [`DeferredAdvance`] ticket the
//! learn view polls, so an abandoned run never records a score.

use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use pocket_classroom_core::learn::{Advance, DeferredAdvance, LearnSession, QuizOutcome, QuizRun};
use pocket_classroom_core::{FEEDBACK_DELAY, QuizQuestion};

use super::parse_choice_letter;
use crate::Services;

pub(crate) fn run_quiz(
    services: &Services,
    id: &str,
    no_delay: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let capsule = services.library.get(id)?;
    let title = capsule.meta.title.clone();
    let mut session = LearnSession::new(capsule);
    if !session.start_quiz() {
        bail!("\"{title}\" has no quiz questions");
    }
    let delay = if no_delay { Duration::ZERO } else { FEEDBACK_DELAY };

    writeln!(out, "Quiz: {title}")?;
    let outcome = match ask_all(&mut session, delay, input, out)? {
        Some(outcome) => outcome,
        None => {
            session.cancel_quiz();
            bail!("quiz abandoned before the last answer; no score recorded");
        },
    };

    let record = services.progress.finish_quiz(id, outcome.correct, outcome.total)?;
    writeln!(out, "\nScore: {}% ({}/{})", record.score, outcome.correct, outcome.total)?;
    writeln!(out, "{}", record.message)?;
    writeln!(out, "Best score: {}%", record.best_score)?;
    session.close();
    Ok(())
}

/// Runs the quiz to the end. `None` if input ran out first.
fn ask_all(
    session: &mut LearnSession,
    delay: Duration,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<QuizOutcome>> {
    loop {
        let Some(run) = session.quiz_mut() else {
            bail!("quiz is not running");
        };
        let Some(question) = run.current_question().cloned() else {
            bail!("quiz has no current question");
        };
        print_question(run, &question, out)?;

        let Some(choice) = read_choice(input, out, question.choices.len())? else {
            return Ok(None);
        };
        let Some(feedback) = run.answer(choice) else {
            bail!("quiz was not waiting for an answer");
        };
        if feedback.correct {
            writeln!(out, "Correct!")?;
        } else {
            writeln!(out, "Incorrect. The answer is {}.", feedback.correct_letter)?;
        }
        if let Some(explanation) = &feedback.explanation {
            writeln!(out, "{explanation}")?;
        }
        out.flush()?;

        let deferred = DeferredAdvance::schedule_after(feedback.ticket, Instant::now(), delay);
        let advance = loop {
            if let Some(advance) = deferred.poll(run, Instant::now()) {
                break advance;
            }
            std::thread::sleep(deferred.due().saturating_duration_since(Instant::now()));
        };
        match advance {
            Advance::Next(_) => {},
            Advance::Finished(outcome) => return Ok(Some(outcome)),
            Advance::Stale => bail!("quiz was interrupted"),
        }
    }
}

fn print_question(run: &QuizRun, question: &QuizQuestion, out: &mut impl Write) -> Result<()> {
    let (position, total) = run.position();
    writeln!(out, "\nQuestion {position}/{total}: {}", question.q)?;
    for (i, choice) in question.choices.iter().enumerate() {
        writeln!(out, "  {}) {choice}", QuizQuestion::choice_letter(i))?;
    }
    Ok(())
}

fn read_choice(input: &mut impl BufRead, out: &mut impl Write, choices: usize) -> Result<Option<usize>> {
    let last = QuizQuestion::choice_letter(choices.saturating_sub(1));
    loop {
        write!(out, "Your answer (A-{last}): ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match parse_choice_letter(&line).filter(|i| *i < choices) {
            Some(choice) => return Ok(Some(choice)),
            None => writeln!(out, "Please answer with a letter from A to {last}.")?,
        }
    }
}
