use anyhow::{Result, bail};
use clap::Args;
use pocket_classroom_core::{CHOICES_PER_QUESTION, CapsuleDraft, Flashcard, QuestionDraft};

pub(crate) mod library;
pub(crate) mod progress;
pub(crate) mod quiz;

/// Authoring flags shared by `new` and `edit`.
#[derive(Args, Debug, Default)]
pub struct CapsuleArgs {
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub subject: Option<String>,
    #[arg(short, long)]
    pub level: Option<String>,
    #[arg(short, long)]
    pub desc: Option<String>,
    /// One note; repeat for more. Replaces all notes when editing.
    #[arg(short, long = "note")]
    pub notes: Vec<String>,
    /// `FRONT::BACK`; repeat for more. Replaces all cards when editing.
    #[arg(short, long = "card")]
    pub cards: Vec<String>,
    /// `QUESTION::A|B|C|D::LETTER[::EXPLANATION]`; repeat for more.
    #[arg(short, long = "question")]
    pub questions: Vec<String>,
}

impl CapsuleArgs {
    /// Overwrites the parts of `draft` that were given on the command line.
    pub fn apply_to(self, draft: &mut CapsuleDraft) -> Result<()> {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(subject) = self.subject {
            draft.subject = subject;
        }
        if let Some(level) = self.level {
            draft.level = level;
        }
        if let Some(desc) = self.desc {
            draft.desc = desc;
        }
        if !self.notes.is_empty() {
            draft.notes = self.notes.join("\n");
        }
        if !self.cards.is_empty() {
            draft.flashcards = self.cards.iter().map(|c| parse_card(c)).collect::<Result<_>>()?;
        }
        if !self.questions.is_empty() {
            draft.quiz = self.questions.iter().map(|q| parse_question(q)).collect::<Result<_>>()?;
        }
        Ok(())
    }
}

fn parse_card(raw: &str) -> Result<Flashcard> {
    let Some((front, back)) = raw.split_once("::") else {
        bail!("card {raw:?} must look like FRONT::BACK");
    };
    Ok(Flashcard::new(front, back))
}

fn parse_question(raw: &str) -> Result<QuestionDraft> {
    let mut parts = raw.splitn(4, "::");
    let (Some(q), Some(choices), Some(letter)) = (parts.next(), parts.next(), parts.next()) else {
        bail!("question {raw:?} must look like QUESTION::A|B|C|D::LETTER");
    };
    let choices: Vec<String> = choices.split('|').map(str::to_owned).collect();
    if choices.len() > CHOICES_PER_QUESTION {
        bail!("question {q:?} has more than {CHOICES_PER_QUESTION} choices");
    }
    let Some(answer_index) = parse_choice_letter(letter).filter(|i| *i < choices.len()) else {
        bail!("question {q:?}: answer {letter:?} does not name one of its choices");
    };
    Ok(QuestionDraft {
        q: q.to_owned(),
        choices,
        answer_index,
        explain: parts.next().unwrap_or_default().to_owned(),
    })
}

/// `"b"` / `"B"` -> `Some(1)`; anything but a single letter is `None`.
pub(crate) fn parse_choice_letter(raw: &str) -> Option<usize> {
    let mut chars = raw.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some(usize::from(c.to_ascii_uppercase() as u8 - b'A'))
        },
        _ => None,
    }
}
