use thiserror::Error;

/// Reasons a candidate capsule is refused before anything is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Please add at least one note, flashcard, or quiz question")]
    EmptyContent,

    #[error("Invalid capsule format: schema mismatch (found {found:?})")]
    SchemaMismatch { found: Option<String> },

    #[error("Invalid capsule JSON: {0}")]
    InvalidJson(String),

    #[error("Question {question} answer index {answer_index} is outside its {choices} choices")]
    AnswerOutOfRange { question: usize, answer_index: usize, choices: usize },

    #[error("Question {question} has {choices} choices, expected {expected}")]
    ChoiceCount { question: usize, choices: usize, expected: usize },
}

pub type ValidationResult<T> = Result<T, ValidationError>;
