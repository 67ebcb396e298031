//! Shared error types for the services crate.

use thiserror::Error;

use exani_core::model::{ConfigError, SummaryError};

/// Errors emitted by the exam session and its facade.
///
/// Out-of-range indexes fail loudly instead of clamping; they indicate a
/// presentation-layer bug, not a user mistake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no exam session has been started")]
    NotStarted,

    #[error("exam session is already finished")]
    Completed,

    #[error("exam session is not finished yet")]
    NotFinished,

    #[error("selected modules have no questions available")]
    NoQuestions,

    #[error("question index {index} is out of range for {len} questions")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("option index {0} is out of range")]
    OptionOutOfRange(usize),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Errors emitted while exporting results.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error(transparent)]
    Session(SessionError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<SessionError> for ExportError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}
