mod bank;
mod config;
mod question;
mod summary;

pub use bank::{BankDraft, ModuleId, QuestionBank};
pub use config::{
    ConfigError, ExamConfig, ExamKind, MAX_QUESTION_COUNT, MAX_TIME_LIMIT_MINUTES,
    MIN_QUESTION_COUNT, MIN_TIME_LIMIT_MINUTES,
};
pub use question::{OPTION_COUNT, QuestionDraft, QuestionError, QuestionRecord};
pub use summary::{ResultsSummary, SummaryError};
