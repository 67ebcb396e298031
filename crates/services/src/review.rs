use exani_core::model::QuestionRecord;

use crate::error::SessionError;
use crate::session::ExamSession;

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Outcome of one question in a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Correct,
    Incorrect,
    Unanswered,
}

/// Classify an answer against its question.
#[must_use]
pub fn review_status(question: &QuestionRecord, answer: Option<usize>) -> ReviewStatus {
    match answer {
        None => ReviewStatus::Unanswered,
        Some(option) if question.is_correct(option) => ReviewStatus::Correct,
        Some(_) => ReviewStatus::Incorrect,
    }
}

/// Status filter for the review screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Correct,
    Incorrect,
    Unanswered,
}

impl StatusFilter {
    #[must_use]
    pub fn matches(self, status: ReviewStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Correct => status == ReviewStatus::Correct,
            StatusFilter::Incorrect => status == ReviewStatus::Incorrect,
            StatusFilter::Unanswered => status == ReviewStatus::Unanswered,
        }
    }
}

//
// ─── REVIEW ENTRIES ────────────────────────────────────────────────────────────
//

/// One reviewable question of a finished session, in session order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry<'a> {
    /// Zero-based position within the session.
    pub index: usize,
    pub question: &'a QuestionRecord,
    pub answer: Option<usize>,
    pub status: ReviewStatus,
}

/// Filter a finished session's questions by outcome and area.
///
/// `area` is the human-readable module label; `None` keeps every area.
///
/// # Errors
///
/// Returns `SessionError::NotFinished` while the session is in progress;
/// answers are only frozen, and therefore reviewable, after finish.
pub fn review_entries<'a>(
    session: &'a ExamSession,
    status: StatusFilter,
    area: Option<&str>,
) -> Result<Vec<ReviewEntry<'a>>, SessionError> {
    if !session.is_finished() {
        return Err(SessionError::NotFinished);
    }

    let entries = session
        .questions()
        .iter()
        .zip(session.answers())
        .enumerate()
        .filter(|(_, (question, _))| area.is_none_or(|a| question.area() == a))
        .filter_map(|(index, (question, answer))| {
            let entry_status = review_status(question, *answer);
            status.matches(entry_status).then_some(ReviewEntry {
                index,
                question,
                answer: *answer,
                status: entry_status,
            })
        })
        .collect();

    Ok(entries)
}

/// Distinct area labels present in the session, in first-seen order.
///
/// # Errors
///
/// Returns `SessionError::NotFinished` while the session is in progress.
pub fn areas<'a>(session: &'a ExamSession) -> Result<Vec<&'a str>, SessionError> {
    if !session.is_finished() {
        return Err(SessionError::NotFinished);
    }

    let mut seen: Vec<&str> = Vec::new();
    for question in session.questions() {
        if !seen.contains(&question.area()) {
            seen.push(question.area());
        }
    }
    Ok(seen)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
