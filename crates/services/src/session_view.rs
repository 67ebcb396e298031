use chrono::{DateTime, Utc};

use exani_core::scoring;

use crate::session::ExamSession;
use crate::timer;

/// Presentation-agnostic snapshot of a session for one render pass.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no localization assumptions
///
/// The presentation layer formats the timer, progress, and stats as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub current_index: usize,
    pub total: usize,
    pub answered: usize,

    pub correct: u32,
    pub wrong: u32,
    pub skipped: u32,
    /// Live score over all slots; unanswered questions count against it.
    pub score: u8,

    pub remaining_seconds: i64,
    pub time_warning: bool,
    pub finished: bool,
}

impl SessionSnapshot {
    #[must_use]
    pub fn capture(session: &ExamSession, now: DateTime<Utc>) -> Self {
        let tally = session.tally();
        let remaining_seconds = session.remaining_seconds(now);

        Self {
            current_index: session.current_index(),
            total: session.total(),
            answered: session.answered_count(),
            correct: tally.correct,
            wrong: tally.wrong,
            skipped: tally.skipped,
            score: scoring::score_percent(tally.correct, tally.total()),
            remaining_seconds,
            time_warning: timer::is_warning(remaining_seconds),
            finished: session.is_finished(),
        }
    }
}
