use chrono::{DateTime, Utc};

use exani_core::model::{ExamConfig, OPTION_COUNT, QuestionRecord, ResultsSummary};
use exani_core::scoring::{self, Tally};

use crate::error::SessionError;
use crate::timer;

/// Outcome of a `next()` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Moved to the question at this index.
    Moved(usize),
    /// Already at the last question; the presentation layer should confirm
    /// and call `finish` instead of navigating.
    FinishRequested,
}

/// One in-progress or completed exam attempt.
///
/// The question list is fixed at creation. `answers` always has one slot per
/// question and `current` stays in bounds; every operation that would break
/// either invariant is rejected with a typed error instead of clamping.
/// Once finished, answers freeze and the summary becomes read-only.
#[derive(Debug)]
pub struct ExamSession {
    config: ExamConfig,
    questions: Vec<QuestionRecord>,
    answers: Vec<Option<usize>>,
    current: usize,
    started_at: DateTime<Utc>,
    summary: Option<ResultsSummary>,
}

impl ExamSession {
    /// Create a session over an already-selected question list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestions` when the list is empty.
    pub fn new(
        config: ExamConfig,
        questions: Vec<QuestionRecord>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        let answers = vec![None; questions.len()];
        Ok(Self {
            config,
            questions,
            answers,
            current: 0,
            started_at,
            summary: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&QuestionRecord> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question the user is looking at.
    ///
    /// # Panics
    ///
    /// Never panics: `current` is always in bounds.
    #[must_use]
    pub fn current_question(&self) -> &QuestionRecord {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Number of questions with a recorded answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.summary.is_some()
    }

    /// The final summary, present once the session is finished.
    #[must_use]
    pub fn summary(&self) -> Option<&ResultsSummary> {
        self.summary.as_ref()
    }

    /// Live correct/wrong/skipped counts over the current answers.
    ///
    /// The same function runs at finish, so mid-exam stats and the final
    /// summary always agree.
    #[must_use]
    pub fn tally(&self) -> Tally {
        scoring::tally(&self.questions, &self.answers)
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        if self.is_finished() {
            return Err(SessionError::Completed);
        }
        Ok(())
    }

    fn check_question_index(&self, index: usize) -> Result<(), SessionError> {
        if index >= self.questions.len() {
            return Err(SessionError::QuestionOutOfRange {
                index,
                len: self.questions.len(),
            });
        }
        Ok(())
    }

    /// Record (or overwrite) the answer for a question.
    ///
    /// Navigation is untouched; auto-advancing after an answer is a
    /// presentation policy, not a session rule.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after finish, or a range error for
    /// an out-of-bounds question or option index.
    pub fn select_option(&mut self, index: usize, option: usize) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        self.check_question_index(index)?;
        if option >= OPTION_COUNT {
            return Err(SessionError::OptionOutOfRange(option));
        }

        self.answers[index] = Some(option);
        Ok(())
    }

    /// Jump to a question by index.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after finish, or
    /// `QuestionOutOfRange` for an invalid index.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        self.check_question_index(index)?;
        self.current = index;
        Ok(())
    }

    /// Advance to the next question, or signal that the exam should finish
    /// when already at the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after finish.
    pub fn next(&mut self) -> Result<NextStep, SessionError> {
        self.ensure_in_progress()?;
        if self.current + 1 >= self.questions.len() {
            return Ok(NextStep::FinishRequested);
        }
        self.current += 1;
        Ok(NextStep::Moved(self.current))
    }

    /// Move back one question; stays put at the first one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after finish.
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        self.ensure_in_progress()?;
        self.current = self.current.saturating_sub(1);
        Ok(self.current)
    }

    /// Seconds left on the countdown, never negative.
    #[must_use]
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        timer::remaining_seconds(self.config.time_limit_seconds(), self.started_at, now)
    }

    /// Whether the time limit has elapsed.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining_seconds(now) == 0
    }

    /// Finish the session, freezing answers and computing the summary.
    ///
    /// Idempotent: the timer expiry check is level-triggered and may report
    /// "time's up" on every refresh tick, so repeated calls return the
    /// summary computed by the first one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if the summary cannot be built.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<&ResultsSummary, SessionError> {
        if self.summary.is_none() {
            let duration_seconds = (now - self.started_at).num_seconds().max(0);
            let summary = ResultsSummary::from_tally(
                self.config.kind(),
                self.config.modules().to_vec(),
                self.tally(),
                duration_seconds,
                now,
            )?;
            self.summary = Some(summary);
        }

        self.summary.as_ref().ok_or(SessionError::NotFinished)
    }

    /// Finish iff the session is in progress and the time limit has elapsed.
    ///
    /// Returns true when this call performed the transition.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if the summary cannot be built.
    pub fn finish_if_expired(&mut self, now: DateTime<Utc>) -> Result<bool, SessionError> {
        if self.is_finished() || !self.is_expired(now) {
            return Ok(false);
        }
        self.finish(now)?;
        Ok(true)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use exani_core::model::{ExamKind, ModuleId, QuestionDraft};
    use exani_core::time::fixed_now;

    fn question(correct: usize) -> QuestionRecord {
        QuestionDraft {
            text: "q".into(),
            options: ["A) uno".into(), "B) dos".into(), "C) tres".into()],
            correct,
            area: "Literatura".into(),
        }
        .validate()
        .unwrap()
    }

    fn config() -> ExamConfig {
        ExamConfig::new(ExamKind::Ingles, vec![ModuleId::Literatura], 30, 10).unwrap()
    }

    fn session(corrects: &[usize]) -> ExamSession {
        let questions = corrects.iter().map(|c| question(*c)).collect();
        ExamSession::new(config(), questions, fixed_now()).unwrap()
    }

    #[test]
    fn new_session_starts_at_the_first_question_unanswered() {
        let session = session(&[0, 1, 2]);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answers().len(), session.questions().len());
        assert!(session.answers().iter().all(Option::is_none));
        assert!(!session.is_finished());
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let err = ExamSession::new(config(), Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, SessionError::NoQuestions);
    }

    #[test]
    fn answers_are_recorded_and_overwritten() {
        let mut session = session(&[0, 1]);
        session.select_option(0, 2).unwrap();
        session.select_option(0, 1).unwrap();
        assert_eq!(session.answers()[0], Some(1));
        assert_eq!(session.answers().len(), session.questions().len());
    }

    #[test]
    fn out_of_range_indexes_fail_loudly() {
        let mut session = session(&[0, 1]);
        assert_eq!(
            session.select_option(2, 0).unwrap_err(),
            SessionError::QuestionOutOfRange { index: 2, len: 2 }
        );
        assert_eq!(
            session.select_option(0, 3).unwrap_err(),
            SessionError::OptionOutOfRange(3)
        );
        assert_eq!(
            session.go_to(5).unwrap_err(),
            SessionError::QuestionOutOfRange { index: 5, len: 2 }
        );
    }

    #[test]
    fn navigation_moves_and_clamps_nothing() {
        let mut session = session(&[0, 1, 2]);

        assert_eq!(session.next().unwrap(), NextStep::Moved(1));
        assert_eq!(session.next().unwrap(), NextStep::Moved(2));
        assert_eq!(session.next().unwrap(), NextStep::FinishRequested);
        assert_eq!(session.current_index(), 2);

        assert_eq!(session.previous().unwrap(), 1);
        session.go_to(0).unwrap();
        assert_eq!(session.previous().unwrap(), 0);
    }

    #[test]
    fn finish_builds_the_expected_summary() {
        let mut session = session(&[0, 0, 2]);
        session.select_option(0, 0).unwrap();
        session.select_option(2, 1).unwrap();

        let finished_at = fixed_now() + Duration::seconds(95);
        let summary = session.finish(finished_at).unwrap().clone();

        assert_eq!(summary.correct(), 1);
        assert_eq!(summary.wrong(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.score(), 33);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.duration_seconds(), 95);
        assert_eq!(summary.finished_at(), finished_at);
    }

    #[test]
    fn finish_is_idempotent() {
        let mut session = session(&[0, 1]);
        session.select_option(0, 0).unwrap();

        let first = session.finish(fixed_now() + Duration::seconds(10)).unwrap().clone();
        let second = session.finish(fixed_now() + Duration::seconds(999)).unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(second.duration_seconds(), 10);
    }

    #[test]
    fn finished_session_rejects_mutation() {
        let mut session = session(&[0, 1]);
        session.finish(fixed_now()).unwrap();

        assert_eq!(
            session.select_option(0, 0).unwrap_err(),
            SessionError::Completed
        );
        assert_eq!(session.go_to(1).unwrap_err(), SessionError::Completed);
        assert_eq!(session.next().unwrap_err(), SessionError::Completed);
        assert_eq!(session.previous().unwrap_err(), SessionError::Completed);
    }

    #[test]
    fn timer_is_derived_and_expiry_finishes_once() {
        let mut session = session(&[0]);
        let start = fixed_now();

        assert_eq!(session.remaining_seconds(start), 30 * 60);
        assert!(!session.is_expired(start + Duration::seconds(1799)));

        let expired_at = start + Duration::minutes(31);
        assert_eq!(session.remaining_seconds(expired_at), 0);
        assert!(session.finish_if_expired(expired_at).unwrap());

        // Level-triggered: later ticks see an already-finished session.
        assert!(!session.finish_if_expired(expired_at + Duration::seconds(5)).unwrap());
        assert_eq!(
            session.select_option(0, 0).unwrap_err(),
            SessionError::Completed
        );
    }

    #[test]
    fn remaining_time_never_goes_negative() {
        let session = session(&[0]);
        let long_after = fixed_now() + Duration::days(2);
        assert_eq!(session.remaining_seconds(long_after), 0);
    }
}
