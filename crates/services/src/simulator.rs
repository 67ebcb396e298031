use chrono::{DateTime, Utc};
use rand::Rng;

use exani_core::Clock;
use exani_core::model::{ExamConfig, ExamKind, ModuleId, QuestionBank, ResultsSummary};

use crate::error::{ExportError, SessionError};
use crate::export;
use crate::plan::ExamBuilder;
use crate::review::{self, ReviewEntry, StatusFilter};
use crate::session::{ExamSession, NextStep};
use crate::session_view::SessionSnapshot;

/// Facade the presentation layer drives.
///
/// Owns the clock, the static question bank, the retained configuration,
/// and at most one session; "not started" is the absence of a session.
/// There is exactly one instance and one caller at a time, so no operation
/// observes another mid-flight.
#[derive(Debug)]
pub struct ExamService {
    clock: Clock,
    bank: QuestionBank,
    config: ExamConfig,
    session: Option<ExamSession>,
}

impl ExamService {
    #[must_use]
    pub fn new(clock: Clock, bank: QuestionBank, config: ExamConfig) -> Self {
        Self {
            clock,
            bank,
            config,
            session: None,
        }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    /// Replace the retained configuration; consumed at the next `start`.
    pub fn set_config(&mut self, config: ExamConfig) {
        self.config = config;
    }

    /// Validate and store a configuration from raw parameters.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` when the module list is empty or a
    /// bound is violated; the current configuration is left untouched.
    pub fn configure(
        &mut self,
        kind: ExamKind,
        modules: Vec<ModuleId>,
        time_limit_minutes: u32,
        question_count: u32,
    ) -> Result<(), SessionError> {
        self.config = ExamConfig::new(kind, modules, time_limit_minutes, question_count)?;
        Ok(())
    }

    /// Swap the time source. Mainly for tests and for hosts that pin time.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    #[must_use]
    pub fn session(&self) -> Option<&ExamSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.as_ref().is_some_and(ExamSession::is_finished)
    }

    fn session_ref(&self) -> Result<&ExamSession, SessionError> {
        self.session.as_ref().ok_or(SessionError::NotStarted)
    }

    fn session_mut(&mut self) -> Result<&mut ExamSession, SessionError> {
        self.session.as_mut().ok_or(SessionError::NotStarted)
    }

    /// Start a new session from the retained configuration, replacing any
    /// previous one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestions` when the selected modules have
    /// no questions in the bank.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.start_with_rng(&mut rand::rng())
    }

    /// `start` with an injected random source for deterministic selection.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestions` when the selected modules have
    /// no questions in the bank.
    pub fn start_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        let plan = ExamBuilder::new(&self.bank, &self.config).build(rng);
        if plan.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        let session = ExamSession::new(self.config.clone(), plan.questions, self.clock.now())?;
        self.session = Some(session);
        Ok(())
    }

    /// Discard the session, keeping the configuration. Always succeeds.
    pub fn restart(&mut self) {
        self.session = None;
    }

    /// Record an answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted`, `Completed`, or a range error.
    pub fn select_option(&mut self, index: usize, option: usize) -> Result<(), SessionError> {
        self.session_mut()?.select_option(index, option)
    }

    /// Jump to a question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted`, `Completed`, or a range error.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.session_mut()?.go_to(index)
    }

    /// Advance, or learn that the last question was reached.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` or `Completed`.
    pub fn next(&mut self) -> Result<NextStep, SessionError> {
        self.session_mut()?.next()
    }

    /// Move back one question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` or `Completed`.
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        self.session_mut()?.previous()
    }

    /// Finish the session now. Idempotent once finished.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` or `Summary`.
    pub fn finish(&mut self) -> Result<&ResultsSummary, SessionError> {
        let now = self.clock.now();
        self.session_mut()?.finish(now)
    }

    /// Level-triggered expiry check; safe to call on every refresh tick.
    ///
    /// Returns true when this call transitioned the session to finished.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` or `Summary`.
    pub fn finish_if_expired(&mut self) -> Result<bool, SessionError> {
        let now = self.clock.now();
        self.session_mut()?.finish_if_expired(now)
    }

    /// Snapshot of the session for rendering.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` when no session exists.
    pub fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        Ok(SessionSnapshot::capture(self.session_ref()?, self.clock.now()))
    }

    /// The final summary.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` or `NotFinished`.
    pub fn results(&self) -> Result<&ResultsSummary, SessionError> {
        self.session_ref()?
            .summary()
            .ok_or(SessionError::NotFinished)
    }

    /// Review entries filtered by outcome and area. Post-finish only.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` or `NotFinished`.
    pub fn review_entries(
        &self,
        status: StatusFilter,
        area: Option<&str>,
    ) -> Result<Vec<ReviewEntry<'_>>, SessionError> {
        review::review_entries(self.session_ref()?, status, area)
    }

    /// Distinct area labels of the finished session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` or `NotFinished`.
    pub fn review_areas(&self) -> Result<Vec<&str>, SessionError> {
        review::areas(self.session_ref()?)
    }

    /// Detailed JSON export. Post-finish only.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` for an unfinished session or serialization
    /// failure.
    pub fn results_json(&self) -> Result<String, ExportError> {
        export::results_json(self.session_ref()?)
    }

    /// One-row CSV summary. Post-finish only.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` for an unfinished session.
    pub fn summary_csv(&self) -> Result<String, ExportError> {
        export::summary_csv(self.session_ref()?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
