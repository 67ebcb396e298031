use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::bank::ModuleId;
use crate::model::config::ExamKind;
use crate::scoring::{self, Tally};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("answer counts ({sum}) do not match total questions ({total})")]
    CountMismatch { total: u32, sum: u32 },

    #[error("score {0} exceeds 100 percent")]
    InvalidScore(u8),

    #[error("duration cannot be negative: {0}")]
    NegativeDuration(i64),
}

//
// ─── RESULTS SUMMARY ───────────────────────────────────────────────────────────
//

/// Final outcome of a finished exam session.
///
/// Built exactly once, when the session transitions to finished, and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsSummary {
    kind: ExamKind,
    modules: Vec<ModuleId>,
    score: u8,
    correct: u32,
    wrong: u32,
    skipped: u32,
    total: u32,
    duration_seconds: i64,
    finished_at: DateTime<Utc>,
}

impl ResultsSummary {
    /// Build a summary from already-computed counts.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::CountMismatch` if the counts do not sum to the
    /// total, `InvalidScore` for a score above 100, and `NegativeDuration`
    /// for a negative duration.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: ExamKind,
        modules: Vec<ModuleId>,
        score: u8,
        correct: u32,
        wrong: u32,
        skipped: u32,
        total: u32,
        duration_seconds: i64,
        finished_at: DateTime<Utc>,
    ) -> Result<Self, SummaryError> {
        let sum = correct + wrong + skipped;
        if sum != total {
            return Err(SummaryError::CountMismatch { total, sum });
        }
        if score > 100 {
            return Err(SummaryError::InvalidScore(score));
        }
        if duration_seconds < 0 {
            return Err(SummaryError::NegativeDuration(duration_seconds));
        }

        Ok(Self {
            kind,
            modules,
            score,
            correct,
            wrong,
            skipped,
            total,
            duration_seconds,
            finished_at,
        })
    }

    /// Build a summary from a tally, deriving the percentage score.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::NegativeDuration` for a negative duration.
    pub fn from_tally(
        kind: ExamKind,
        modules: Vec<ModuleId>,
        tally: Tally,
        duration_seconds: i64,
        finished_at: DateTime<Utc>,
    ) -> Result<Self, SummaryError> {
        let total = tally.total();
        let score = scoring::score_percent(tally.correct, total);
        Self::new(
            kind,
            modules,
            score,
            tally.correct,
            tally.wrong,
            tally.skipped,
            total,
            duration_seconds,
            finished_at,
        )
    }

    #[must_use]
    pub fn kind(&self) -> ExamKind {
        self.kind
    }

    #[must_use]
    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    /// Integer percentage in `0..=100`.
    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn wrong(&self) -> u32 {
        self.wrong
    }

    #[must_use]
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn duration_seconds(&self) -> i64 {
        self.duration_seconds
    }

    #[must_use]
    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn mismatched_counts_are_rejected() {
        let err = ResultsSummary::new(
            ExamKind::Ingles,
            vec![ModuleId::Literatura],
            50,
            5,
            4,
            2,
            10,
            60,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, SummaryError::CountMismatch { total: 10, sum: 11 });
    }

    #[test]
    fn negative_duration_is_rejected() {
        let err = ResultsSummary::new(
            ExamKind::Ingles,
            vec![ModuleId::Literatura],
            100,
            1,
            0,
            0,
            1,
            -1,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, SummaryError::NegativeDuration(-1));
    }

    #[test]
    fn from_tally_derives_the_score() {
        let tally = Tally {
            correct: 2,
            wrong: 1,
            skipped: 0,
        };
        let summary = ResultsSummary::from_tally(
            ExamKind::Transversales,
            vec![ModuleId::ComprensionLectora],
            tally,
            125,
            fixed_now(),
        )
        .unwrap();

        assert_eq!(summary.score(), 67);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.duration_seconds(), 125);
        assert_eq!(
            summary.correct() + summary.wrong() + summary.skipped(),
            summary.total()
        );
    }
}
