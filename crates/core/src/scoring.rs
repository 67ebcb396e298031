//! Pure scoring over a fixed question list and its recorded answers.

use crate::model::QuestionRecord;

/// Correct/wrong/skipped counts for one pass over the answers.
///
/// Used live during the exam (stats panel) and once more at finish; both
/// paths run the same function, so the displayed and final numbers agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub correct: u32,
    pub wrong: u32,
    pub skipped: u32,
}

impl Tally {
    #[must_use]
    pub fn total(self) -> u32 {
        self.correct + self.wrong + self.skipped
    }
}

/// Count correct, wrong, and skipped answers.
///
/// `answers` must be index-aligned with `questions`; an unanswered slot
/// counts as skipped regardless of the question it belongs to.
#[must_use]
pub fn tally(questions: &[QuestionRecord], answers: &[Option<usize>]) -> Tally {
    debug_assert_eq!(questions.len(), answers.len());

    let mut result = Tally::default();
    for (question, answer) in questions.iter().zip(answers) {
        match answer {
            None => result.skipped += 1,
            Some(option) if question.is_correct(*option) => result.correct += 1,
            Some(_) => result.wrong += 1,
        }
    }
    result
}

/// Integer percentage score, `0..=100`. Ties round half to even.
///
/// Returns 0 when `total` is 0 rather than dividing by zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn score_percent(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = f64::from(correct) / f64::from(total) * 100.0;
    percent.round_ties_even() as u8
}
