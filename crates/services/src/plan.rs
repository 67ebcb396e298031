use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use exani_core::model::{ExamConfig, ModuleId, QuestionBank, QuestionRecord};

/// Selection result for an exam build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamPlan {
    pub questions: Vec<QuestionRecord>,
    /// Questions taken from the front of each module's list.
    pub base_selected: usize,
    /// Questions added by random resampling to reach the requested count.
    pub fill_selected: usize,
}

impl ExamPlan {
    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Returns true when no questions were selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Builds an exam by distributing the requested count across the selected
/// modules, then resampling at random to fill any shortfall.
///
/// The bank is small relative to configurable exam sizes, so the fill step
/// tolerates duplicates: reaching the requested count wins over uniqueness.
pub struct ExamBuilder<'a> {
    bank: &'a QuestionBank,
    config: &'a ExamConfig,
}

impl<'a> ExamBuilder<'a> {
    #[must_use]
    pub fn new(bank: &'a QuestionBank, config: &'a ExamConfig) -> Self {
        Self { bank, config }
    }

    /// Build the ordered question list for one session.
    ///
    /// - Each selected module contributes up to `question_count / modules`
    ///   questions from the front of its list (at least one per module).
    /// - Remaining slots are filled by sampling a random selected module,
    ///   then a random question from it; duplicates are allowed.
    /// - The accumulated list is shuffled and truncated to the exact count.
    ///
    /// Returns an empty plan when every selected module is empty; the caller
    /// must treat that as a configuration failure instead of starting.
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> ExamPlan {
        let modules = self.config.modules();
        let target = self.config.question_count() as usize;

        let populated: Vec<ModuleId> = modules
            .iter()
            .copied()
            .filter(|m| !self.bank.questions(*m).is_empty())
            .collect();
        if populated.is_empty() {
            return ExamPlan {
                questions: Vec::new(),
                base_selected: 0,
                fill_selected: 0,
            };
        }

        let per_module = (target / modules.len()).max(1);

        let mut questions: Vec<QuestionRecord> = Vec::with_capacity(target);
        for module in modules {
            for question in self.bank.questions(*module).iter().take(per_module) {
                if questions.len() >= target {
                    break;
                }
                questions.push(question.clone());
            }
        }
        let base_selected = questions.len();

        while questions.len() < target {
            let Some(module) = populated.choose(rng) else {
                break;
            };
            let Some(question) = self.bank.questions(*module).choose(rng) else {
                break;
            };
            questions.push(question.clone());
        }
        let fill_selected = questions.len() - base_selected;

        questions.shuffle(rng);
        questions.truncate(target);

        ExamPlan {
            questions,
            base_selected,
            fill_selected,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
