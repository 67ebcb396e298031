use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::model::question::{QuestionDraft, QuestionError, QuestionRecord};

//
// ─── MODULES ───────────────────────────────────────────────────────────────────
//

/// The eight EXANI-II subject modules.
///
/// The snake_case key is the stable identifier used in bank files and on the
/// command line; the label is the "area" shown alongside each question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleId {
    PensamientoMatematico,
    ComprensionLectora,
    RedaccionIndirecta,
    Biologia,
    Fisica,
    Quimica,
    Historia,
    Literatura,
}

impl ModuleId {
    pub const ALL: [ModuleId; 8] = [
        ModuleId::PensamientoMatematico,
        ModuleId::ComprensionLectora,
        ModuleId::RedaccionIndirecta,
        ModuleId::Biologia,
        ModuleId::Fisica,
        ModuleId::Quimica,
        ModuleId::Historia,
        ModuleId::Literatura,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            ModuleId::PensamientoMatematico => "pensamiento_matematico",
            ModuleId::ComprensionLectora => "comprension_lectora",
            ModuleId::RedaccionIndirecta => "redaccion_indirecta",
            ModuleId::Biologia => "biologia",
            ModuleId::Fisica => "fisica",
            ModuleId::Quimica => "quimica",
            ModuleId::Historia => "historia",
            ModuleId::Literatura => "literatura",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ModuleId::PensamientoMatematico => "Pensamiento Matemático",
            ModuleId::ComprensionLectora => "Comprensión Lectora",
            ModuleId::RedaccionIndirecta => "Redacción Indirecta",
            ModuleId::Biologia => "Biología",
            ModuleId::Fisica => "Física",
            ModuleId::Quimica => "Química",
            ModuleId::Historia => "Historia",
            ModuleId::Literatura => "Literatura",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

//
// ─── QUESTION BANK ─────────────────────────────────────────────────────────────
//

/// Static lookup of module → ordered question list.
///
/// Supplied at process start and never mutated while a session is running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    modules: BTreeMap<ModuleId, Vec<QuestionRecord>>,
}

impl QuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a question to a module's list, creating the list if needed.
    pub fn insert(&mut self, module: ModuleId, question: QuestionRecord) {
        self.modules.entry(module).or_default().push(question);
    }

    /// Questions of a module, in bank order. Empty slice if the module has none.
    #[must_use]
    pub fn questions(&self, module: ModuleId) -> &[QuestionRecord] {
        self.modules.get(&module).map_or(&[], Vec::as_slice)
    }

    /// Total number of questions across the given modules.
    #[must_use]
    pub fn total_available(&self, modules: &[ModuleId]) -> usize {
        modules.iter().map(|m| self.questions(*m).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.values().all(Vec::is_empty)
    }
}

/// Unvalidated bank data as it appears in a bank file: module key → drafts.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct BankDraft(BTreeMap<ModuleId, Vec<QuestionDraft>>);

impl BankDraft {
    /// Validate every draft into a `QuestionBank`.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` encountered, in module key order.
    pub fn validate(self) -> Result<QuestionBank, QuestionError> {
        let mut bank = QuestionBank::new();
        for (module, drafts) in self.0 {
            for draft in drafts {
                bank.insert(module, draft.validate()?);
            }
        }
        Ok(bank)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str, correct: usize, area: &str) -> QuestionRecord {
        QuestionDraft {
            text: text.into(),
            options: ["A) uno".into(), "B) dos".into(), "C) tres".into()],
            correct,
            area: area.into(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn module_keys_round_trip() {
        for module in ModuleId::ALL {
            assert_eq!(ModuleId::from_key(module.key()), Some(module));
        }
        assert_eq!(ModuleId::from_key("astronomia"), None);
    }

    #[test]
    fn missing_module_yields_empty_slice() {
        let bank = QuestionBank::new();
        assert!(bank.questions(ModuleId::Historia).is_empty());
        assert!(bank.is_empty());
    }

    #[test]
    fn totals_span_only_requested_modules() {
        let mut bank = QuestionBank::new();
        bank.insert(ModuleId::Biologia, record("b1", 0, "Biología"));
        bank.insert(ModuleId::Biologia, record("b2", 1, "Biología"));
        bank.insert(ModuleId::Fisica, record("f1", 2, "Física"));

        assert_eq!(bank.total_available(&[ModuleId::Biologia]), 2);
        assert_eq!(
            bank.total_available(&[ModuleId::Biologia, ModuleId::Fisica]),
            3
        );
        assert_eq!(bank.total_available(&[ModuleId::Historia]), 0);
    }

    #[test]
    fn bank_draft_parses_and_validates() {
        let json = r#"{
            "historia": [
                {
                    "text": "¿En qué año se consumó la Independencia de México?",
                    "options": ["A) 1821", "B) 1810", "C) 1519"],
                    "correct": 0,
                    "area": "Historia"
                }
            ]
        }"#;
        let draft: BankDraft = serde_json::from_str(json).unwrap();
        let bank = draft.validate().unwrap();
        assert_eq!(bank.questions(ModuleId::Historia).len(), 1);
    }

    #[test]
    fn bank_draft_rejects_invalid_question() {
        let json = r#"{
            "fisica": [
                {
                    "text": "x",
                    "options": ["A) v = d/t", "B) v = t/d", "C) v = d × t"],
                    "correct": 7,
                    "area": "Física"
                }
            ]
        }"#;
        let draft: BankDraft = serde_json::from_str(json).unwrap();
        assert_eq!(
            draft.validate().unwrap_err(),
            QuestionError::InvalidCorrectIndex(7)
        );
    }
}
