use serde::Deserialize;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("option {0} cannot be empty")]
    EmptyOption(usize),

    #[error("correct option index {0} is out of range")]
    InvalidCorrectIndex(usize),

    #[error("area label cannot be empty")]
    EmptyArea,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Number of answer options per question. EXANI-II items always offer three.
pub const OPTION_COUNT: usize = 3;

/// Unvalidated question data as it appears in a bank file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct: usize,
    pub area: String,
}

impl QuestionDraft {
    /// Validate this draft into an immutable `QuestionRecord`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text, an option, or the area label is
    /// empty, or if the correct index does not address one of the options.
    pub fn validate(self) -> Result<QuestionRecord, QuestionError> {
        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        for (i, option) in self.options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(QuestionError::EmptyOption(i));
            }
        }
        if self.correct >= OPTION_COUNT {
            return Err(QuestionError::InvalidCorrectIndex(self.correct));
        }
        if self.area.trim().is_empty() {
            return Err(QuestionError::EmptyArea);
        }

        Ok(QuestionRecord {
            text: self.text,
            options: self.options,
            correct: self.correct,
            area: self.area,
        })
    }
}

/// A single multiple-choice item.
///
/// Immutable once validated. Sessions store the records they selected by
/// value, so identity is structural and no persistent ID is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    text: String,
    options: [String; OPTION_COUNT],
    correct: usize,
    area: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    /// Index of the correct option, always `< OPTION_COUNT`.
    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct
    }

    /// Human-readable module label shown alongside the question.
    #[must_use]
    pub fn area(&self) -> &str {
        &self.area
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            text: "¿Cuál es la unidad básica de la vida?".into(),
            options: [
                "A) La célula".into(),
                "B) El átomo".into(),
                "C) El tejido".into(),
            ],
            correct: 0,
            area: "Biología".into(),
        }
    }

    #[test]
    fn valid_draft_becomes_record() {
        let record = draft().validate().unwrap();
        assert_eq!(record.correct_index(), 0);
        assert_eq!(record.area(), "Biología");
        assert!(record.is_correct(0));
        assert!(!record.is_correct(2));
    }

    #[test]
    fn empty_text_is_rejected() {
        let mut d = draft();
        d.text = "   ".into();
        assert_eq!(d.validate().unwrap_err(), QuestionError::EmptyText);
    }

    #[test]
    fn blank_option_is_rejected() {
        let mut d = draft();
        d.options[1] = String::new();
        assert_eq!(d.validate().unwrap_err(), QuestionError::EmptyOption(1));
    }

    #[test]
    fn out_of_range_correct_index_is_rejected() {
        let mut d = draft();
        d.correct = 3;
        assert_eq!(
            d.validate().unwrap_err(),
            QuestionError::InvalidCorrectIndex(3)
        );
    }

    #[test]
    fn draft_parses_from_json() {
        let json = r#"{
            "text": "¿Cuál es el símbolo químico del oro?",
            "options": ["A) Au", "B) Ag", "C) Fe"],
            "correct": 0,
            "area": "Química"
        }"#;
        let d: QuestionDraft = serde_json::from_str(json).unwrap();
        assert!(d.validate().is_ok());
    }
}
