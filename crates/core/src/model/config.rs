use std::fmt;

use thiserror::Error;

use crate::model::bank::ModuleId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("at least one module must be selected")]
    NoModules,

    #[error(
        "time limit of {0} minutes is outside \
         [{MIN_TIME_LIMIT_MINUTES}, {MAX_TIME_LIMIT_MINUTES}]"
    )]
    TimeLimitOutOfRange(u32),

    #[error(
        "question count of {0} is outside [{MIN_QUESTION_COUNT}, {MAX_QUESTION_COUNT}]"
    )]
    QuestionCountOutOfRange(u32),
}

//
// ─── EXAM KIND ─────────────────────────────────────────────────────────────────
//

/// The four EXANI-II simulation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamKind {
    /// Áreas transversales: 90 reactivos, 180 minutes.
    Transversales,
    /// Módulos específicos: 48 reactivos, 120 minutes.
    Disciplinares,
    /// EXANI-II completo: 138 reactivos, 270 minutes.
    Completo,
    /// Información diagnóstica de inglés: 30 reactivos, 30 minutes.
    Ingles,
}

impl ExamKind {
    pub const ALL: [ExamKind; 4] = [
        ExamKind::Transversales,
        ExamKind::Disciplinares,
        ExamKind::Completo,
        ExamKind::Ingles,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            ExamKind::Transversales => "transversales",
            ExamKind::Disciplinares => "disciplinares",
            ExamKind::Completo => "completo",
            ExamKind::Ingles => "ingles",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ExamKind::Transversales => "Áreas Transversales",
            ExamKind::Disciplinares => "Módulos Específicos",
            ExamKind::Completo => "EXANI-II Completo",
            ExamKind::Ingles => "Información Diagnóstica",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    /// The official configuration for this exam mode.
    #[must_use]
    pub fn preset(self) -> ExamConfig {
        let (question_count, time_limit_minutes, modules) = match self {
            ExamKind::Transversales => (
                90,
                180,
                vec![
                    ModuleId::PensamientoMatematico,
                    ModuleId::ComprensionLectora,
                    ModuleId::RedaccionIndirecta,
                ],
            ),
            ExamKind::Disciplinares => (
                48,
                120,
                vec![ModuleId::Biologia, ModuleId::Fisica, ModuleId::Quimica],
            ),
            ExamKind::Completo => (
                138,
                270,
                vec![
                    ModuleId::PensamientoMatematico,
                    ModuleId::ComprensionLectora,
                    ModuleId::RedaccionIndirecta,
                    ModuleId::Biologia,
                    ModuleId::Fisica,
                ],
            ),
            ExamKind::Ingles => (30, 30, vec![ModuleId::Literatura]),
        };

        ExamConfig {
            kind: self,
            modules,
            time_limit_minutes,
            question_count,
        }
    }
}

impl fmt::Display for ExamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

//
// ─── EXAM CONFIG ───────────────────────────────────────────────────────────────
//

pub const MIN_TIME_LIMIT_MINUTES: u32 = 30;
pub const MAX_TIME_LIMIT_MINUTES: u32 = 300;
pub const MIN_QUESTION_COUNT: u32 = 10;
pub const MAX_QUESTION_COUNT: u32 = 138;

/// User-chosen exam parameters.
///
/// Consumed read-only by the question selector when a session starts; a
/// session keeps its own copy so later edits only affect the next exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamConfig {
    kind: ExamKind,
    modules: Vec<ModuleId>,
    time_limit_minutes: u32,
    question_count: u32,
}

impl ExamConfig {
    /// Create a validated configuration.
    ///
    /// Duplicate modules are dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoModules` if the module list is empty, or a
    /// range error when the time limit or question count is out of bounds.
    pub fn new(
        kind: ExamKind,
        modules: Vec<ModuleId>,
        time_limit_minutes: u32,
        question_count: u32,
    ) -> Result<Self, ConfigError> {
        let mut deduped: Vec<ModuleId> = Vec::with_capacity(modules.len());
        for module in modules {
            if !deduped.contains(&module) {
                deduped.push(module);
            }
        }
        if deduped.is_empty() {
            return Err(ConfigError::NoModules);
        }
        if !(MIN_TIME_LIMIT_MINUTES..=MAX_TIME_LIMIT_MINUTES).contains(&time_limit_minutes) {
            return Err(ConfigError::TimeLimitOutOfRange(time_limit_minutes));
        }
        if !(MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&question_count) {
            return Err(ConfigError::QuestionCountOutOfRange(question_count));
        }

        Ok(Self {
            kind,
            modules: deduped,
            time_limit_minutes,
            question_count,
        })
    }

    #[must_use]
    pub fn kind(&self) -> ExamKind {
        self.kind
    }

    /// Selected modules in configuration order, without duplicates.
    #[must_use]
    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    #[must_use]
    pub fn time_limit_minutes(&self) -> u32 {
        self.time_limit_minutes
    }

    #[must_use]
    pub fn time_limit_seconds(&self) -> i64 {
        i64::from(self.time_limit_minutes) * 60
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_module_list_is_rejected() {
        let err =
            ExamConfig::new(ExamKind::Transversales, Vec::new(), 60, 30).unwrap_err();
        assert_eq!(err, ConfigError::NoModules);
    }

    #[test]
    fn duplicate_modules_are_dropped_keeping_order() {
        let config = ExamConfig::new(
            ExamKind::Disciplinares,
            vec![
                ModuleId::Fisica,
                ModuleId::Biologia,
                ModuleId::Fisica,
                ModuleId::Quimica,
            ],
            60,
            30,
        )
        .unwrap();
        assert_eq!(
            config.modules(),
            &[ModuleId::Fisica, ModuleId::Biologia, ModuleId::Quimica]
        );
    }

    #[test]
    fn time_limit_bounds_are_enforced() {
        let modules = vec![ModuleId::Historia];
        assert_eq!(
            ExamConfig::new(ExamKind::Ingles, modules.clone(), 29, 30).unwrap_err(),
            ConfigError::TimeLimitOutOfRange(29)
        );
        assert_eq!(
            ExamConfig::new(ExamKind::Ingles, modules.clone(), 301, 30).unwrap_err(),
            ConfigError::TimeLimitOutOfRange(301)
        );
        assert!(ExamConfig::new(ExamKind::Ingles, modules, 300, 30).is_ok());
    }

    #[test]
    fn question_count_bounds_are_enforced() {
        let modules = vec![ModuleId::Historia];
        assert_eq!(
            ExamConfig::new(ExamKind::Ingles, modules.clone(), 60, 9).unwrap_err(),
            ConfigError::QuestionCountOutOfRange(9)
        );
        assert_eq!(
            ExamConfig::new(ExamKind::Ingles, modules.clone(), 60, 139).unwrap_err(),
            ConfigError::QuestionCountOutOfRange(139)
        );
        assert!(ExamConfig::new(ExamKind::Ingles, modules, 60, 138).is_ok());
    }

    #[test]
    fn presets_match_the_official_modes() {
        let completo = ExamKind::Completo.preset();
        assert_eq!(completo.question_count(), 138);
        assert_eq!(completo.time_limit_minutes(), 270);
        assert_eq!(completo.modules().len(), 5);

        let ingles = ExamKind::Ingles.preset();
        assert_eq!(ingles.question_count(), 30);
        assert_eq!(ingles.time_limit_seconds(), 1800);
        assert_eq!(ingles.modules(), &[ModuleId::Literatura]);
    }

    #[test]
    fn kind_keys_round_trip() {
        for kind in ExamKind::ALL {
            assert_eq!(ExamKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(ExamKind::from_key("oral"), None);
    }
}
