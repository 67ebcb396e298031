//! Result export: a detailed JSON document and a one-row CSV summary.

use serde::Serialize;

use exani_core::model::{OPTION_COUNT, ResultsSummary};

use crate::error::{ExportError, SessionError};
use crate::session::ExamSession;
use crate::timer;

//
// ─── JSON ──────────────────────────────────────────────────────────────────────
//

#[derive(Serialize)]
struct SummaryDoc<'a> {
    score: u8,
    correct: u32,
    wrong: u32,
    skipped: u32,
    total_questions: u32,
    exam_type: &'a str,
    modules: Vec<&'a str>,
    duration_seconds: i64,
    date: String,
}

impl<'a> SummaryDoc<'a> {
    fn from_summary(summary: &'a ResultsSummary) -> Self {
        Self {
            score: summary.score(),
            correct: summary.correct(),
            wrong: summary.wrong(),
            skipped: summary.skipped(),
            total_questions: summary.total(),
            exam_type: summary.kind().key(),
            modules: summary.modules().iter().map(|m| m.key()).collect(),
            duration_seconds: summary.duration_seconds(),
            date: format_date(summary),
        }
    }
}

#[derive(Serialize)]
struct QuestionDetail<'a> {
    /// One-based position, matching what the user saw on screen.
    numero: usize,
    area: &'a str,
    pregunta: &'a str,
    opciones: &'a [String; OPTION_COUNT],
    respuesta_correcta: usize,
    respuesta_usuario: Option<usize>,
    es_correcta: bool,
    sin_responder: bool,
}

#[derive(Serialize)]
struct ExportDoc<'a> {
    resumen: SummaryDoc<'a>,
    preguntas_detalle: Vec<QuestionDetail<'a>>,
}

/// Detailed results as pretty-printed JSON, one entry per question in
/// session order.
///
/// # Errors
///
/// Returns `SessionError::NotFinished` while the exam is in progress, or a
/// serialization error.
pub fn results_json(session: &ExamSession) -> Result<String, ExportError> {
    let summary = session.summary().ok_or(SessionError::NotFinished)?;

    let preguntas_detalle = session
        .questions()
        .iter()
        .zip(session.answers())
        .enumerate()
        .map(|(index, (question, answer))| QuestionDetail {
            numero: index + 1,
            area: question.area(),
            pregunta: question.text(),
            opciones: question.options(),
            respuesta_correcta: question.correct_index(),
            respuesta_usuario: *answer,
            es_correcta: answer.is_some_and(|a| question.is_correct(a)),
            sin_responder: answer.is_none(),
        })
        .collect();

    let doc = ExportDoc {
        resumen: SummaryDoc::from_summary(summary),
        preguntas_detalle,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

//
// ─── CSV ───────────────────────────────────────────────────────────────────────
//

const CSV_HEADER: &str = "Tipo de Examen,Puntuación (%),Respuestas Correctas,\
                          Respuestas Incorrectas,Sin Responder,Total Preguntas,\
                          Duración,Fecha";

/// Single-row CSV summary of a finished exam.
///
/// # Errors
///
/// Returns `SessionError::NotFinished` while the exam is in progress.
pub fn summary_csv(session: &ExamSession) -> Result<String, ExportError> {
    let summary = session.summary().ok_or(SessionError::NotFinished)?;

    let fields = [
        csv_field(summary.kind().key()),
        summary.score().to_string(),
        summary.correct().to_string(),
        summary.wrong().to_string(),
        summary.skipped().to_string(),
        summary.total().to_string(),
        csv_field(&timer::format_hms(summary.duration_seconds())),
        csv_field(&format_date(summary)),
    ];

    Ok(format!("{CSV_HEADER}\n{}\n", fields.join(",")))
}

fn format_date(summary: &ResultsSummary) -> String {
    summary.finished_at().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Quote a field when it contains a delimiter, quote, or newline.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
