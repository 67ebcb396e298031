use std::fmt;
use std::io::{self, BufRead, Write};

use rand::SeedableRng;
use rand::rngs::StdRng;

use exani_core::Clock;
use exani_core::model::{
    BankDraft, ExamConfig, ExamKind, ModuleId, QuestionBank, QuestionRecord,
};
use services::review::{ReviewStatus, StatusFilter};
use services::session::NextStep;
use services::simulator::ExamService;
use services::timer;

/// Transcription of the official EXANI-II question set, all eight modules.
const DEFAULT_BANK: &str = include_str!("../data/bank.json");

const OPTION_LETTERS: [char; 3] = ['a', 'b', 'c'];

//
// ─── ARGUMENTS ─────────────────────────────────────────────────────────────────
//

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownKind(String),
    UnknownModule(String),
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownKind(raw) => write!(f, "unknown exam kind: {raw}"),
            ArgsError::UnknownModule(raw) => write!(f, "unknown module: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => {
                write!(f, "invalid {flag} value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug)]
struct Args {
    kind: ExamKind,
    modules: Option<Vec<ModuleId>>,
    questions: Option<u32>,
    minutes: Option<u32>,
    seed: Option<u64>,
    bank_path: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--kind <transversales|disciplinares|completo|ingles>]"
    );
    eprintln!("                      [--modules <key,key,...>] [--questions <n>]");
    eprintln!("                      [--minutes <n>] [--seed <n>] [--bank <json file>]");
    eprintln!();
    eprintln!("Defaults come from the chosen kind's official preset.");
    eprintln!();
    eprintln!("Module keys:");
    for module in ModuleId::ALL {
        eprintln!("  {} ({})", module.key(), module.label());
    }
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXANI_BANK, EXANI_SEED");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(flag: &'static str, raw: &str) -> Result<T, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidNumber {
        flag,
        raw: raw.to_string(),
    })
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            kind: ExamKind::Transversales,
            modules: None,
            questions: None,
            minutes: None,
            seed: std::env::var("EXANI_SEED")
                .ok()
                .and_then(|value| value.parse().ok()),
            bank_path: std::env::var("EXANI_BANK").ok(),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--kind" => {
                    let value = require_value(args, "--kind")?;
                    parsed.kind =
                        ExamKind::from_key(&value).ok_or(ArgsError::UnknownKind(value))?;
                }
                "--modules" => {
                    let value = require_value(args, "--modules")?;
                    let mut modules = Vec::new();
                    for key in value.split(',').map(str::trim).filter(|k| !k.is_empty()) {
                        let module = ModuleId::from_key(key)
                            .ok_or_else(|| ArgsError::UnknownModule(key.to_string()))?;
                        modules.push(module);
                    }
                    parsed.modules = Some(modules);
                }
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    parsed.questions = Some(parse_number("--questions", &value)?);
                }
                "--minutes" => {
                    let value = require_value(args, "--minutes")?;
                    parsed.minutes = Some(parse_number("--minutes", &value)?);
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    parsed.seed = Some(parse_number("--seed", &value)?);
                }
                "--bank" => {
                    parsed.bank_path = Some(require_value(args, "--bank")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    fn config(&self) -> Result<ExamConfig, exani_core::model::ConfigError> {
        let preset = self.kind.preset();
        ExamConfig::new(
            self.kind,
            self.modules
                .clone()
                .unwrap_or_else(|| preset.modules().to_vec()),
            self.minutes.unwrap_or_else(|| preset.time_limit_minutes()),
            self.questions.unwrap_or_else(|| preset.question_count()),
        )
    }
}

fn load_bank(path: Option<&str>) -> Result<QuestionBank, Box<dyn std::error::Error>> {
    let raw = match path {
        Some(p) => std::fs::read_to_string(p)?,
        None => DEFAULT_BANK.to_string(),
    };
    let draft: BankDraft = serde_json::from_str(&raw)?;
    Ok(draft.validate()?)
}

//
// ─── EXAM SCREEN ───────────────────────────────────────────────────────────────
//

/// Whether the outer screen flow continues or the program ends.
enum LoopExit {
    Continue,
    Quit,
}

fn print_question(service: &ExamService) {
    let Ok(snapshot) = service.snapshot() else {
        return;
    };
    let Some(session) = service.session() else {
        return;
    };
    let question = session.current_question();

    let warning = if snapshot.time_warning { " ⚠" } else { "" };
    println!();
    println!(
        "Pregunta {} de {} | {} respondidas | ⏰ {}{}",
        snapshot.current_index + 1,
        snapshot.total,
        snapshot.answered,
        timer::format_hms(snapshot.remaining_seconds),
        warning
    );
    println!(
        "Correctas {} · Incorrectas {} · Sin responder {} · Calificación {}%",
        snapshot.correct, snapshot.wrong, snapshot.skipped, snapshot.score
    );
    println!();
    println!("[{}] {}", question.area(), question.text());
    let selected = session.answers()[snapshot.current_index];
    for (i, option) in question.options().iter().enumerate() {
        let marker = if selected == Some(i) { "●" } else { " " };
        println!(" {marker} {option}");
    }
}

fn confirm_finish(lines: &mut impl Iterator<Item = io::Result<String>>) -> io::Result<bool> {
    println!("¿Terminar el examen? Una vez terminado no podrás modificar tus respuestas. (s/n)");
    print!("> ");
    io::stdout().flush()?;
    match lines.next().transpose()? {
        Some(line) => Ok(matches!(line.trim(), "s" | "S" | "si" | "sí")),
        None => Ok(true),
    }
}

fn exam_loop(
    service: &mut ExamService,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<LoopExit, Box<dyn std::error::Error>> {
    loop {
        // Level-triggered expiry check, once per prompt.
        if service.finish_if_expired()? {
            println!("⏰ ¡Tiempo agotado!");
            return Ok(LoopExit::Continue);
        }

        print_question(service);
        print!("[a/b/c responder · n siguiente · p anterior · g <n> ir · f terminar · q salir]\n> ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            service.finish()?;
            return Ok(LoopExit::Continue);
        };
        let line = line.trim().to_lowercase();
        let mut words = line.split_whitespace();

        match words.next() {
            Some(answer) if answer.len() == 1 && OPTION_LETTERS.iter().any(|c| answer.starts_with(*c)) => {
                let option = OPTION_LETTERS
                    .iter()
                    .position(|c| answer.starts_with(*c))
                    .unwrap_or(0);
                let index = service.snapshot()?.current_index;
                service.select_option(index, option)?;
                // Presentation policy: move on after answering, except at the end.
                if index + 1 < service.snapshot()?.total {
                    service.next()?;
                }
            }
            Some("n") => {
                if service.next()? == NextStep::FinishRequested && confirm_finish(lines)? {
                    service.finish()?;
                    return Ok(LoopExit::Continue);
                }
            }
            Some("p") => {
                service.previous()?;
            }
            Some("g") => {
                let total = service.snapshot()?.total;
                match words.next().map(|w| parse_number::<usize>("g", w)) {
                    Some(Ok(number)) if (1..=total).contains(&number) => {
                        service.go_to(number - 1)?;
                    }
                    _ => println!("Uso: g <número de pregunta>"),
                }
            }
            Some("f") => {
                if confirm_finish(lines)? {
                    service.finish()?;
                    return Ok(LoopExit::Continue);
                }
            }
            Some("q") => return Ok(LoopExit::Quit),
            Some(_) => println!("Comando no reconocido."),
            None => {}
        }
    }
}

//
// ─── RESULTS & REVIEW ──────────────────────────────────────────────────────────
//

fn print_results(service: &ExamService) -> Result<(), Box<dyn std::error::Error>> {
    let summary = service.results()?;
    println!();
    println!("═══ Resultados ═══");
    println!("Calificación final: {}%", summary.score());
    println!(
        "Correctas {} · Incorrectas {} · Sin responder {} · Total {}",
        summary.correct(),
        summary.wrong(),
        summary.skipped(),
        summary.total()
    );
    println!(
        "Tipo: {} · Duración: {}",
        summary.kind().label(),
        timer::format_hms(summary.duration_seconds())
    );
    let modules: Vec<&str> = summary.modules().iter().map(|m| m.label()).collect();
    println!("Módulos: {}", modules.join(", "));

    if summary.score() >= 70 {
        println!("🎉 ¡Excelente! Has aprobado el examen");
    } else if summary.score() >= 60 {
        println!("⚠ Bien, pero puedes mejorar");
    } else {
        println!("📚 Necesitas estudiar más");
    }
    Ok(())
}

fn status_filter(keyword: &str) -> Option<StatusFilter> {
    match keyword {
        "todas" => Some(StatusFilter::All),
        "correctas" => Some(StatusFilter::Correct),
        "incorrectas" => Some(StatusFilter::Incorrect),
        "sin" => Some(StatusFilter::Unanswered),
        _ => None,
    }
}

fn print_review(
    service: &ExamService,
    filter: StatusFilter,
    area: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let entries = service.review_entries(filter, area)?;
    if entries.is_empty() {
        println!("No hay preguntas que coincidan con los filtros seleccionados.");
        return Ok(());
    }

    for entry in entries {
        let status = match entry.status {
            ReviewStatus::Correct => "✅ Correcta",
            ReviewStatus::Incorrect => "❌ Incorrecta",
            ReviewStatus::Unanswered => "⏭ Sin responder",
        };
        println!();
        println!(
            "Pregunta {} · {} · {}",
            entry.index + 1,
            entry.question.area(),
            status
        );
        println!("{}", entry.question.text());
        print_review_options(entry.question, entry.answer);
    }
    Ok(())
}

fn print_review_options(question: &QuestionRecord, answer: Option<usize>) {
    for (i, option) in question.options().iter().enumerate() {
        if question.is_correct(i) {
            println!("  ✅ {option} (respuesta correcta)");
        } else if answer == Some(i) {
            println!("  ❌ {option} (tu respuesta)");
        } else {
            println!("     {option}");
        }
    }
}

fn export_results(service: &ExamService) -> Result<(), Box<dyn std::error::Error>> {
    let stamp = service.now().format("%Y%m%d_%H%M%S");
    let json_name = format!("EXANI-II_Resultados_{stamp}.json");
    let csv_name = format!("EXANI-II_Resumen_{stamp}.csv");

    std::fs::write(&json_name, service.results_json()?)?;
    std::fs::write(&csv_name, service.summary_csv()?)?;

    println!("Resultados exportados: {json_name}, {csv_name}");
    Ok(())
}

fn results_loop(
    service: &mut ExamService,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<LoopExit, Box<dyn std::error::Error>> {
    print_results(service)?;

    loop {
        println!();
        println!("[r [todas|correctas|incorrectas|sin] [área] revisar · e exportar · n nuevo examen · q salir]");
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            return Ok(LoopExit::Quit);
        };
        let line = line.trim().to_string();
        let mut words = line.split_whitespace();

        match words.next() {
            Some("r") => {
                let filter = words
                    .next()
                    .and_then(|w| status_filter(&w.to_lowercase()))
                    .unwrap_or_default();
                let rest: Vec<&str> = words.collect();
                let area = (!rest.is_empty()).then(|| rest.join(" "));
                if let Some(area) = &area {
                    let known = service.review_areas()?;
                    if !known.contains(&area.as_str()) {
                        println!("Áreas disponibles: {}", known.join(", "));
                        continue;
                    }
                }
                print_review(service, filter, area.as_deref())?;
            }
            Some("e") => export_results(service)?,
            Some("n") => return Ok(LoopExit::Continue),
            Some("q") => return Ok(LoopExit::Quit),
            Some(_) => println!("Comando no reconocido."),
            None => {}
        }
    }
}

//
// ─── ENTRY POINT ───────────────────────────────────────────────────────────────
//

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let bank = load_bank(args.bank_path.as_deref())?;
    let config = args.config()?;
    let mut service = ExamService::new(Clock::default_clock(), bank, config);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        match args.seed {
            Some(seed) => service.start_with_rng(&mut StdRng::seed_from_u64(seed))?,
            None => service.start()?,
        }
        println!("🚀 ¡Examen iniciado! Buena suerte");

        if matches!(exam_loop(&mut service, &mut lines)?, LoopExit::Quit) {
            return Ok(());
        }
        if matches!(results_loop(&mut service, &mut lines)?, LoopExit::Quit) {
            return Ok(());
        }

        // "Nuevo examen": drop the session, keep the configuration.
        service.restart();
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_bank_parses_and_covers_every_module() {
        let bank = load_bank(None).unwrap();
        for module in ModuleId::ALL {
            assert!(
                !bank.questions(module).is_empty(),
                "module {module} has no questions"
            );
        }
    }

    #[test]
    fn args_default_to_the_kind_preset() {
        let mut argv = ["--kind", "ingles"].iter().map(ToString::to_string);
        let args = Args::parse(&mut argv).unwrap();
        let config = args.config().unwrap();

        assert_eq!(config.kind(), ExamKind::Ingles);
        assert_eq!(config.question_count(), 30);
        assert_eq!(config.time_limit_minutes(), 30);
    }

    #[test]
    fn args_override_preset_values() {
        let mut argv = [
            "--kind",
            "disciplinares",
            "--modules",
            "biologia,quimica",
            "--questions",
            "20",
            "--minutes",
            "45",
        ]
        .iter()
        .map(ToString::to_string);
        let args = Args::parse(&mut argv).unwrap();
        let config = args.config().unwrap();

        assert_eq!(config.modules(), &[ModuleId::Biologia, ModuleId::Quimica]);
        assert_eq!(config.question_count(), 20);
        assert_eq!(config.time_limit_minutes(), 45);
    }

    #[test]
    fn unknown_module_is_an_argument_error() {
        let mut argv = ["--modules", "astronomia"].iter().map(ToString::to_string);
        let err = Args::parse(&mut argv).unwrap_err();
        assert!(matches!(err, ArgsError::UnknownModule(_)));
    }
}
