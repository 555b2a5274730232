use benefit_screener::config::AppConfig;
use benefit_screener::error::AppError;
use benefit_screener::screening::{
    BenefitCatalog, CatalogError, Circumstance, InputKind, QuestionnaireError, ScreeningSection,
    ScreeningSession, StepTransition, TextRenderer,
};
use benefit_screener::telemetry;
use clap::Args;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct InterviewArgs {
    /// Benefit catalog CSV (defaults to SCREENER_CATALOG_PATH or data/benefits-data.csv)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) fn run_interview_command(args: InterviewArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let path = args.catalog.unwrap_or(config.catalog.path);
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_interview(
        || BenefitCatalog::from_path(&path),
        stdin.lock(),
        stdout.lock(),
    )?;
    Ok(())
}

enum Command {
    Next,
    Back,
    Submit,
    Restart,
    Retry,
    Quit,
    Choice(String),
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let command = match line.trim().to_ascii_lowercase().as_str() {
            "" => return None,
            "n" | "next" => Self::Next,
            "b" | "back" => Self::Back,
            "s" | "submit" => Self::Submit,
            "r" | "restart" => Self::Restart,
            "retry" => Self::Retry,
            "q" | "quit" | "exit" => Self::Quit,
            other => Self::Choice(other.to_string()),
        };
        Some(command)
    }
}

/// Drive a screening session from line-oriented input until the user quits or input ends.
pub(crate) fn run_interview<L, R, W>(loader: L, mut input: R, mut out: W) -> io::Result<()>
where
    L: Fn() -> Result<BenefitCatalog, CatalogError>,
    R: BufRead,
    W: Write,
{
    let mut session = ScreeningSession::new();
    session.retry_load(&loader);

    loop {
        match session.section().clone() {
            ScreeningSection::Loading => {
                session.retry_load(&loader);
                continue;
            }
            ScreeningSection::LoadFailed { message } => {
                writeln!(out, "Unable to load benefit information: {message}")?;
                writeln!(out, "Type 'retry' to try again or 'quit' to exit.")?;
            }
            ScreeningSection::Questionnaire => write_step(&session, &mut out)?,
            ScreeningSection::Results { outcome } => {
                writeln!(out, "\nBenefits you may be eligible for:")?;
                write!(out, "{}", outcome.render(&TextRenderer))?;
                writeln!(out, "Type 'restart' to answer again or 'quit' to exit.")?;
            }
        }
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        match (session.section().name(), command) {
            (_, Command::Quit) => return Ok(()),
            ("error", Command::Retry) => {
                session.retry_load(&loader);
            }
            (_, Command::Restart) => session.restart(),
            ("questionnaire", command) => handle_question(&mut session, command, &mut out)?,
            _ => writeln!(out, "That command is not available right now.")?,
        }
    }
}

fn handle_question<W: Write>(
    session: &mut ScreeningSession,
    command: Command,
    out: &mut W,
) -> io::Result<()> {
    if let Command::Submit = command {
        if let Err(err) = session.submit() {
            writeln!(out, "{}", warning(&err.to_string()))?;
        }
        return Ok(());
    }

    let Ok(controller) = session.controller_mut() else {
        return Ok(());
    };

    match command {
        Command::Next => match controller.advance() {
            Ok(StepTransition::Moved { .. }) => {}
            Ok(StepTransition::Unchanged) => {
                writeln!(out, "This is the last question. Type 'submit' to see your results.")?;
            }
            Err(QuestionnaireError::Validation(err)) => writeln!(out, "{}", warning(err.message))?,
            Err(err) => writeln!(out, "{}", warning(&err.to_string()))?,
        },
        Command::Back => {
            if let Ok(StepTransition::Unchanged) = controller.retreat() {
                writeln!(out, "You are already on the first question.")?;
            }
        }
        Command::Choice(raw) => {
            let step = controller.active_step();
            let option = raw
                .parse::<usize>()
                .ok()
                .and_then(|index| index.checked_sub(1))
                .and_then(|index| step.options.get(index))
                .or_else(|| step.option(&raw));

            let Some(option) = option else {
                writeln!(out, "{}", warning("Please choose one of the listed options."))?;
                return Ok(());
            };

            let result = match step.kind {
                InputKind::SingleChoice => controller.select(step.field, option.value),
                InputKind::MultiChoice => controller
                    .toggle_circumstance(Circumstance::parse(option.value))
                    .map(|_| ()),
            };
            if let Err(err) = result {
                writeln!(out, "{}", warning(&err.to_string()))?;
            }
        }
        Command::Submit | Command::Restart | Command::Retry | Command::Quit => {}
    }

    Ok(())
}

fn write_step<W: Write>(session: &ScreeningSession, out: &mut W) -> io::Result<()> {
    let controller = session.controller();
    let view = controller.view();
    let step = controller.active_step();

    writeln!(
        out,
        "\nQuestion {} of {} ({:.0}%)",
        view.current_step, view.total_steps, view.progress_percent
    )?;
    writeln!(out, "{}", view.prompt)?;

    for (index, option) in step.options.iter().enumerate() {
        let chosen = match step.kind {
            InputKind::SingleChoice => controller.selection(step.field) == Some(option.value),
            InputKind::MultiChoice => controller
                .circumstances()
                .contains(&Circumstance::parse(option.value)),
        };
        let marker = if chosen { "x" } else { " " };
        writeln!(out, "  {}) [{marker}] {}", index + 1, option.label)?;
    }

    let mut actions = Vec::new();
    if view.show_previous {
        actions.push("back");
    }
    if view.show_next {
        actions.push("next");
    }
    if view.show_submit {
        actions.push("submit");
    }
    actions.extend(["restart", "quit"]);
    writeln!(out, "Enter an option number, or: {}", actions.join(", "))
}

fn warning(message: &str) -> String {
    format!("! {message}")
}
