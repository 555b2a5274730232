use crate::interview::{run_interview_command, InterviewArgs};
use crate::screen::{run_screen, ScreenArgs};
use crate::server;
use benefit_screener::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Benefit Screener",
    about = "Match questionnaire answers against a catalog of benefit programs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Screen a single set of answers given as flags and print the matches
    Screen(ScreenArgs),
    /// Walk through the questionnaire interactively in the terminal
    Interview(InterviewArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the benefit catalog CSV path
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Screen(args) => run_screen(args),
        Command::Interview(args) => run_interview_command(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_flags_parse_repeated_circumstances() {
        let cli = Cli::try_parse_from([
            "benefit-screener",
            "screen",
            "--age",
            "65plus",
            "--income",
            "low",
            "--household",
            "single",
            "--employment",
            "retired",
            "--housing",
            "owner",
            "--circumstance",
            "disability",
            "--circumstance",
            "veteran",
            "--html",
        ])
        .expect("flags parse");

        match cli.command {
            Some(Command::Screen(args)) => {
                assert_eq!(args.age.as_deref(), Some("65plus"));
                assert_eq!(args.circumstances, vec!["disability", "veteran"]);
                assert!(args.html);
                assert!(args.catalog.is_none());
            }
            other => panic!("expected screen command, got {other:?}"),
        }
    }

    #[test]
    fn explain_cannot_be_combined_with_html() {
        let result = Cli::try_parse_from(["benefit-screener", "screen", "--explain", "--html"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["benefit-screener", "screen", "--explain", "--json"])
            .expect("flags parse");
        match cli.command {
            Some(Command::Screen(args)) => assert!(args.explain && args.json),
            other => panic!("expected screen command, got {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["benefit-screener"]).expect("parses");
        assert!(cli.command.is_none());
    }
}
