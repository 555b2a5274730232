use benefit_screener::config::AppConfig;
use benefit_screener::error::AppError;
use benefit_screener::screening::{
    AnswerForm, BenefitCatalog, EligibilityAxis, EligibilityMatcher, HtmlCardRenderer,
    QuestionnaireController, ResultRenderer, ScreeningOutcome, TextRenderer, UserResponses,
};
use benefit_screener::telemetry;
use clap::Args;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScreenArgs {
    /// Benefit catalog CSV (defaults to SCREENER_CATALOG_PATH or data/benefits-data.csv)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Age bracket: under18, 18-64, or 65plus
    #[arg(long)]
    pub(crate) age: Option<String>,
    /// Income level: low, moderate, or high
    #[arg(long)]
    pub(crate) income: Option<String>,
    /// Household composition
    #[arg(long)]
    pub(crate) household: Option<String>,
    /// Employment status
    #[arg(long)]
    pub(crate) employment: Option<String>,
    /// Housing status: owner, renter, or other
    #[arg(long)]
    pub(crate) housing: Option<String>,
    /// Special circumstance (repeatable): disability, veteran, or none
    #[arg(long = "circumstance")]
    pub(crate) circumstances: Vec<String>,
    /// Print HTML benefit cards instead of a text listing
    #[arg(long, conflicts_with = "json")]
    pub(crate) html: bool,
    /// Print the full screening outcome as JSON
    #[arg(long)]
    pub(crate) json: bool,
    /// Also report, for every catalog record, which checks it failed
    #[arg(long, conflicts_with = "html")]
    pub(crate) explain: bool,
}

#[derive(Debug, Serialize)]
struct RecordVerdict<'a> {
    service: &'a str,
    eligible: bool,
    failed: Vec<EligibilityAxis>,
    summary: String,
}

#[derive(Debug, Serialize)]
struct ExplainedOutcome<'a> {
    #[serde(flatten)]
    outcome: &'a ScreeningOutcome,
    verdicts: Vec<RecordVerdict<'a>>,
}

impl ScreenArgs {
    fn form(&self) -> AnswerForm {
        AnswerForm {
            age: self.age.clone(),
            income: self.income.clone(),
            household: self.household.clone(),
            employment: self.employment.clone(),
            housing: self.housing.clone(),
            circumstances: self.circumstances.clone(),
        }
    }
}

pub(crate) fn run_screen(args: ScreenArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let path = args.catalog.clone().unwrap_or(config.catalog.path);
    let catalog = BenefitCatalog::from_path(&path)?;
    let output = screen(&catalog, &args)?;
    print!("{output}");
    Ok(())
}

pub(crate) fn screen(catalog: &BenefitCatalog, args: &ScreenArgs) -> Result<String, AppError> {
    let answers = QuestionnaireController::new().answer_all(&args.form())?;
    let outcome = ScreeningOutcome::evaluate(catalog, answers);

    if args.json {
        let mut rendered = if args.explain {
            let explained = ExplainedOutcome {
                outcome: &outcome,
                verdicts: verdicts(catalog, &outcome.answers),
            };
            serde_json::to_string_pretty(&explained)
        } else {
            serde_json::to_string_pretty(&outcome)
        }
        .map_err(|err| AppError::Io(err.into()))?;
        rendered.push('\n');
        return Ok(rendered);
    }

    let renderer: &dyn ResultRenderer = if args.html {
        &HtmlCardRenderer
    } else {
        &TextRenderer
    };
    let mut rendered = outcome.render(renderer);

    if args.explain {
        rendered.push_str("\nEligibility by program:\n");
        for verdict in verdicts(catalog, &outcome.answers) {
            writeln!(rendered, "  {}: {}", verdict.service, verdict.summary)
                .expect("verdict line");
        }
    }

    Ok(rendered)
}

fn verdicts<'a>(catalog: &'a BenefitCatalog, answers: &UserResponses) -> Vec<RecordVerdict<'a>> {
    EligibilityMatcher::new()
        .explain(catalog.records(), answers)
        .into_iter()
        .map(|(record, verdict)| RecordVerdict {
            service: record.display_name(),
            eligible: verdict.is_eligible(),
            summary: verdict.summary(),
            failed: verdict.failed,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use benefit_screener::screening::BenefitRecord;

    fn args() -> ScreenArgs {
        ScreenArgs {
            catalog: None,
            age: Some("18-64".to_string()),
            income: Some("moderate".to_string()),
            household: Some("family".to_string()),
            employment: Some("unemployed".to_string()),
            housing: Some("renter".to_string()),
            circumstances: vec!["disability".to_string()],
            html: false,
            json: false,
            explain: false,
        }
    }

    fn catalog() -> BenefitCatalog {
        BenefitCatalog::new(vec![
            BenefitRecord {
                disability_required: true,
                ..BenefitRecord::named("Paratransit Rides")
            },
            BenefitRecord {
                own_housing_required: true,
                ..BenefitRecord::named("Homestead Credit")
            },
        ])
    }

    #[test]
    fn text_output_lists_matches() {
        let output = screen(&catalog(), &args()).expect("screening succeeds");
        assert!(output.starts_with("1. Paratransit Rides"));
        assert!(!output.contains("Homestead Credit"));
    }

    #[test]
    fn json_output_includes_answers() {
        let mut args = args();
        args.json = true;

        let output = screen(&catalog(), &args).expect("screening succeeds");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(value["answers"]["housing"], "renter");
        assert_eq!(value["matches"][0]["service"], "Paratransit Rides");
    }

    #[test]
    fn explain_lists_failed_checks_per_program() {
        let mut args = args();
        args.explain = true;

        let output = screen(&catalog(), &args).expect("screening succeeds");
        assert!(output.contains("Eligibility by program:"));
        assert!(output.contains("  Paratransit Rides: eligible\n"));
        assert!(output.contains("  Homestead Credit: not eligible: housing\n"));
    }

    #[test]
    fn explain_adds_verdicts_to_json() {
        let mut args = args();
        args.json = true;
        args.explain = true;

        let output = screen(&catalog(), &args).expect("screening succeeds");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(value["matches"][0]["service"], "Paratransit Rides");
        assert_eq!(value["verdicts"][0]["eligible"], true);
        assert_eq!(value["verdicts"][1]["service"], "Homestead Credit");
        assert_eq!(value["verdicts"][1]["failed"], serde_json::json!(["housing"]));
    }

    #[test]
    fn missing_answer_is_reported() {
        let mut args = args();
        args.housing = None;

        let err = screen(&catalog(), &args).expect_err("housing required");
        assert!(err.to_string().contains("step 5 (housing)"));
    }
}
