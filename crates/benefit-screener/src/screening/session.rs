use super::answers::UserResponses;
use super::catalog::{BenefitCatalog, BenefitRecord, CatalogError};
use super::eligibility::EligibilityMatcher;
use super::questionnaire::{QuestionnaireController, QuestionnaireError};
use super::render::ResultRenderer;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// Result of one completed screening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningOutcome {
    pub answers: UserResponses,
    pub matches: Vec<BenefitRecord>,
    pub catalog_size: usize,
    pub screened_at: DateTime<Utc>,
}

impl ScreeningOutcome {
    pub fn evaluate(catalog: &BenefitCatalog, answers: UserResponses) -> Self {
        let matches = EligibilityMatcher::new()
            .matches(catalog.records(), &answers)
            .into_iter()
            .cloned()
            .collect();

        Self {
            answers,
            matches,
            catalog_size: catalog.len(),
            screened_at: Utc::now(),
        }
    }

    pub fn render(&self, renderer: &dyn ResultRenderer) -> String {
        renderer.render(&self.matches)
    }
}

/// Which part of the screener is currently showing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum ScreeningSection {
    Loading,
    LoadFailed { message: String },
    Questionnaire,
    Results { outcome: ScreeningOutcome },
}

impl ScreeningSection {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::LoadFailed { .. } => "error",
            Self::Questionnaire => "questionnaire",
            Self::Results { .. } => "results",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Questionnaire(#[from] QuestionnaireError),
    #[error("benefit catalog is not loaded")]
    CatalogUnavailable,
    #[error("action requires the {expected} section but the session is showing {actual}")]
    WrongSection {
        expected: &'static str,
        actual: &'static str,
    },
}

/// One user's run through the screener: catalog load, questionnaire, and results.
#[derive(Debug)]
pub struct ScreeningSession {
    section: ScreeningSection,
    catalog: Option<BenefitCatalog>,
    controller: QuestionnaireController,
}

impl Default for ScreeningSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreeningSession {
    pub fn new() -> Self {
        Self {
            section: ScreeningSection::Loading,
            catalog: None,
            controller: QuestionnaireController::new(),
        }
    }

    /// Session with an already loaded catalog, starting on the questionnaire.
    pub fn with_catalog(catalog: BenefitCatalog) -> Self {
        let mut session = Self::new();
        session.finish_load(Ok(catalog));
        session
    }

    pub fn section(&self) -> &ScreeningSection {
        &self.section
    }

    pub fn catalog(&self) -> Option<&BenefitCatalog> {
        self.catalog.as_ref()
    }

    pub fn controller(&self) -> &QuestionnaireController {
        &self.controller
    }

    /// Exclusive handle on the questionnaire, available while it is showing.
    pub fn controller_mut(&mut self) -> Result<&mut QuestionnaireController, SessionError> {
        self.expect_section("questionnaire")?;
        Ok(&mut self.controller)
    }

    pub fn begin_load(&mut self) {
        self.section = ScreeningSection::Loading;
    }

    /// Apply a load completion. Failures drop any previous catalog.
    pub fn finish_load(&mut self, result: Result<BenefitCatalog, CatalogError>) -> &ScreeningSection {
        match result {
            Ok(catalog) => {
                info!(records = catalog.len(), "screening session ready");
                self.catalog = Some(catalog);
                self.section = ScreeningSection::Questionnaire;
            }
            Err(err) => {
                warn!(error = %err, "benefit catalog failed to load");
                self.catalog = None;
                self.section = ScreeningSection::LoadFailed {
                    message: err.to_string(),
                };
            }
        }
        &self.section
    }

    pub fn retry_load<F>(&mut self, loader: F) -> &ScreeningSection
    where
        F: FnOnce() -> Result<BenefitCatalog, CatalogError>,
    {
        self.begin_load();
        self.finish_load(loader())
    }

    /// Finalize the questionnaire, match it against the catalog, and show the results.
    pub fn submit(&mut self) -> Result<ScreeningOutcome, SessionError> {
        self.expect_section("questionnaire")?;
        let catalog = self
            .catalog
            .as_ref()
            .ok_or(SessionError::CatalogUnavailable)?;

        let answers = self.controller.submit()?;
        let outcome = ScreeningOutcome::evaluate(catalog, answers);
        info!(
            matched = outcome.matches.len(),
            catalog = outcome.catalog_size,
            "screening submitted"
        );

        self.section = ScreeningSection::Results {
            outcome: outcome.clone(),
        };
        Ok(outcome)
    }

    pub fn outcome(&self) -> Option<&ScreeningOutcome> {
        match &self.section {
            ScreeningSection::Results { outcome } => Some(outcome),
            _ => None,
        }
    }

    /// Clear every answer and return to the first question. The catalog is kept.
    pub fn restart(&mut self) {
        self.controller.restart();
        if self.catalog.is_some() {
            self.section = ScreeningSection::Questionnaire;
        }
    }

    fn expect_section(&self, expected: &'static str) -> Result<(), SessionError> {
        let actual = self.section.name();
        if actual == expected {
            Ok(())
        } else {
            Err(SessionError::WrongSection { expected, actual })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::answers::Circumstance;
    use crate::screening::questionnaire::AnswerField;
    use crate::screening::render::TextRenderer;

    fn catalog() -> BenefitCatalog {
        BenefitCatalog::new(vec![
            BenefitRecord::named("Library Card"),
            BenefitRecord {
                veteran_required: true,
                ..BenefitRecord::named("Veterans Pension")
            },
        ])
    }

    fn complete_questionnaire(session: &mut ScreeningSession) {
        let controller = session.controller_mut().expect("questionnaire showing");
        let picks = [
            (AnswerField::Age, "65plus"),
            (AnswerField::Income, "moderate"),
            (AnswerField::Household, "couple"),
            (AnswerField::Employment, "retired"),
            (AnswerField::Housing, "renter"),
        ];
        for (field, value) in picks {
            controller.select(field, value).expect("select");
            controller.advance().expect("advance");
        }
    }

    #[test]
    fn starts_loading_and_moves_to_questionnaire() {
        let mut session = ScreeningSession::new();
        assert_eq!(session.section(), &ScreeningSection::Loading);
        assert!(session.controller_mut().is_err());

        session.finish_load(Ok(catalog()));
        assert_eq!(session.section(), &ScreeningSection::Questionnaire);
        assert_eq!(session.catalog().map(BenefitCatalog::len), Some(2));
    }

    #[test]
    fn load_failure_shows_error_and_retry_recovers() {
        let mut session = ScreeningSession::with_catalog(catalog());
        let failed = session.retry_load(|| {
            Err(CatalogError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "benefits-data.csv missing",
            )))
        });

        assert!(matches!(failed, ScreeningSection::LoadFailed { message } if message.contains("missing")));
        assert!(session.catalog().is_none(), "no stale data is kept");
        assert!(matches!(
            session.submit(),
            Err(SessionError::WrongSection { actual: "error", .. })
        ));

        session.retry_load(|| Ok(catalog()));
        assert_eq!(session.section(), &ScreeningSection::Questionnaire);
    }

    #[test]
    fn submit_matches_and_shows_results() {
        let mut session = ScreeningSession::with_catalog(catalog());
        complete_questionnaire(&mut session);
        session
            .controller_mut()
            .expect("questionnaire")
            .toggle_circumstance(Circumstance::Veteran)
            .expect("toggle");

        let outcome = session.submit().expect("submits");
        let names: Vec<&str> = outcome.matches.iter().map(BenefitRecord::display_name).collect();
        assert_eq!(names, vec!["Library Card", "Veterans Pension"]);
        assert_eq!(outcome.catalog_size, 2);

        assert_eq!(session.section().name(), "results");
        let rendered = session
            .outcome()
            .expect("outcome kept")
            .render(&TextRenderer);
        assert!(rendered.starts_with("1. Library Card"));
    }

    #[test]
    fn validation_failure_keeps_questionnaire_open() {
        let mut session = ScreeningSession::with_catalog(catalog());

        let err = session.submit().expect_err("not at final step");
        assert!(matches!(
            err,
            SessionError::Questionnaire(QuestionnaireError::NotAtFinalStep { current: 1 })
        ));
        assert_eq!(session.section(), &ScreeningSection::Questionnaire);
    }

    #[test]
    fn restart_returns_to_empty_questionnaire() {
        let mut session = ScreeningSession::with_catalog(catalog());
        complete_questionnaire(&mut session);
        session.submit().expect("submits");

        session.restart();

        assert_eq!(session.section(), &ScreeningSection::Questionnaire);
        assert!(session.outcome().is_none());
        assert_eq!(session.controller().current_step(), 1);
        assert_eq!(session.controller().selection(AnswerField::Age), None);
    }
}
