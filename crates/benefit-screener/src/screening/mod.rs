//! Questionnaire, catalog, and eligibility matching for benefit screening.

pub mod answers;
pub mod catalog;
pub mod eligibility;
pub mod questionnaire;
pub mod render;
pub mod session;

pub use answers::{
    AgeBracket, AnswerForm, Circumstance, Circumstances, HousingStatus, IncomeLevel, UserResponses,
};
pub use catalog::{BenefitCatalog, BenefitRecord, CatalogError};
pub use eligibility::{match_records, EligibilityAxis, EligibilityMatcher, EligibilityVerdict};
pub use questionnaire::{
    AnswerField, ChoiceOption, InputKind, NavigationView, QuestionStep, QuestionnaireController,
    QuestionnaireError, StepTransition, ValidationError, TOTAL_STEPS,
};
pub use render::{HtmlCardRenderer, ResultRenderer, TextRenderer};
pub use session::{ScreeningOutcome, ScreeningSection, ScreeningSession, SessionError};
