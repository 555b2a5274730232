//! Linear six-step questionnaire. The controller owns the draft answers and only hands out a
//! finalized [`UserResponses`] on submission.

mod navigation;
mod steps;

pub use navigation::NavigationView;
pub use steps::{AnswerField, ChoiceOption, InputKind, QuestionStep, TOTAL_STEPS};

use super::answers::{
    AgeBracket, AnswerForm, Circumstance, Circumstances, HousingStatus, IncomeLevel,
    UserResponses,
};
use std::collections::BTreeMap;
use tracing::debug;

pub const SELECTION_REQUIRED: &str = "Please select an option before continuing.";

/// Required selection missing on a step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("step {step} ({key}): {message}", key = .field.key())]
pub struct ValidationError {
    pub step: usize,
    pub field: AnswerField,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionnaireError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("answers can only be submitted from the final step (currently on step {current})")]
    NotAtFinalStep { current: usize },
    #[error("questionnaire already submitted; restart to answer again")]
    AlreadySubmitted,
    #[error("{} accepts multiple selections; toggle individual options instead", .0.key())]
    NotSingleChoice(AnswerField),
}

/// Outcome of a navigation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTransition {
    Moved { from: usize, to: usize },
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct QuestionnaireController {
    current_step: usize,
    selections: BTreeMap<AnswerField, String>,
    circumstances: Circumstances,
    submitted: bool,
}

impl Default for QuestionnaireController {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionnaireController {
    pub fn new() -> Self {
        Self {
            current_step: 1,
            selections: BTreeMap::new(),
            circumstances: Circumstances::new(),
            submitted: false,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn active_step(&self) -> &'static QuestionStep {
        QuestionStep::get(self.current_step).unwrap_or(&QuestionStep::all()[0])
    }

    pub fn view(&self) -> NavigationView {
        NavigationView::for_step(self.active_step())
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn selection(&self, field: AnswerField) -> Option<&str> {
        self.selections.get(&field).map(String::as_str)
    }

    pub fn circumstances(&self) -> &Circumstances {
        &self.circumstances
    }

    /// Record the choice for a single-choice field. A blank value clears it.
    pub fn select(&mut self, field: AnswerField, value: &str) -> Result<(), QuestionnaireError> {
        self.ensure_open()?;
        if !QuestionStep::for_field(field).requires_selection() {
            return Err(QuestionnaireError::NotSingleChoice(field));
        }

        if value.trim().is_empty() {
            self.selections.remove(&field);
        } else {
            self.selections.insert(field, value.to_string());
        }
        Ok(())
    }

    /// Flip one circumstance checkbox, keeping "none" exclusive of the others.
    /// Returns whether the tag is selected afterwards.
    pub fn toggle_circumstance(&mut self, tag: Circumstance) -> Result<bool, QuestionnaireError> {
        self.ensure_open()?;

        if self.circumstances.remove(&tag) {
            return Ok(false);
        }

        if tag == Circumstance::None {
            self.circumstances.clear();
        } else {
            self.circumstances.remove(&Circumstance::None);
        }
        self.circumstances.insert(tag);
        Ok(true)
    }

    pub fn validate_step(&self, number: usize) -> Result<(), ValidationError> {
        let Some(step) = QuestionStep::get(number) else {
            return Ok(());
        };

        if step.requires_selection() && !self.selections.contains_key(&step.field) {
            return Err(ValidationError {
                step: step.number,
                field: step.field,
                message: SELECTION_REQUIRED,
            });
        }

        Ok(())
    }

    pub fn advance(&mut self) -> Result<StepTransition, QuestionnaireError> {
        self.ensure_open()?;
        if self.current_step >= TOTAL_STEPS {
            return Ok(StepTransition::Unchanged);
        }

        self.validate_step(self.current_step)?;
        Ok(self.move_to(self.current_step + 1))
    }

    pub fn retreat(&mut self) -> Result<StepTransition, QuestionnaireError> {
        self.ensure_open()?;
        if self.current_step <= 1 {
            return Ok(StepTransition::Unchanged);
        }

        Ok(self.move_to(self.current_step - 1))
    }

    /// Finalize the answers. Only valid from the last step once every required field is set.
    pub fn submit(&mut self) -> Result<UserResponses, QuestionnaireError> {
        self.ensure_open()?;
        if self.current_step != TOTAL_STEPS {
            return Err(QuestionnaireError::NotAtFinalStep {
                current: self.current_step,
            });
        }

        self.validate_step(self.current_step)?;
        for number in 1..TOTAL_STEPS {
            self.validate_step(number)?;
        }

        let field = |field: AnswerField| self.selections.get(&field).map(String::as_str);
        let responses = UserResponses {
            age_bracket: field(AnswerField::Age).map(AgeBracket::parse),
            income_level: field(AnswerField::Income).map(IncomeLevel::parse),
            household: field(AnswerField::Household).map(str::to_string),
            employment: field(AnswerField::Employment).map(str::to_string),
            housing_status: field(AnswerField::Housing).map(HousingStatus::parse),
            circumstances: self.circumstances.clone().normalized(),
        };

        self.submitted = true;
        debug!("questionnaire submitted");
        Ok(responses)
    }

    /// Walk a fresh questionnaire through every step using a complete form.
    /// Stops at the first step whose required selection is missing.
    pub fn answer_all(&mut self, form: &AnswerForm) -> Result<UserResponses, QuestionnaireError> {
        self.restart();

        for step in QuestionStep::all() {
            let value = match step.field {
                AnswerField::Age => form.age.as_deref(),
                AnswerField::Income => form.income.as_deref(),
                AnswerField::Household => form.household.as_deref(),
                AnswerField::Employment => form.employment.as_deref(),
                AnswerField::Housing => form.housing.as_deref(),
                AnswerField::Circumstances => None,
            };

            if step.requires_selection() {
                self.select(step.field, value.unwrap_or_default())?;
                self.advance()?;
            } else {
                for tag in &form.circumstances {
                    self.circumstances.insert(Circumstance::parse(tag));
                }
            }
        }

        self.submit()
    }

    /// Discard every answer and return to the first step, from any state.
    pub fn restart(&mut self) {
        *self = Self::new();
        debug!("questionnaire restarted");
    }

    fn ensure_open(&self) -> Result<(), QuestionnaireError> {
        if self.submitted {
            Err(QuestionnaireError::AlreadySubmitted)
        } else {
            Ok(())
        }
    }

    fn move_to(&mut self, to: usize) -> StepTransition {
        let from = self.current_step;
        self.current_step = to.clamp(1, TOTAL_STEPS);
        debug!(from, to = self.current_step, "questionnaire step changed");
        StepTransition::Moved {
            from,
            to: self.current_step,
        }
    }
}
