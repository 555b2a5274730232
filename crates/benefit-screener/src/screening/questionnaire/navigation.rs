use super::steps::{AnswerField, QuestionStep, TOTAL_STEPS};
use serde::Serialize;

/// Presentation state derived after every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationView {
    pub current_step: usize,
    pub total_steps: usize,
    pub progress_percent: f64,
    pub active_field: AnswerField,
    pub prompt: &'static str,
    pub show_previous: bool,
    pub show_next: bool,
    pub show_submit: bool,
}

impl NavigationView {
    pub(crate) fn for_step(step: &QuestionStep) -> Self {
        let is_final = step.number == TOTAL_STEPS;
        Self {
            current_step: step.number,
            total_steps: TOTAL_STEPS,
            progress_percent: step.number as f64 / TOTAL_STEPS as f64 * 100.0,
            active_field: step.field,
            prompt: step.prompt,
            show_previous: step.number > 1,
            show_next: !is_final,
            show_submit: is_final,
        }
    }
}
