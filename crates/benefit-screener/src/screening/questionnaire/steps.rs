use serde::Serialize;

pub const TOTAL_STEPS: usize = 6;

/// Answer slot filled by a questionnaire step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerField {
    Age,
    Income,
    Household,
    Employment,
    Housing,
    Circumstances,
}

impl AnswerField {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Income => "income",
            Self::Household => "household",
            Self::Employment => "employment",
            Self::Housing => "housing",
            Self::Circumstances => "circumstances",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Exactly one option must be chosen before leaving the step.
    SingleChoice,
    /// Any subset, including none, is acceptable.
    MultiChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionStep {
    pub number: usize,
    pub field: AnswerField,
    pub prompt: &'static str,
    pub kind: InputKind,
    pub options: &'static [ChoiceOption],
}

impl QuestionStep {
    pub fn requires_selection(&self) -> bool {
        self.kind == InputKind::SingleChoice
    }

    pub fn option(&self, value: &str) -> Option<&'static ChoiceOption> {
        self.options.iter().find(|option| option.value == value)
    }

    /// Step definition for a 1-based step number.
    pub fn get(number: usize) -> Option<&'static QuestionStep> {
        number
            .checked_sub(1)
            .and_then(|index| QUESTION_STEPS.get(index))
    }

    pub fn for_field(field: AnswerField) -> &'static QuestionStep {
        &QUESTION_STEPS[field as usize]
    }

    pub fn all() -> &'static [QuestionStep; TOTAL_STEPS] {
        &QUESTION_STEPS
    }
}

const fn choice(value: &'static str, label: &'static str) -> ChoiceOption {
    ChoiceOption { value, label }
}

static QUESTION_STEPS: [QuestionStep; TOTAL_STEPS] = [
    QuestionStep {
        number: 1,
        field: AnswerField::Age,
        prompt: "What is your age?",
        kind: InputKind::SingleChoice,
        options: &[
            choice("under18", "Under 18"),
            choice("18-64", "18 to 64"),
            choice("65plus", "65 or older"),
        ],
    },
    QuestionStep {
        number: 2,
        field: AnswerField::Income,
        prompt: "How would you describe your household income?",
        kind: InputKind::SingleChoice,
        options: &[
            choice("low", "Low income"),
            choice("moderate", "Moderate income"),
            choice("high", "Higher income"),
        ],
    },
    QuestionStep {
        number: 3,
        field: AnswerField::Household,
        prompt: "Who lives in your household?",
        kind: InputKind::SingleChoice,
        options: &[
            choice("single", "Just me"),
            choice("couple", "Me and a partner"),
            choice("family", "Family with children"),
            choice("other", "Other arrangement"),
        ],
    },
    QuestionStep {
        number: 4,
        field: AnswerField::Employment,
        prompt: "What is your employment status?",
        kind: InputKind::SingleChoice,
        options: &[
            choice("employed", "Employed"),
            choice("unemployed", "Unemployed"),
            choice("retired", "Retired"),
            choice("student", "Student"),
        ],
    },
    QuestionStep {
        number: 5,
        field: AnswerField::Housing,
        prompt: "What is your housing situation?",
        kind: InputKind::SingleChoice,
        options: &[
            choice("owner", "I own my home"),
            choice("renter", "I rent my home"),
            choice("other", "Other"),
        ],
    },
    QuestionStep {
        number: 6,
        field: AnswerField::Circumstances,
        prompt: "Do any of these circumstances apply to you?",
        kind: InputKind::MultiChoice,
        options: &[
            choice("disability", "I have a disability"),
            choice("veteran", "I am a veteran"),
            choice("none", "None of these"),
        ],
    },
];
