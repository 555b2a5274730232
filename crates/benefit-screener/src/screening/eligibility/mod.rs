mod criteria;

use super::answers::UserResponses;
use super::catalog::BenefitRecord;
use serde::Serialize;
use tracing::debug;

/// Independent gating dimension checked for every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityAxis {
    Age,
    Income,
    Housing,
    Circumstances,
}

impl EligibilityAxis {
    pub const fn ordered() -> [Self; 4] {
        [Self::Age, Self::Income, Self::Housing, Self::Circumstances]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Income => "income",
            Self::Housing => "housing",
            Self::Circumstances => "special circumstances",
        }
    }

    fn passes(self, record: &BenefitRecord, answers: &UserResponses) -> bool {
        match self {
            Self::Age => criteria::age_eligible(record, answers),
            Self::Income => criteria::income_eligible(record, answers),
            Self::Housing => criteria::housing_eligible(record, answers),
            Self::Circumstances => criteria::circumstances_eligible(record, answers),
        }
    }
}

/// Per-axis result for one record, listing the axes that disqualified it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EligibilityVerdict {
    pub failed: Vec<EligibilityAxis>,
}

impl EligibilityVerdict {
    pub fn is_eligible(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            "eligible".to_string()
        } else {
            let axes: Vec<&str> = self.failed.iter().map(|axis| axis.label()).collect();
            format!("not eligible: {}", axes.join(", "))
        }
    }
}

/// Stateless matcher applying the four eligibility axes.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityMatcher;

impl EligibilityMatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, record: &BenefitRecord, answers: &UserResponses) -> EligibilityVerdict {
        let failed = EligibilityAxis::ordered()
            .into_iter()
            .filter(|axis| !axis.passes(record, answers))
            .collect();

        EligibilityVerdict { failed }
    }

    pub fn is_eligible(&self, record: &BenefitRecord, answers: &UserResponses) -> bool {
        EligibilityAxis::ordered()
            .into_iter()
            .all(|axis| axis.passes(record, answers))
    }

    /// Verdict for every record, in catalog order.
    pub fn explain<'a>(
        &self,
        records: &'a [BenefitRecord],
        answers: &UserResponses,
    ) -> Vec<(&'a BenefitRecord, EligibilityVerdict)> {
        records
            .iter()
            .map(|record| (record, self.evaluate(record, answers)))
            .collect()
    }

    /// Stable filter: matches keep their catalog order.
    pub fn matches<'a>(
        &self,
        records: &'a [BenefitRecord],
        answers: &UserResponses,
    ) -> Vec<&'a BenefitRecord> {
        let matched: Vec<&BenefitRecord> = records
            .iter()
            .filter(|record| self.is_eligible(record, answers))
            .collect();

        debug!(
            candidates = records.len(),
            matched = matched.len(),
            "eligibility matching complete"
        );

        matched
    }
}

/// Returns the records eligible for `answers`, in input order.
pub fn match_records(records: &[BenefitRecord], answers: &UserResponses) -> Vec<BenefitRecord> {
    EligibilityMatcher::new()
        .matches(records, answers)
        .into_iter()
        .cloned()
        .collect()
}
