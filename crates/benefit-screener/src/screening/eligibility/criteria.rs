use super::super::answers::{Circumstance, HousingStatus, IncomeLevel, UserResponses};
use super::super::catalog::BenefitRecord;

pub(crate) fn age_eligible(record: &BenefitRecord, answers: &UserResponses) -> bool {
    if !record.age_restricted {
        return true;
    }

    let Some((user_min, user_max)) = answers.age_bracket.as_ref().and_then(|b| b.interval())
    else {
        return false;
    };

    if record.age_min.is_some_and(|min| i64::from(user_max) < min) {
        return false;
    }
    if record.age_max.is_some_and(|max| i64::from(user_min) > max) {
        return false;
    }

    true
}

pub(crate) fn income_eligible(record: &BenefitRecord, answers: &UserResponses) -> bool {
    if !record.income_restricted {
        return true;
    }

    matches!(
        answers.income_level,
        Some(IncomeLevel::Low | IncomeLevel::Moderate)
    )
}

pub(crate) fn housing_eligible(record: &BenefitRecord, answers: &UserResponses) -> bool {
    if !record.own_housing_required {
        return true;
    }

    answers.housing_status == Some(HousingStatus::Owner)
}

pub(crate) fn circumstances_eligible(record: &BenefitRecord, answers: &UserResponses) -> bool {
    let held = &answers.circumstances;

    if record.disability_required && !held.holds(&Circumstance::Disability) {
        return false;
    }
    if record.veteran_required && !held.holds(&Circumstance::Veteran) {
        return false;
    }

    true
}
