use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Coarse age range chosen on the first step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgeBracket {
    Under18,
    Adult,
    Senior,
    Unrecognized(String),
}

impl AgeBracket {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "under18" => Self::Under18,
            "18-64" => Self::Adult,
            "65plus" => Self::Senior,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Under18 => "under18",
            Self::Adult => "18-64",
            Self::Senior => "65plus",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Inclusive age interval the bracket stands for; `None` when unrecognized.
    pub fn interval(&self) -> Option<(u32, u32)> {
        match self {
            Self::Under18 => Some((0, 17)),
            Self::Adult => Some((18, 64)),
            Self::Senior => Some((65, 120)),
            Self::Unrecognized(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IncomeLevel {
    Low,
    Moderate,
    High,
    Other(String),
}

impl IncomeLevel {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "low" => Self::Low,
            "moderate" => Self::Moderate,
            "high" => Self::High,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HousingStatus {
    Owner,
    Renter,
    Other(String),
}

impl HousingStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "owner" => Self::Owner,
            "renter" => Self::Renter,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Owner => "owner",
            Self::Renter => "renter",
            Self::Other(raw) => raw,
        }
    }
}

/// Special circumstance tag. `None` is the explicit "none of the above" answer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Circumstance {
    Disability,
    Veteran,
    None,
    Other(String),
}

impl Circumstance {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "disability" => Self::Disability,
            "veteran" => Self::Veteran,
            "none" => Self::None,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Disability => "disability",
            Self::Veteran => "veteran",
            Self::None => "none",
            Self::Other(raw) => raw,
        }
    }
}

macro_rules! string_backed {
    ($($ty:ident),+) => {
        $(
            impl From<String> for $ty {
                fn from(value: String) -> Self {
                    Self::parse(&value)
                }
            }

            impl From<&str> for $ty {
                fn from(value: &str) -> Self {
                    Self::parse(value)
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.as_str().to_string()
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

string_backed!(AgeBracket, IncomeLevel, HousingStatus, Circumstance);

/// Set of circumstance tags as selected by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Circumstances(BTreeSet<Circumstance>);

impl Circumstances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tag: &Circumstance) -> bool {
        self.0.contains(tag)
    }

    pub fn insert(&mut self, tag: Circumstance) -> bool {
        self.0.insert(tag)
    }

    pub fn remove(&mut self, tag: &Circumstance) -> bool {
        self.0.remove(tag)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `tag` counts for matching. A set holding "none" counts as empty.
    pub fn holds(&self, tag: &Circumstance) -> bool {
        !self.0.contains(&Circumstance::None) && self.0.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Circumstance> {
        self.0.iter()
    }

    /// Effective set used for matching: "none" excludes every other tag.
    pub fn normalized(self) -> Self {
        if self.0.contains(&Circumstance::None) {
            Self::default()
        } else {
            self
        }
    }
}

impl FromIterator<Circumstance> for Circumstances {
    fn from_iter<I: IntoIterator<Item = Circumstance>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for Circumstances {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(Circumstance::parse).collect()
    }
}

/// Finalized answers for one screening. Field names follow the questionnaire inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponses {
    #[serde(rename = "age", default)]
    pub age_bracket: Option<AgeBracket>,
    #[serde(rename = "income", default)]
    pub income_level: Option<IncomeLevel>,
    #[serde(default)]
    pub household: Option<String>,
    #[serde(default)]
    pub employment: Option<String>,
    #[serde(rename = "housing", default)]
    pub housing_status: Option<HousingStatus>,
    #[serde(default)]
    pub circumstances: Circumstances,
}

/// Raw form submission keyed by questionnaire field, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerForm {
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub income: Option<String>,
    #[serde(default)]
    pub household: Option<String>,
    #[serde(default)]
    pub employment: Option<String>,
    #[serde(default)]
    pub housing: Option<String>,
    #[serde(default)]
    pub circumstances: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn brackets_map_to_fixed_intervals() {
        assert_eq!(AgeBracket::parse("under18").interval(), Some((0, 17)));
        assert_eq!(AgeBracket::parse("18-64").interval(), Some((18, 64)));
        assert_eq!(AgeBracket::parse("65plus").interval(), Some((65, 120)));
        assert_eq!(AgeBracket::parse("forty").interval(), None);
    }

    #[test]
    fn unknown_values_are_kept_verbatim() {
        assert_eq!(IncomeLevel::parse("very-high").as_str(), "very-high");
        assert_eq!(
            HousingStatus::parse("shelter"),
            HousingStatus::Other("shelter".to_string())
        );
        assert_eq!(AgeBracket::parse("   ").as_str(), "   ");
    }

    #[test]
    fn values_compare_exactly() {
        assert_eq!(IncomeLevel::parse(" low "), IncomeLevel::Other(" low ".to_string()));
        assert_eq!(HousingStatus::parse("Owner"), HousingStatus::Other("Owner".to_string()));
        assert_eq!(AgeBracket::parse("65plus ").interval(), None);
    }

    #[test]
    fn none_clears_the_effective_circumstance_set() {
        let selected: Circumstances = ["veteran", "none"].into_iter().collect();
        assert!(!selected.holds(&Circumstance::Veteran));
        assert!(selected.normalized().is_empty());

        let selected: Circumstances = ["veteran", "disability"].into_iter().collect();
        assert!(selected.holds(&Circumstance::Disability));
        let effective = selected.normalized();
        assert!(effective.contains(&Circumstance::Veteran));
        assert!(effective.contains(&Circumstance::Disability));
    }

    #[test]
    fn responses_deserialize_from_form_field_names() {
        let responses: UserResponses = serde_json::from_value(json!({
            "age": "65plus",
            "income": "low",
            "household": "single",
            "housing": "owner",
            "circumstances": ["disability"]
        }))
        .expect("responses parse");

        assert_eq!(responses.age_bracket, Some(AgeBracket::Senior));
        assert_eq!(responses.income_level, Some(IncomeLevel::Low));
        assert_eq!(responses.employment, None);
        assert_eq!(responses.housing_status, Some(HousingStatus::Owner));
        assert!(responses.circumstances.contains(&Circumstance::Disability));

        let value = serde_json::to_value(&responses).expect("responses serialize");
        assert_eq!(value["age"], json!("65plus"));
        assert_eq!(value["circumstances"], json!(["disability"]));
    }
}
