use super::BenefitRecord;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use tracing::warn;

const FLAG_SET: &str = "TRUE";

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<BenefitRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let row = row?;
        records.push(row.into_record(index + 1));
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Service", default, deserialize_with = "empty_string_as_none")]
    service: Option<String>,
    #[serde(
        rename = "Description",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    description: Option<String>,
    #[serde(rename = "URL", default, deserialize_with = "empty_string_as_none")]
    url: Option<String>,
    #[serde(
        rename = "Department",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    department: Option<String>,
    #[serde(rename = "Age", default, deserialize_with = "empty_string_as_none")]
    age: Option<String>,
    #[serde(rename = "Age Min", default, deserialize_with = "empty_string_as_none")]
    age_min: Option<String>,
    #[serde(rename = "Age Max", default, deserialize_with = "empty_string_as_none")]
    age_max: Option<String>,
    #[serde(rename = "Income", default, deserialize_with = "empty_string_as_none")]
    income: Option<String>,
    #[serde(
        rename = "Own_Housing",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    own_housing: Option<String>,
    #[serde(
        rename = "Disability",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    disability: Option<String>,
    #[serde(rename = "Veteran", default, deserialize_with = "empty_string_as_none")]
    veteran: Option<String>,
}

impl CatalogRow {
    fn into_record(self, row: usize) -> BenefitRecord {
        BenefitRecord {
            age_restricted: is_set(&self.age),
            age_min: parse_bound(self.age_min.as_deref(), "Age Min", row),
            age_max: parse_bound(self.age_max.as_deref(), "Age Max", row),
            income_restricted: is_set(&self.income),
            own_housing_required: is_set(&self.own_housing),
            disability_required: is_set(&self.disability),
            veteran_required: is_set(&self.veteran),
            service: self.service,
            description: self.description,
            url: self.url,
            department: self.department,
        }
    }
}

fn is_set(flag: &Option<String>) -> bool {
    flag.as_deref() == Some(FLAG_SET)
}

/// Reads an optional sign and the leading run of digits, so "18 years" yields 18,
/// "-3" yields -3 and "n/a" yields nothing. Values past `i64` saturate.
fn parse_bound(raw: Option<&str>, column: &'static str, row: usize) -> Option<i64> {
    let raw = raw?;
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];

    if digits.is_empty() {
        warn!(row, column, value = raw, "ignoring unparsable age bound");
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bound_reads_leading_digits() {
        assert_eq!(parse_bound(Some("64"), "Age Max", 1), Some(64));
        assert_eq!(parse_bound(Some("+21"), "Age Min", 1), Some(21));
        assert_eq!(parse_bound(Some("17.5"), "Age Max", 1), Some(17));
        assert_eq!(parse_bound(Some("-3"), "Age Min", 1), Some(-3));
        assert_eq!(parse_bound(Some("99999999999"), "Age Min", 1), Some(99_999_999_999));
        assert_eq!(
            parse_bound(Some("999999999999999999999"), "Age Min", 1),
            Some(i64::MAX)
        );
        assert_eq!(parse_bound(Some("-"), "Age Min", 1), None);
        assert_eq!(parse_bound(Some("unknown"), "Age Min", 1), None);
        assert_eq!(parse_bound(None, "Age Min", 1), None);
    }
}
