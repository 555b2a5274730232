mod parser;

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// One benefit program row. Gating flags default to unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitRecord {
    pub service: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub department: Option<String>,
    #[serde(default)]
    pub age_restricted: bool,
    #[serde(default)]
    pub age_min: Option<i64>,
    #[serde(default)]
    pub age_max: Option<i64>,
    #[serde(default)]
    pub income_restricted: bool,
    #[serde(default)]
    pub own_housing_required: bool,
    #[serde(default)]
    pub disability_required: bool,
    #[serde(default)]
    pub veteran_required: bool,
}

impl BenefitRecord {
    pub fn named(service: impl Into<String>) -> Self {
        Self {
            service: Some(service.into()),
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> &str {
        self.service.as_deref().unwrap_or("Unnamed Benefit")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read benefit catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid benefit catalog data: {0}")]
    Csv(#[from] csv::Error),
}

/// Read-only set of benefit records shared between sessions.
#[derive(Debug, Clone, Default)]
pub struct BenefitCatalog {
    records: Arc<[BenefitRecord]>,
}

impl BenefitCatalog {
    pub fn new(records: Vec<BenefitRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let catalog = Self::from_reader(file)?;
        info!(path = %path.display(), records = catalog.len(), "benefit catalog loaded");
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let records = parser::parse_records(reader)?;
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[BenefitRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str =
        "Service,Description,URL,Department,Age,Age Min,Age Max,Income,Own_Housing,Disability,Veteran\n";

    fn load(rows: &str) -> BenefitCatalog {
        let data = format!("{HEADER}{rows}");
        BenefitCatalog::from_reader(Cursor::new(data.into_bytes())).expect("catalog parses")
    }

    #[test]
    fn maps_headers_onto_record_fields() {
        let catalog = load(
            "Senior Property Tax Relief,Reduces property taxes,https://example.gov/tax,Revenue,TRUE,65,,TRUE,TRUE,FALSE,FALSE\n",
        );

        assert_eq!(catalog.len(), 1);
        let record = &catalog.records()[0];
        assert_eq!(record.service.as_deref(), Some("Senior Property Tax Relief"));
        assert_eq!(record.department.as_deref(), Some("Revenue"));
        assert!(record.age_restricted);
        assert_eq!(record.age_min, Some(65));
        assert_eq!(record.age_max, None);
        assert!(record.income_restricted);
        assert!(record.own_housing_required);
        assert!(!record.disability_required);
        assert!(!record.veteran_required);
    }

    #[test]
    fn only_literal_true_sets_a_flag() {
        let catalog = load(
            "A,,,,true,,,yes,1,Y,\nB,,,, TRUE ,,,,,,TRUE\n",
        );

        let first = &catalog.records()[0];
        assert!(!first.age_restricted);
        assert!(!first.income_restricted);
        assert!(!first.own_housing_required);
        assert!(!first.disability_required);
        assert!(!first.veteran_required);

        let second = &catalog.records()[1];
        assert!(second.age_restricted, "fields are trimmed before comparison");
        assert!(second.veteran_required);
    }

    #[test]
    fn missing_optional_columns_mean_unrestricted() {
        let data = "Service,Description\nLibrary Card,Free borrowing\n";
        let catalog =
            BenefitCatalog::from_reader(Cursor::new(data.as_bytes())).expect("catalog parses");

        let record = &catalog.records()[0];
        assert_eq!(record.description.as_deref(), Some("Free borrowing"));
        assert_eq!(record.url, None);
        assert!(!record.age_restricted);
        assert!(!record.disability_required);
    }

    #[test]
    fn age_bounds_parse_leading_digits_and_drop_garbage() {
        let catalog = load("A,,,,TRUE,18 years,n/a,,,,\n");
        let record = &catalog.records()[0];
        assert_eq!(record.age_min, Some(18));
        assert_eq!(record.age_max, None);
    }

    #[test]
    fn out_of_range_bounds_are_kept_signed() {
        let catalog = load("HugeMin,,,,TRUE,99999999999,,,,,\nNegMax,,,,TRUE,,-3,,,,\n");

        assert_eq!(catalog.records()[0].age_min, Some(99_999_999_999));
        assert_eq!(catalog.records()[1].age_max, Some(-3));
    }

    #[test]
    fn empty_display_fields_become_none() {
        let catalog = load(",  ,,,,,,,,,\n");
        let record = &catalog.records()[0];
        assert_eq!(record.service, None);
        assert_eq!(record.description, None);
        assert_eq!(record.display_name(), "Unnamed Benefit");
    }

    #[test]
    fn ragged_rows_surface_as_csv_errors() {
        let data = format!("{HEADER}A,B\n");
        let err = BenefitCatalog::from_reader(Cursor::new(data.into_bytes()))
            .expect_err("row length mismatch rejected");
        assert!(matches!(err, CatalogError::Csv(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = BenefitCatalog::from_path("does/not/exist.csv").expect_err("missing file");
        assert!(matches!(err, CatalogError::Io(_)));
        assert!(err.to_string().contains("failed to read benefit catalog"));
    }
}
