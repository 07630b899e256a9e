//! House dataset loading
//!
//! Reads the comma separated table with a header row naming the columns
//! `Size`, `Bedrooms`, `Price` and `ZipCode`. Column order is free; columns
//! are matched by header name. Every row must have as many fields as the
//! header.

use crate::models::HouseRecord;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Header names the loader looks for
pub const SIZE_COLUMN: &str = "Size";
pub const BEDROOMS_COLUMN: &str = "Bedrooms";
pub const PRICE_COLUMN: &str = "Price";
pub const ZIP_CODE_COLUMN: &str = "ZipCode";

/// One CSV row as named in the header
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Size")]
    size: f64,
    #[serde(rename = "Bedrooms")]
    bedrooms: f64,
    #[serde(rename = "Price")]
    price: f64,
    #[serde(rename = "ZipCode")]
    zip_code: String,
}

/// In-memory house table
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<HouseRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<HouseRecord>) -> Result<Self> {
        if records.is_empty() {
            bail!("Dataset has no rows");
        }
        Ok(Self { records })
    }

    /// Load a CSV file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;
        let dataset = Self::parse(&content)
            .with_context(|| format!("Failed to parse dataset {}", path.display()))?;
        debug!(path = %path.display(), rows = dataset.len(), "Loaded dataset");
        Ok(dataset)
    }

    /// Parse CSV contents
    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_reader(content.trim_start_matches('\u{feff}').as_bytes());

        let headers = reader.headers().context("Failed to read header row")?.clone();
        for column in [SIZE_COLUMN, BEDROOMS_COLUMN, PRICE_COLUMN, ZIP_CODE_COLUMN] {
            if !headers.iter().any(|h| h == column) {
                bail!("Missing column '{}' in header", column);
            }
        }

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result.context("Malformed dataset row")?;
            let line_no = record.position().map(|p| p.line()).unwrap_or_default();
            let row: CsvRow = record
                .deserialize(Some(&headers))
                .with_context(|| format!("Line {}: invalid row", line_no))?;

            for (column, value) in [
                (SIZE_COLUMN, row.size),
                (BEDROOMS_COLUMN, row.bedrooms),
                (PRICE_COLUMN, row.price),
            ] {
                if !value.is_finite() {
                    bail!("Line {}: {} value '{}' is not finite", line_no, column, value);
                }
            }

            records.push(HouseRecord {
                size: row.size,
                bedrooms: row.bedrooms,
                price: row.price,
                zip_code: row.zip_code,
            });
        }

        Self::from_records(records)
    }

    pub fn records(&self) -> &[HouseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Target column in row order
    pub fn prices(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.price).collect()
    }

    /// Distinct zip codes, sorted
    pub fn zip_codes(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.zip_code.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "Size,Bedrooms,Price,ZipCode
1500,3,300000,12345
2000,4,410000,12345

1200,2,250000,\"67890\"
";

    #[test]
    fn test_parse_sample() {
        let dataset = Dataset::parse(SAMPLE).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[2].zip_code, "67890");
        assert_eq!(dataset.prices(), vec![300000.0, 410000.0, 250000.0]);
        assert_eq!(dataset.zip_codes().into_iter().collect::<Vec<_>>(), vec!["12345", "67890"]);
    }

    #[test]
    fn test_columns_matched_by_name() {
        let dataset = Dataset::parse("ZipCode,Price,Size,Bedrooms\n11111,100,50,1\n").unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.size, 50.0);
        assert_eq!(record.bedrooms, 1.0);
        assert_eq!(record.price, 100.0);
        assert_eq!(record.zip_code, "11111");
    }

    #[test]
    fn test_missing_column_rejected() {
        let err = Dataset::parse("Size,Bedrooms,Price\n1,2,3\n").unwrap_err();
        assert!(err.to_string().contains("ZipCode"));
    }

    #[test]
    fn test_bad_number_names_line() {
        let err = Dataset::parse("Size,Bedrooms,Price,ZipCode\n1,2,3,4\nx,2,3,4\n").unwrap_err();
        assert!(format!("{:#}", err).contains("Line 3"));
    }

    #[test]
    fn test_short_row_rejected() {
        assert!(Dataset::parse("Size,Bedrooms,Price,ZipCode\n1,2,3\n").is_err());
    }

    #[test]
    fn test_extra_fields_rejected() {
        assert!(Dataset::parse("Size,Bedrooms,Price,ZipCode\n1,2,3,4,5\n").is_err());
    }

    #[test]
    fn test_quoted_comma_stays_in_field() {
        let dataset = Dataset::parse(
            "Size,Bedrooms,Price,ZipCode\n1500,3,300000,\"Springfield, 12345\"\n",
        )
        .unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.zip_code, "Springfield, 12345");
        assert_eq!(record.price, 300000.0);
    }

    #[test]
    fn test_quoted_number_with_comma_is_invalid() {
        let err = Dataset::parse("Size,Bedrooms,Price,ZipCode\n\"1,500\",3,300000,12345\n").unwrap_err();
        assert!(format!("{:#}", err).contains("Line 2"));
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let err = Dataset::parse("Size,Bedrooms,Price,ZipCode\n1500,3,inf,12345\n").unwrap_err();
        assert!(err.to_string().contains("not finite"));
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(Dataset::parse("Size,Bedrooms,Price,ZipCode\n").is_err());
        assert!(Dataset::parse("").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("houses.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        assert_eq!(Dataset::load(&path).unwrap().len(), 3);
        assert!(Dataset::load(&dir.path().join("missing.csv")).is_err());
    }
}
