//! Feature encoding for the in-process estimators
//!
//! Rows become `[size, bedrooms, one-hot(zip_code)...]`, then every column is
//! min-max scaled with the bounds seen while fitting.

use crate::dataset::Dataset;
use crate::models::PredictionRequest;
use anyhow::{bail, Result};
use ndarray::{Array1, Array2};

/// Numeric columns ahead of the one-hot block
const NUMERIC_COLUMNS: usize = 2;

/// Learned encoding: zip vocabulary plus per-column bounds
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    zip_codes: Vec<String>,
    mins: Vec<f64>,
    maxs: Vec<f64>,
}

impl FeatureEncoder {
    /// Learn the zip vocabulary and column bounds from a dataset
    pub fn fit(dataset: &Dataset) -> Result<Self> {
        if dataset.is_empty() {
            bail!("Cannot fit feature encoder on an empty dataset");
        }

        let zip_codes: Vec<String> = dataset.zip_codes().into_iter().map(String::from).collect();
        let width = NUMERIC_COLUMNS + zip_codes.len();
        let mut encoder = Self {
            zip_codes,
            mins: vec![f64::INFINITY; width],
            maxs: vec![f64::NEG_INFINITY; width],
        };

        for record in dataset.records() {
            let raw = encoder.raw_row(record.size, record.bedrooms, &record.zip_code);
            for (col, value) in raw.iter().enumerate() {
                encoder.mins[col] = encoder.mins[col].min(*value);
                encoder.maxs[col] = encoder.maxs[col].max(*value);
            }
        }

        Ok(encoder)
    }

    /// Number of encoded columns
    pub fn width(&self) -> usize {
        NUMERIC_COLUMNS + self.zip_codes.len()
    }

    pub fn zip_codes(&self) -> &[String] {
        &self.zip_codes
    }

    /// Encode every dataset row
    pub fn transform(&self, dataset: &Dataset) -> Array2<f64> {
        let mut matrix = Array2::zeros((dataset.len(), self.width()));
        for (mut row, record) in matrix.rows_mut().into_iter().zip(dataset.records()) {
            let encoded = self.encode(record.size, record.bedrooms, &record.zip_code);
            row.assign(&encoded);
        }
        matrix
    }

    /// Encode a single prediction request; an unseen zip code gets an all-zero one-hot block
    pub fn encode_request(&self, request: &PredictionRequest) -> Array1<f64> {
        self.encode(request.size, request.bedrooms as f64, &request.zip_code)
    }

    fn encode(&self, size: f64, bedrooms: f64, zip_code: &str) -> Array1<f64> {
        let raw = self.raw_row(size, bedrooms, zip_code);
        raw.iter()
            .enumerate()
            .map(|(col, value)| self.normalize(col, *value))
            .collect()
    }

    fn raw_row(&self, size: f64, bedrooms: f64, zip_code: &str) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());
        row.push(size);
        row.push(bedrooms);
        row.extend(
            self.zip_codes
                .iter()
                .map(|z| if z == zip_code { 1.0 } else { 0.0 }),
        );
        row
    }

    /// Min-max scale; a constant column maps to 0
    fn normalize(&self, col: usize, value: f64) -> f64 {
        let range = self.maxs[col] - self.mins[col];
        if range.abs() < f64::EPSILON {
            return 0.0;
        }
        (value - self.mins[col]) / range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HouseRecord;

    fn record(size: f64, bedrooms: f64, price: f64, zip: &str) -> HouseRecord {
        HouseRecord {
            size,
            bedrooms,
            price,
            zip_code: zip.to_string(),
        }
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record(1000.0, 2.0, 200000.0, "222"),
            record(2000.0, 4.0, 400000.0, "111"),
            record(1500.0, 3.0, 300000.0, "222"),
        ])
        .unwrap()
    }

    #[test]
    fn test_width_and_vocabulary() {
        let encoder = FeatureEncoder::fit(&sample()).unwrap();
        assert_eq!(encoder.width(), 4);
        assert_eq!(encoder.zip_codes(), &["111".to_string(), "222".to_string()]);
    }

    #[test]
    fn test_transform_scales_to_unit_range() {
        let dataset = sample();
        let encoder = FeatureEncoder::fit(&dataset).unwrap();
        let matrix = encoder.transform(&dataset);

        assert_eq!(matrix.dim(), (3, 4));
        assert_eq!(matrix.row(0).to_vec(), vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(matrix.row(1).to_vec(), vec![1.0, 1.0, 1.0, 0.0]);
        assert_eq!(matrix.row(2).to_vec(), vec![0.5, 0.5, 0.0, 1.0]);
    }

    #[test]
    fn test_unseen_zip_is_all_zero() {
        let encoder = FeatureEncoder::fit(&sample()).unwrap();
        let row = encoder.encode_request(&PredictionRequest::new(2000.0, 3, "99999"));
        assert_eq!(row.to_vec(), vec![1.0, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        let dataset = Dataset::from_records(vec![
            record(1000.0, 3.0, 1.0, "1"),
            record(2000.0, 3.0, 2.0, "1"),
        ])
        .unwrap();
        let encoder = FeatureEncoder::fit(&dataset).unwrap();
        let matrix = encoder.transform(&dataset);
        assert!(matrix.column(1).iter().all(|v| *v == 0.0));
        assert!(matrix.column(2).iter().all(|v| *v == 0.0));
    }
}
