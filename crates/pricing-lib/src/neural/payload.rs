//! Validation and mapping of the child's result object
//!
//! The payload is parsed into a generic map first and checked against an
//! explicit field list before a typed [`PredictionResult`] is built.

use super::error::InvocationError;
use crate::models::PredictionResult;
use serde_json::{Map, Value};

/// Key the child uses to signal its own failure
pub const ERROR_FIELD: &str = "error";

/// Fields a successful payload must carry, in reporting order
pub const REQUIRED_FIELDS: [&str; 3] = ["predicted_price", "r2", "mae"];

/// Generic string-keyed view of the payload
pub type ParsedPayload = Map<String, Value>;

/// Parse the JSON candidate; `raw` is the full output, kept for diagnosis
pub fn parse_payload(json_candidate: &str, raw: &str) -> Result<ParsedPayload, InvocationError> {
    serde_json::from_str(json_candidate).map_err(|source| InvocationError::PayloadParseFailure {
        raw: raw.to_string(),
        source,
    })
}

/// Reject payloads carrying an `error` marker, then payloads missing required fields
pub fn validate(payload: &ParsedPayload) -> Result<(), InvocationError> {
    if let Some(error) = payload.get(ERROR_FIELD) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(InvocationError::ChildReportedError(message));
    }

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !payload.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(InvocationError::MissingRequiredField(missing));
    }

    Ok(())
}

/// Convert the required fields of a validated payload
pub fn map_result(payload: &ParsedPayload) -> Result<PredictionResult, InvocationError> {
    Ok(PredictionResult {
        predicted_price: numeric_field(payload, "predicted_price")?,
        r2: numeric_field(payload, "r2")?,
        mae: numeric_field(payload, "mae")?,
    })
}

fn numeric_field(payload: &ParsedPayload, field: &'static str) -> Result<f64, InvocationError> {
    let value = payload.get(field).unwrap_or(&Value::Null);
    coerce_f64(value).ok_or_else(|| InvocationError::FieldConversionFailure {
        field,
        value: value.to_string(),
    })
}

/// Numbers convert directly; strings must hold a finite decimal number
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
