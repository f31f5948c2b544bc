//! String codec for hyperparameters persisted as name/value rows.
//!
//! Stored records are untyped strings; decoding recovers booleans,
//! loss-function references, integers and floats. Decode failures are
//! soft at the batch level: the per-item pipeline catches them and
//! reports that item as a null result.

use crate::error::{DemandError, Result};
use crate::params::{LossFunction, ParamSet, ParamValue};

/// Reserved prefix marking a loss-function reference in stored form.
pub const LOSS_PREFIX: &str = "nn.";

/// One persisted hyperparameter row (`HIPERPARAMETROS` / `VALOR`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredParam {
    pub name: String,
    pub value: String,
}

impl StoredParam {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Decode a single stored value into a typed parameter.
///
/// Rules, in order: case-insensitive `true`/`false` become booleans; a
/// value carrying the reserved `nn.` token resolves against the
/// [`LossFunction`] table by its suffix name; numeric text parses to
/// int (no decimal point) or float; numeric-looking text that fails to
/// parse is a decode error; anything else passes through as a string.
pub fn decode(key: &str, value: &str) -> Result<ParamValue> {
    let trimmed = value.trim();

    if trimmed.eq_ignore_ascii_case("true") {
        return Ok(ParamValue::Bool(true));
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Ok(ParamValue::Bool(false));
    }

    if trimmed.contains(LOSS_PREFIX) {
        let suffix = trimmed.rsplit('.').next().unwrap_or(trimmed);
        return LossFunction::from_name(suffix)
            .map(ParamValue::Loss)
            .ok_or_else(|| DemandError::Decode {
                key: key.to_string(),
                value: value.to_string(),
            });
    }

    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(ParamValue::Int(v));
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        return Ok(ParamValue::Float(v));
    }
    if looks_numeric(trimmed) {
        return Err(DemandError::Decode {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    Ok(ParamValue::Str(trimmed.to_string()))
}

/// Encode a typed parameter back to its stored string form.
///
/// Loss references encode to their registered name; floats keep their
/// decimal point so they round-trip as floats.
pub fn encode(value: &ParamValue) -> String {
    match value {
        ParamValue::Int(v) => v.to_string(),
        ParamValue::Float(v) => format!("{v:?}"),
        ParamValue::Bool(v) => v.to_string(),
        ParamValue::Str(v) => v.clone(),
        ParamValue::Loss(v) => v.registered_name(),
    }
}

/// Decode a full stored record set into a [`ParamSet`].
pub fn decode_params(records: &[StoredParam]) -> Result<ParamSet> {
    let mut params = ParamSet::new();
    for record in records {
        let value = decode(&record.name, &record.value)?;
        params.insert(record.name.clone(), value);
    }
    Ok(params)
}

/// Encode a [`ParamSet`] into stored rows, sorted by name.
pub fn encode_params(params: &ParamSet) -> Vec<StoredParam> {
    params
        .iter()
        .map(|(name, value)| StoredParam::new(name.clone(), encode(value)))
        .collect()
}

/// Whether a non-parsing string still looks like it was meant to be a
/// number (so it should fail loudly instead of passing through).
fn looks_numeric(value: &str) -> bool {
    let body = value.strip_prefix(['-', '+']).unwrap_or(value);
    body.chars().next().is_some_and(|c| c.is_ascii_digit())
}
