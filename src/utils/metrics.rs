//! Forecast accuracy metric.

use crate::error::{DemandError, Result};

/// Mean absolute error between two aligned slices.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Normalized inverse-error percentage:
/// `max(0, min(100 * (1 - MAE / range), 100))` with
/// `range = max(actual) - min(actual)`.
///
/// A degenerate range (constant truth) cannot be normalized and is an
/// evaluation error.
pub fn accuracy(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(DemandError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(DemandError::Evaluation(format!(
            "length mismatch: {} actual vs {} predicted",
            actual.len(),
            predicted.len()
        )));
    }

    let min = actual.iter().copied().fold(f64::INFINITY, f64::min);
    let max = actual.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !(range > 0.0) {
        return Err(DemandError::Evaluation(
            "degenerate target range in evaluation window".to_string(),
        ));
    }

    let err = mae(actual, predicted);
    Ok((100.0 * (1.0 - err / range)).clamp(0.0, 100.0))
}

/// Align option-valued truth/prediction pairs, substituting 0 for
/// missing entries before the MAE computation.
pub fn fill_missing_pairs(
    actual: &[Option<f64>],
    predicted: &[Option<f64>],
) -> (Vec<f64>, Vec<f64>) {
    let actual = actual.iter().map(|v| v.unwrap_or(0.0)).collect();
    let predicted = predicted.iter().map(|v| v.unwrap_or(0.0)).collect();
    (actual, predicted)
}
