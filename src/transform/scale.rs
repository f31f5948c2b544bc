//! Max-abs scaling for the demand target.
//!
//! The scaler is fit once per run and retained so the forecast
//! post-processor can invert it; it is an owned value, never shared
//! state between items.

/// Max-absolute-value scaler.
///
/// Divides by the largest absolute observed value, mapping the target
/// into `[-1, 1]` (`[0, 1]` for non-negative counts). A degenerate
/// input (all missing or max abs ~ 0) keeps scale 1.0 so the transform
/// is the identity.
#[derive(Debug, Clone, Copy)]
pub struct MaxAbsScaler {
    scale: f64,
}

impl MaxAbsScaler {
    /// Fit on the observed (non-missing) values of a target column.
    pub fn fit(values: &[Option<f64>]) -> Self {
        let max_abs = values
            .iter()
            .filter_map(|v| *v)
            .map(f64::abs)
            .fold(0.0_f64, f64::max);

        let scale = if max_abs < 1e-10 { 1.0 } else { max_abs };
        Self { scale }
    }

    /// The divisor applied by [`MaxAbsScaler::transform`].
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Scale a target column, preserving missing entries.
    pub fn transform(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        values.iter().map(|v| v.map(|x| x / self.scale)).collect()
    }

    /// Scale a single value.
    pub fn transform_value(&self, value: f64) -> f64 {
        value / self.scale
    }

    /// Invert scaling on a single value.
    pub fn inverse_value(&self, value: f64) -> f64 {
        value * self.scale
    }

    /// Invert scaling on a slice of predictions.
    pub fn inverse(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&x| x * self.scale).collect()
    }
}
