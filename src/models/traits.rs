//! Forecaster trait defining the seam to the forecasting model.
//!
//! The pipeline only talks to this trait, so the in-crate model can be
//! swapped for bindings to an external library without touching the
//! tuning or post-processing stages.

use crate::core::{DailySeries, Forecast};
use crate::error::Result;

/// Common interface for forecasting models.
///
/// Object-safe; usable as `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the series.
    fn fit(&mut self, series: &DailySeries) -> Result<()>;

    /// Generate point predictions for the given horizon.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Generate predictions with confidence intervals at `level`
    /// (e.g. 0.95 for 2.5%/97.5% bounds).
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        let _ = level;
        self.predict(horizon)
    }

    /// In-sample predictions, one per input row.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Residuals (actual - fitted); NaN on rows without an observation.
    fn residuals(&self) -> Option<&[f64]>;

    /// Model name.
    fn name(&self) -> &str;

    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}
