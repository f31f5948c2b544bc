//! Forecast post-processing: inverse scaling, non-negativity clamp,
//! table accuracy and the normal-CDF risk grid.

use crate::core::{DailySeries, Forecast, ForecastRow, RiskEntry};
use crate::error::{DemandError, Result};
use crate::transform::{last_defined, rolling_mean, rolling_std, MaxAbsScaler};
use crate::utils::accuracy;
use statrs::distribution::{ContinuousCDF, Normal};

/// Trailing window, in days, of the risk-table rolling statistics.
pub const RISK_WINDOW: usize = 90;

/// Grid positions on each side of the rolling mean.
const GRID_HALF: i64 = 5;

/// Post-processing for one item's run, holding the retained scaler.
#[derive(Debug, Clone, Copy)]
pub struct PostProcessor {
    scaler: MaxAbsScaler,
}

impl PostProcessor {
    pub fn new(scaler: MaxAbsScaler) -> Self {
        Self { scaler }
    }

    pub fn scaler(&self) -> &MaxAbsScaler {
        &self.scaler
    }

    /// Map a forecast back to the original demand units.
    pub fn inverse_scale(&self, forecast: &mut Forecast) {
        for p in forecast.point_mut() {
            *p = self.scaler.inverse_value(*p);
        }
        if let Some(lower) = forecast.lower_mut() {
            for p in lower.iter_mut() {
                *p = self.scaler.inverse_value(*p);
            }
        }
        if let Some(upper) = forecast.upper_mut() {
            for p in upper.iter_mut() {
                *p = self.scaler.inverse_value(*p);
            }
        }
    }

    /// Clamp the point forecast and both bounds to zero from below.
    /// Demand is a count; a negative prediction means "none", not a
    /// mirrored positive amount, so this clamps instead of taking the
    /// absolute value.
    pub fn clip_nonnegative(forecast: &mut Forecast) {
        for p in forecast.point_mut() {
            *p = p.max(0.0);
        }
        if let Some(lower) = forecast.lower_mut() {
            for p in lower.iter_mut() {
                *p = p.max(0.0);
            }
        }
        if let Some(upper) = forecast.upper_mut() {
            for p in upper.iter_mut() {
                *p = p.max(0.0);
            }
        }
    }

    /// In-sample accuracy over the rows that carry an observation.
    pub fn table_accuracy(rows: &[ForecastRow]) -> Result<f64> {
        let mut actual = Vec::new();
        let mut predicted = Vec::new();
        for row in rows {
            if let Some(y) = row.y {
                actual.push(y);
                predicted.push(row.yhat1);
            }
        }
        accuracy(&actual, &predicted)
    }

    /// Build the 11-row risk grid from the trailing rolling statistics
    /// of the observed history and the point forecast.
    ///
    /// With `m` and `s` the most recent rolling mean and sample std and
    /// `step = max(1, round(0.1 * m))`, the targets are `m + k * step`
    /// for `k in -5..=5`. Each target gets the normal CDF (in percent)
    /// under `Normal(m, s)` and under `Normal(point_forecast, s)`. At
    /// the center target the mean column is exactly 50.
    pub fn risk_table(
        history: &DailySeries,
        point_forecast: f64,
        window: usize,
    ) -> Result<Vec<RiskEntry>> {
        let means = rolling_mean(history.values(), window);
        let stds = rolling_std(history.values(), window);

        let m = last_defined(&means).ok_or_else(|| {
            DemandError::Evaluation(format!(
                "no complete {window}-day window in {} rows of history",
                history.len()
            ))
        })?;
        let s = last_defined(&stds).ok_or_else(|| {
            DemandError::Evaluation(format!(
                "no complete {window}-day window in {} rows of history",
                history.len()
            ))
        })?;
        if s < 1e-10 {
            return Err(DemandError::Evaluation(
                "degenerate rolling std in risk window".to_string(),
            ));
        }

        let vs_mean = Normal::new(m, s).map_err(|e| DemandError::Evaluation(e.to_string()))?;
        let vs_forecast = Normal::new(point_forecast, s)
            .map_err(|e| DemandError::Evaluation(e.to_string()))?;

        let step = (0.1 * m).round().max(1.0);
        let mut entries = Vec::with_capacity((2 * GRID_HALF + 1) as usize);
        for k in -GRID_HALF..=GRID_HALF {
            let target = m + k as f64 * step;
            entries.push(RiskEntry {
                index: (k + GRID_HALF + 1) as usize,
                target,
                prob_vs_mean: vs_mean.cdf(target) * 100.0,
                prob_vs_forecast: vs_forecast.cdf(target) * 100.0,
            });
        }
        Ok(entries)
    }
}
