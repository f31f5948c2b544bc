//! AR-Net style additive decomposition model fitted by gradient descent.
//!
//! Stand-in for the external neural forecasting library: a linear model
//! over trend (changepoint hinges), Fourier seasonality, autoregressive
//! lags and the two event regressors, trained full-batch with the
//! configured loss and per-component L2 penalties. The pipeline only
//! sees it through the [`Forecaster`] trait.

use crate::core::{DailySeries, Forecast};
use crate::error::{DemandError, Result};
use crate::models::config::{ArNetConfig, SeasonalityMode};
use crate::models::Forecaster;
use crate::params::LossFunction;
use crate::utils::std_dev;
use chrono::{Duration, Months, NaiveDate};
use statrs::distribution::{ContinuousCDF, Normal};

const WEEKLY_ORDER: usize = 3;
const YEARLY_ORDER: usize = 6;
const WEEKLY_PERIOD: f64 = 7.0;
const YEARLY_PERIOD: f64 = 365.25;
/// Minimum observed rows required to fit.
const MIN_OBSERVED: usize = 14;

/// AR-Net demand model.
#[derive(Debug, Clone)]
pub struct ArNet {
    config: ArNetConfig,

    // Fitted state
    weights: Option<Vec<f64>>,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
    n_rows: usize,
    trend_denom: f64,
    /// Last `n_lags` target values (model domain), most recent last.
    lag_tail: Vec<f64>,
    sigma: f64,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl ArNet {
    pub fn new(config: ArNetConfig) -> Self {
        Self {
            config,
            weights: None,
            first_date: None,
            last_date: None,
            n_rows: 0,
            trend_denom: 1.0,
            lag_tail: Vec::new(),
            sigma: 0.0,
            fitted: None,
            residuals: None,
        }
    }

    pub fn config(&self) -> &ArNetConfig {
        &self.config
    }

    /// Target column the model trains on: the scaled target when the
    /// scaler has run, the raw target otherwise.
    fn target_column(series: &DailySeries) -> Vec<Option<f64>> {
        series
            .scaled()
            .map(|s| s.to_vec())
            .unwrap_or_else(|| series.values().to_vec())
    }

    /// Indicator for rows inside the last three calendar months of the
    /// history, the window whose weights get their own regularization.
    fn recent_months_column(series: &DailySeries) -> Vec<f64> {
        let last = match series.dates().last() {
            Some(d) => *d,
            None => return Vec::new(),
        };
        let threshold = last
            .checked_sub_months(Months::new(3))
            .unwrap_or(NaiveDate::MIN);
        series
            .dates()
            .iter()
            .map(|d| if *d >= threshold { 1.0 } else { 0.0 })
            .collect()
    }

    fn feature_count(&self) -> usize {
        let mut count = 1; // bias
        count += 1 + self.config.n_changepoints; // trend slope + hinges
        if self.config.weekly_seasonality {
            count += 2 * WEEKLY_ORDER;
        }
        if self.config.yearly_seasonality {
            count += 2 * YEARLY_ORDER;
        }
        // Daily-sampled input leaves no sub-daily cycle to model; the
        // daily_seasonality flag is accepted but contributes no features.
        count += self.config.n_lags;
        count + 2 // boost + recent-months events
    }

    /// Per-feature L2 penalty strengths, aligned with `row_features`.
    fn penalties(&self) -> Vec<f64> {
        let mut p = Vec::with_capacity(self.feature_count());
        p.push(0.0); // bias is unpenalized
        for _ in 0..=self.config.n_changepoints {
            p.push(self.config.trend_reg);
        }
        let mut seasonal_slots = 0;
        if self.config.weekly_seasonality {
            seasonal_slots += 2 * WEEKLY_ORDER;
        }
        if self.config.yearly_seasonality {
            seasonal_slots += 2 * YEARLY_ORDER;
        }
        for _ in 0..seasonal_slots {
            p.push(self.config.seasonality_reg);
        }
        for _ in 0..self.config.n_lags {
            p.push(self.config.ar_reg);
        }
        p.push(self.config.holiday_reg);
        p.push(self.config.recent_months_reg);
        p
    }

    /// Feature vector for one row.
    ///
    /// `t_norm` is the trend position in `[0, 1]` over the training
    /// window (extrapolated past 1 when forecasting), `day_offset` the
    /// calendar day count since the first training date, `lags` the
    /// most recent targets (newest first).
    fn row_features(
        &self,
        t_norm: f64,
        day_offset: f64,
        lags: &[f64],
        boost: f64,
        recent: f64,
    ) -> Vec<f64> {
        let cfg = &self.config;
        let mut x = Vec::with_capacity(self.feature_count());

        x.push(1.0);

        x.push(t_norm);
        for j in 1..=cfg.n_changepoints {
            let knot = j as f64 / (cfg.n_changepoints + 1) as f64;
            x.push((t_norm - knot).max(0.0));
        }

        let seasonal_gain = match cfg.seasonality_mode {
            SeasonalityMode::Additive => 1.0,
            SeasonalityMode::Multiplicative => t_norm,
        };
        if cfg.weekly_seasonality {
            push_fourier(&mut x, day_offset, WEEKLY_PERIOD, WEEKLY_ORDER, seasonal_gain);
        }
        if cfg.yearly_seasonality {
            push_fourier(&mut x, day_offset, YEARLY_PERIOD, YEARLY_ORDER, seasonal_gain);
        }

        for lag in 0..cfg.n_lags {
            x.push(lags.get(lag).copied().unwrap_or(0.0));
        }

        x.push(boost);
        x.push(recent);
        x
    }

    /// Lag vector (newest first) for row `idx` of the filled target.
    fn lags_for_row(&self, filled: &[f64], idx: usize) -> Vec<f64> {
        (1..=self.config.n_lags)
            .map(|lag| {
                idx.checked_sub(lag)
                    .map(|i| filled[i])
                    .unwrap_or(0.0)
            })
            .collect()
    }

    fn loss_gradient(&self, residual: f64) -> f64 {
        match self.config.loss {
            LossFunction::L1Loss => residual.signum(),
            LossFunction::MSELoss => 2.0 * residual,
            LossFunction::HuberLoss => residual.clamp(-1.0, 1.0),
        }
    }
}

fn push_fourier(x: &mut Vec<f64>, day_offset: f64, period: f64, order: usize, gain: f64) {
    for k in 1..=order {
        let angle = 2.0 * std::f64::consts::PI * k as f64 * day_offset / period;
        x.push(gain * angle.sin());
        x.push(gain * angle.cos());
    }
}

fn dot(w: &[f64], x: &[f64]) -> f64 {
    w.iter().zip(x.iter()).map(|(a, b)| a * b).sum()
}

impl Forecaster for ArNet {
    fn fit(&mut self, series: &DailySeries) -> Result<()> {
        if series.is_empty() {
            return Err(DemandError::EmptyData);
        }

        let target = Self::target_column(series);
        let observed = target.iter().filter(|v| v.is_some()).count();
        if observed < MIN_OBSERVED {
            return Err(DemandError::InsufficientData {
                needed: MIN_OBSERVED,
                got: observed,
            });
        }

        let n = series.len();
        let first = series.dates()[0];
        let last = series.dates()[n - 1];
        let boost: Vec<f64> = series
            .boost()
            .map(|b| b.to_vec())
            .unwrap_or_else(|| vec![0.0; n]);
        let recent = Self::recent_months_column(series);
        let filled: Vec<f64> = target.iter().map(|v| v.unwrap_or(0.0)).collect();

        self.first_date = Some(first);
        self.last_date = Some(last);
        self.n_rows = n;
        self.trend_denom = (n.saturating_sub(1)).max(1) as f64;

        // Assemble the design over observed rows only.
        let mut rows: Vec<(Vec<f64>, f64)> = Vec::with_capacity(observed);
        for (idx, value) in target.iter().enumerate() {
            let Some(y) = value else { continue };
            let day_offset = (series.dates()[idx] - first).num_days() as f64;
            let x = self.row_features(
                idx as f64 / self.trend_denom,
                day_offset,
                &self.lags_for_row(&filled, idx),
                boost[idx],
                recent[idx],
            );
            rows.push((x, *y));
        }

        let n_features = self.feature_count();
        let penalties = self.penalties();
        let mut weights = vec![0.0_f64; n_features];
        let m = rows.len() as f64;

        for _epoch in 0..self.config.epochs {
            let mut grad = vec![0.0_f64; n_features];
            for (x, y) in &rows {
                let g = self.loss_gradient(dot(&weights, x) - y);
                for (slot, feature) in grad.iter_mut().zip(x.iter()) {
                    *slot += g * feature;
                }
            }
            for j in 0..n_features {
                let step = grad[j] / m + 2.0 * penalties[j] * weights[j];
                weights[j] -= self.config.learning_rate * step;
            }
            if weights.iter().any(|w| !w.is_finite()) {
                return Err(DemandError::ModelFit(
                    "gradient descent diverged to non-finite weights".to_string(),
                ));
            }
        }

        // In-sample predictions for every row, residuals where observed.
        let mut fitted = Vec::with_capacity(n);
        let mut residuals = Vec::with_capacity(n);
        for idx in 0..n {
            let day_offset = (series.dates()[idx] - first).num_days() as f64;
            let x = self.row_features(
                idx as f64 / self.trend_denom,
                day_offset,
                &self.lags_for_row(&filled, idx),
                boost[idx],
                recent[idx],
            );
            let yhat = dot(&weights, &x);
            fitted.push(yhat);
            residuals.push(match target[idx] {
                Some(y) => y - yhat,
                None => f64::NAN,
            });
        }

        let finite: Vec<f64> = residuals.iter().copied().filter(|r| r.is_finite()).collect();
        let sigma = std_dev(&finite);
        self.sigma = if sigma.is_finite() { sigma } else { 0.0 };

        let tail_start = filled.len().saturating_sub(self.config.n_lags);
        self.lag_tail = filled[tail_start..].to_vec();
        self.weights = Some(weights);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let weights = self
            .weights
            .as_ref()
            .ok_or_else(|| DemandError::ModelFit("model must be fitted before prediction".into()))?;
        let first = self.first_date.ok_or(DemandError::EmptyData)?;
        let last = self.last_date.ok_or(DemandError::EmptyData)?;

        let mut tail = self.lag_tail.clone();
        let mut point = Vec::with_capacity(horizon);
        for step in 1..=horizon {
            let date = last + Duration::days(step as i64);
            let day_offset = (date - first).num_days() as f64;
            let t_norm = (self.n_rows - 1 + step) as f64 / self.trend_denom;
            let lags: Vec<f64> = tail.iter().rev().take(self.config.n_lags).copied().collect();
            // Future rows sit inside the recent-months window; the boost
            // feature is unknown ahead of time and stays off.
            let x = self.row_features(t_norm, day_offset, &lags, 0.0, 1.0);
            let yhat = dot(weights, &x);
            point.push(yhat);
            tail.push(yhat);
        }
        Ok(Forecast::from_values(point))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        if !(0.0 < level && level < 1.0) {
            return Err(DemandError::InvalidParameter(format!(
                "interval level must be in (0, 1), got {level}"
            )));
        }
        let forecast = self.predict(horizon)?;

        let standard = Normal::new(0.0, 1.0)
            .map_err(|e| DemandError::Evaluation(e.to_string()))?;
        let z = standard.inverse_cdf(0.5 + level / 2.0);

        let point = forecast.point().to_vec();
        let lower: Vec<f64> = point.iter().map(|p| p - z * self.sigma).collect();
        let upper: Vec<f64> = point.iter().map(|p| p + z * self.sigma).collect();
        Ok(Forecast::from_values_with_intervals(point, lower, upper))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "ARNet"
    }
}
