//! Forecast containers: raw model output and the post-processed table.

use chrono::NaiveDate;

/// Column label of the lower interval bound in the output schema.
pub const LOWER_BOUND_LABEL: &str = "yhat1 2.5%";
/// Column label of the upper interval bound in the output schema.
pub const UPPER_BOUND_LABEL: &str = "yhat1 97.5%";
/// Column label of the update timestamp in the output schema.
pub const UPDATE_LABEL: &str = "DT_ATUALIZACAO";

/// Raw model output: point predictions with optional interval bounds.
#[derive(Debug, Clone, Default)]
pub struct Forecast {
    point: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

impl Forecast {
    /// Point-only forecast.
    pub fn from_values(point: Vec<f64>) -> Self {
        Self {
            point,
            lower: None,
            upper: None,
        }
    }

    /// Forecast with interval bounds.
    pub fn from_values_with_intervals(point: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        Self {
            point,
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    pub fn point(&self) -> &[f64] {
        &self.point
    }

    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    pub fn point_mut(&mut self) -> &mut [f64] {
        &mut self.point
    }

    pub fn lower_mut(&mut self) -> Option<&mut [f64]> {
        self.lower.as_deref_mut()
    }

    pub fn upper_mut(&mut self) -> Option<&mut [f64]> {
        self.upper.as_deref_mut()
    }
}

/// One output row: date, observed value and predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub ds: NaiveDate,
    /// Observed value, if the date was in the history.
    pub y: Option<f64>,
    /// Point forecast.
    pub yhat1: f64,
    /// Lower 2.5% interval bound.
    pub yhat1_lower: f64,
    /// Upper 97.5% interval bound.
    pub yhat1_upper: f64,
}

/// One row of the risk grid: a demand target and the probability of
/// reaching it under the rolling statistics and under the forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskEntry {
    /// 1-based grid position (1..=11).
    pub index: usize,
    /// Target demand level (`Meta_{i}x_Media`).
    pub target: f64,
    /// Normal CDF of the target under rolling mean/std, in percent.
    pub prob_vs_mean: f64,
    /// Normal CDF of the target under forecast/rolling std, in percent.
    pub prob_vs_forecast: f64,
}

impl RiskEntry {
    pub fn target_label(&self) -> String {
        format!("Meta_{}x_Media", self.index)
    }

    pub fn prob_vs_mean_label(&self) -> String {
        format!("Risco_Meta_{}x_Media", self.index)
    }

    pub fn prob_vs_forecast_label(&self) -> String {
        format!("Risco_Meta_{}x_Projecao", self.index)
    }
}

/// Final per-item output: forecast rows, risk grid and update timestamp.
///
/// Never mutated after creation; consumed only for reporting/persistence.
#[derive(Debug, Clone)]
pub struct ForecastTable {
    rows: Vec<ForecastRow>,
    risk: Vec<RiskEntry>,
    updated_at: String,
}

impl ForecastTable {
    pub fn new(rows: Vec<ForecastRow>, risk: Vec<RiskEntry>, updated_at: String) -> Self {
        Self {
            rows,
            risk,
            updated_at,
        }
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn risk(&self) -> &[RiskEntry] {
        &self.risk
    }

    /// `DT_ATUALIZACAO` timestamp string (`YYYY-MM-DD HH:MM:SS`).
    pub fn updated_at(&self) -> &str {
        &self.updated_at
    }
}
