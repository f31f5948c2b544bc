//! Per-item hyperparameter optimization run and its batch loop.

use crate::core::{DailySeries, DateContext};
use crate::error::Result;
use crate::features::{end_of_month_boost, BoostWindow};
use crate::params::ParamSet;
use crate::transform::MaxAbsScaler;
use crate::tuning::{run_study, SearchSpace, StudyConfig};
use chrono::NaiveDateTime;

/// Outcome of one item's optimization run.
///
/// A failed item keeps its place in the batch output with
/// `best_params = None`, accuracy 0 and the error message.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub item_id: String,
    pub best_params: Option<ParamSet>,
    pub accuracy: f64,
    /// `YYYY-MM-DD HH:MM:SS` run timestamp.
    pub timestamp: String,
    pub error: Option<String>,
}

impl OptimizationResult {
    pub fn is_null(&self) -> bool {
        self.best_params.is_none()
    }
}

/// Run the hyperparameter study for one item.
///
/// The raw history is reindexed to the full daily calendar, scaled,
/// and given the every-month boost indicator before the study runs.
pub fn optimize_item(
    item_id: &str,
    series: DailySeries,
    space: &SearchSpace,
    config: &StudyConfig,
    now: NaiveDateTime,
) -> Result<OptimizationResult> {
    let mut series = series.fill_missing_dates()?;

    let scaler = MaxAbsScaler::fit(series.values());
    let scaled = scaler.transform(series.values());
    series.set_scaled(scaled)?;

    let boost = end_of_month_boost(&series, BoostWindow::EveryMonth);
    series.set_boost(boost)?;

    let outcome = run_study(&series, space, config)?;
    Ok(OptimizationResult {
        item_id: item_id.to_string(),
        best_params: Some(outcome.best_params),
        accuracy: outcome.accuracy,
        timestamp: DateContext::update_timestamp(now),
        error: None,
    })
}

/// Optimize a batch of items in order.
///
/// Errors stay inside their item: a failed item yields a null result
/// and the batch moves on.
pub fn optimize_batch(
    items: Vec<(String, DailySeries)>,
    space: &SearchSpace,
    config: &StudyConfig,
    now: NaiveDateTime,
) -> Vec<OptimizationResult> {
    items
        .into_iter()
        .map(|(item_id, series)| {
            optimize_item(&item_id, series, space, config, now).unwrap_or_else(|err| {
                OptimizationResult {
                    item_id,
                    best_params: None,
                    accuracy: 0.0,
                    timestamp: DateContext::update_timestamp(now),
                    error: Some(err.to_string()),
                }
            })
        })
        .collect()
}
