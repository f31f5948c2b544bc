//! Per-item production forecast run and its batch loop.

use crate::core::{DailySeries, DateContext, ForecastRow, ForecastTable};
use crate::error::{DemandError, Result};
use crate::features::{end_of_month_boost, BoostWindow};
use crate::models::{ArNet, ArNetConfig, Forecaster};
use crate::params::{decode_params, StoredParam};
use crate::pipeline::post::{PostProcessor, RISK_WINDOW};
use crate::transform::MaxAbsScaler;
use chrono::{Duration, NaiveDateTime};

/// Interval level of the production forecast (2.5% / 97.5% bounds).
const INTERVAL_LEVEL: f64 = 0.95;

/// One item's slot in the batch output.
#[derive(Debug, Clone)]
pub struct ForecastRunResult {
    pub item_id: String,
    pub table: Option<ForecastTable>,
    pub error: Option<String>,
}

/// Run the production forecast for one item.
///
/// Decodes the stored hyperparameters, rebuilds the features over the
/// lookback window from `ctx`, fits on the full restricted history and
/// predicts `n_forecasts` steps (1 in production) with the 95%
/// interval, then post-processes into the output table.
pub fn forecast_item(
    series: DailySeries,
    stored: &[StoredParam],
    ctx: &DateContext,
    now: NaiveDateTime,
) -> Result<ForecastTable> {
    let params = decode_params(stored)?;
    let config = ArNetConfig::from_params(&params)?;
    let horizon = config.n_forecasts.max(1);

    let filled = series.fill_missing_dates()?;
    let mut history = filled.restrict_from(ctx.history_start()?);
    if history.is_empty() {
        return Err(DemandError::EmptyData);
    }

    let scaler = MaxAbsScaler::fit(history.values());
    let scaled = scaler.transform(history.values());
    history.set_scaled(scaled)?;

    let (month_start, month_end) = ctx.previous_month()?;
    let boost = end_of_month_boost(
        &history,
        BoostWindow::LastCompleteMonth {
            start: month_start,
            end: month_end,
        },
    );
    history.set_boost(boost)?;

    let mut model = ArNet::new(config);
    model.fit(&history)?;
    let mut forecast = model.predict_with_intervals(horizon, INTERVAL_LEVEL)?;

    let post = PostProcessor::new(scaler);
    post.inverse_scale(&mut forecast);
    PostProcessor::clip_nonnegative(&mut forecast);

    let point = forecast.point()[0];
    let lower = forecast.lower().map(|l| l[0]).unwrap_or(point);
    let upper = forecast.upper().map(|u| u[0]).unwrap_or(point);
    let half_width = (upper - lower) / 2.0;

    let fitted = model
        .fitted_values()
        .ok_or_else(|| DemandError::ModelFit("fit produced no fitted values".to_string()))?;

    let mut rows = Vec::with_capacity(history.len() + horizon);
    for idx in 0..history.len() {
        let yhat = scaler.inverse_value(fitted[idx]).max(0.0);
        rows.push(ForecastRow {
            ds: history.dates()[idx],
            y: history.values()[idx],
            yhat1: yhat,
            yhat1_lower: (yhat - half_width).max(0.0),
            yhat1_upper: yhat + half_width,
        });
    }
    let last_date = *history.dates().last().ok_or(DemandError::EmptyData)?;
    for step in 0..forecast.horizon() {
        let yhat = forecast.point()[step];
        rows.push(ForecastRow {
            ds: last_date + Duration::days(step as i64 + 1),
            y: None,
            yhat1: yhat,
            yhat1_lower: forecast.lower().map(|l| l[step]).unwrap_or(yhat),
            yhat1_upper: forecast.upper().map(|u| u[step]).unwrap_or(yhat),
        });
    }

    let risk = PostProcessor::risk_table(&history, point, RISK_WINDOW)?;
    Ok(ForecastTable::new(
        rows,
        risk,
        DateContext::update_timestamp(now),
    ))
}

/// Forecast a batch of items in order, isolating per-item failures.
pub fn forecast_batch(
    items: Vec<(String, DailySeries, Vec<StoredParam>)>,
    ctx: &DateContext,
    now: NaiveDateTime,
) -> Vec<ForecastRunResult> {
    items
        .into_iter()
        .map(
            |(item_id, series, stored)| match forecast_item(series, &stored, ctx, now) {
                Ok(table) => ForecastRunResult {
                    item_id,
                    table: Some(table),
                    error: None,
                },
                Err(err) => ForecastRunResult {
                    item_id,
                    table: None,
                    error: Some(err.to_string()),
                },
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{encode_params, ParamSet, ParamValue};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// A year of daily history ending 2024-05-31.
    fn yearly_series() -> DailySeries {
        let start = d(2023, 6, 1);
        let end = d(2024, 5, 31);
        let n = (end - start).num_days() as usize + 1;
        let dates: Vec<NaiveDate> = (0..n)
            .map(|i| start + Duration::days(i as i64))
            .collect();
        let values: Vec<f64> = (0..n)
            .map(|i| {
                30.0 + 0.02 * i as f64
                    + 6.0 * (2.0 * std::f64::consts::PI * (i % 7) as f64 / 7.0).sin()
            })
            .collect();
        DailySeries::from_observed(dates, values).unwrap()
    }

    fn stored_params() -> Vec<StoredParam> {
        let mut p = ParamSet::new();
        p.insert("learning_rate".into(), ParamValue::Float(0.02));
        p.insert("epochs".into(), ParamValue::Int(40));
        p.insert("trend_reg".into(), ParamValue::Float(0.1));
        p.insert("ar_reg".into(), ParamValue::Float(1.0));
        p.insert("seasonality_reg".into(), ParamValue::Float(1.0));
        p.insert("n_changepoints".into(), ParamValue::Int(10));
        p.insert("seasonality_mode".into(), ParamValue::Str("additive".into()));
        p.insert("yearly_seasonality".into(), ParamValue::Bool(false));
        p.insert("weekly_seasonality".into(), ParamValue::Bool(true));
        p.insert("daily_seasonality".into(), ParamValue::Bool(false));
        p.insert(
            crate::models::RECENT_MONTHS_REG_KEY.into(),
            ParamValue::Float(1e-3),
        );
        p.insert(crate::models::HOLIDAY_REG_KEY.into(), ParamValue::Float(1.0));
        encode_params(&p)
    }

    #[test]
    fn forecast_item_builds_a_complete_table() {
        let ctx = DateContext::new(d(2024, 6, 1), 12);
        let now = d(2024, 6, 1).and_hms_opt(8, 30, 0).unwrap();

        let table = forecast_item(yearly_series(), &stored_params(), &ctx, now).unwrap();

        let rows = table.rows();
        // 366 history days plus the single production forecast step.
        assert_eq!(rows.len(), 367);
        assert_eq!(rows.iter().filter(|r| r.y.is_none()).count(), 1);

        let last = rows.last().unwrap();
        assert_eq!(last.ds, d(2024, 6, 1));
        assert!(last.y.is_none());
        assert!(last.yhat1 >= 0.0);
        assert!(last.yhat1_lower <= last.yhat1);
        assert!(last.yhat1 <= last.yhat1_upper);

        // History rows start at the lookback boundary and carry truth.
        assert_eq!(rows[0].ds, d(2023, 6, 1));
        assert!(rows[0].y.is_some());

        assert_eq!(table.risk().len(), 11);
        assert_eq!(table.updated_at(), "2024-06-01 08:30:00");
    }

    #[test]
    fn forecast_item_rejects_undecodable_params() {
        let ctx = DateContext::new(d(2024, 6, 1), 12);
        let now = d(2024, 6, 1).and_hms_opt(8, 0, 0).unwrap();

        let mut stored = stored_params();
        stored.push(StoredParam::new("epochs", "4O"));
        assert!(matches!(
            forecast_item(yearly_series(), &stored, &ctx, now),
            Err(DemandError::Decode { .. })
        ));
    }

    #[test]
    fn batch_keeps_failed_items_in_place() {
        let ctx = DateContext::new(d(2024, 6, 1), 12);
        let now = d(2024, 6, 1).and_hms_opt(8, 0, 0).unwrap();

        let too_short =
            DailySeries::from_observed(vec![d(2024, 5, 1)], vec![1.0]).unwrap();

        let results = forecast_batch(
            vec![
                ("bad".to_string(), too_short, stored_params()),
                ("good".to_string(), yearly_series(), stored_params()),
            ],
            &ctx,
            now,
        );

        assert_eq!(results.len(), 2);
        assert!(results[0].table.is_none());
        assert!(results[0].error.is_some());
        assert!(results[1].table.is_some());
    }
}
