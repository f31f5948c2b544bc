//! Production forecast run over a hard-coded item list.
//!
//! Mirrors the production forecast job on synthetic series: each item's
//! stored hyperparameters are decoded, the model refit on the lookback
//! window and one day forecast with its 95% interval and risk grid.

use chrono::{Duration, NaiveDate};
use demand_forecast::core::{LOWER_BOUND_LABEL, UPDATE_LABEL, UPPER_BOUND_LABEL};
use demand_forecast::params::{encode_params, StoredParam};
use demand_forecast::pipeline::{forecast_batch, PostProcessor};
use demand_forecast::prelude::*;

const ITEM_IDS: [&str; 3] = ["100234", "100761", "101402"];

fn synthetic_series(item_index: usize) -> DailySeries {
    let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    let n = 366usize;

    let dates: Vec<NaiveDate> = (0..n).map(|i| start + Duration::days(i as i64)).collect();
    let values: Vec<f64> = (0..n)
        .map(|i| {
            let weekly =
                (2.0 * std::f64::consts::PI * ((i + item_index) % 7) as f64 / 7.0).sin();
            50.0 + 10.0 * item_index as f64 + 0.02 * i as f64 + 9.0 * weekly
        })
        .collect();
    DailySeries::from_observed(dates, values).expect("synthetic dates are increasing")
}

/// Stored rows as the tuning job would have persisted them.
fn stored_params() -> Vec<StoredParam> {
    let mut params = ParamSet::new();
    params.insert("learning_rate".into(), ParamValue::Float(0.02));
    params.insert("epochs".into(), ParamValue::Int(40));
    params.insert("trend_reg".into(), ParamValue::Float(0.1));
    params.insert("ar_reg".into(), ParamValue::Float(1.0));
    params.insert("seasonality_reg".into(), ParamValue::Float(1.0));
    params.insert("n_changepoints".into(), ParamValue::Int(10));
    params.insert(
        "seasonality_mode".into(),
        ParamValue::Str("additive".into()),
    );
    params.insert("yearly_seasonality".into(), ParamValue::Bool(false));
    params.insert("weekly_seasonality".into(), ParamValue::Bool(true));
    params.insert("daily_seasonality".into(), ParamValue::Bool(false));
    params.insert(
        "regularizacao_ultimos_tres_meses".into(),
        ParamValue::Float(1e-3),
    );
    params.insert("regularization_feriados".into(), ParamValue::Float(1.0));
    params.insert(
        "loss_func".into(),
        ParamValue::Loss(LossFunction::L1Loss),
    );
    encode_params(&params)
}

fn main() {
    let ctx = DateContext::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 12);
    let now = ctx
        .forecast_origin()
        .and_hms_opt(6, 30, 0)
        .expect("valid run time");

    println!(
        "forecasting {} items for {} (history from {})",
        ITEM_IDS.len(),
        ctx.origin_string(),
        ctx.history_start_string().expect("valid history start"),
    );

    let items: Vec<(String, DailySeries, Vec<StoredParam>)> = ITEM_IDS
        .iter()
        .enumerate()
        .map(|(i, id)| (id.to_string(), synthetic_series(i), stored_params()))
        .collect();

    for result in forecast_batch(items, &ctx, now) {
        let Some(table) = result.table else {
            println!(
                "item {}: failed ({})",
                result.item_id,
                result.error.unwrap_or_default()
            );
            continue;
        };

        let next = table.rows().last().expect("table has a forecast row");
        println!(
            "item {}: {} yhat1 {:.2} ({LOWER_BOUND_LABEL} {:.2}, {UPPER_BOUND_LABEL} {:.2})",
            result.item_id, next.ds, next.yhat1, next.yhat1_lower, next.yhat1_upper
        );

        match PostProcessor::table_accuracy(table.rows()) {
            Ok(acc) => println!("    in-sample accuracy {acc:.2}%"),
            Err(err) => println!("    in-sample accuracy unavailable ({err})"),
        }

        for entry in table.risk() {
            println!(
                "    {} {:.0}: {} {:.1}% | {} {:.1}%",
                entry.target_label(),
                entry.target,
                entry.prob_vs_mean_label(),
                entry.prob_vs_mean,
                entry.prob_vs_forecast_label(),
                entry.prob_vs_forecast,
            );
        }
        println!("    {UPDATE_LABEL} {}", table.updated_at());
    }
}
