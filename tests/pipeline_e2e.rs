//! End-to-end runs of the tuning and forecast pipelines.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use demand_forecast::params::encode_params;
use demand_forecast::pipeline::{forecast_item, optimize_item};
use demand_forecast::prelude::*;
use demand_forecast::tuning::SearchSpace;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn run_time() -> NaiveDateTime {
    d(2024, 6, 1).and_hms_opt(5, 0, 0).unwrap()
}

/// Daily demand with weekly cycle, mild trend and scattered gaps.
fn synthetic_series(start: NaiveDate, n: usize) -> DailySeries {
    let mut dates = Vec::new();
    let mut values = Vec::new();
    for i in 0..n {
        if i % 17 == 16 {
            continue; // calendar gap
        }
        let weekly = (2.0 * std::f64::consts::PI * (i % 7) as f64 / 7.0).sin();
        dates.push(start + Duration::days(i as i64));
        values.push(25.0 + 0.04 * i as f64 + 6.0 * weekly);
    }
    DailySeries::from_observed(dates, values).unwrap()
}

#[test]
fn tuning_run_terminates_with_usable_params() {
    let series = synthetic_series(d(2024, 1, 1), 100);
    let space = SearchSpace::demand_default();
    let config = StudyConfig::default().with_trials(5).with_seed(7);

    let result = optimize_item("item-e2e", series, &space, &config, run_time()).unwrap();

    let params = result.best_params.expect("study must select parameters");
    assert!(!params.is_empty());
    assert!(
        (0.0..=100.0).contains(&result.accuracy),
        "accuracy {} out of range",
        result.accuracy
    );

    // The selected set must configure the model without further edits.
    ArNetConfig::from_params(&params).unwrap();
}

#[test]
fn tuning_run_is_reproducible() {
    let space = SearchSpace::demand_default();
    let config = StudyConfig::default().with_trials(5).with_seed(7);

    let a = optimize_item(
        "item",
        synthetic_series(d(2024, 1, 1), 100),
        &space,
        &config,
        run_time(),
    )
    .unwrap();
    let b = optimize_item(
        "item",
        synthetic_series(d(2024, 1, 1), 100),
        &space,
        &config,
        run_time(),
    )
    .unwrap();

    assert_eq!(a.best_params, b.best_params);
    assert_eq!(a.accuracy, b.accuracy);
}

#[test]
fn tuned_params_survive_storage_and_drive_a_forecast() {
    let series = synthetic_series(d(2023, 6, 1), 366);
    let space = SearchSpace::demand_default();
    let config = StudyConfig::default().with_trials(5).with_seed(3);

    let tuned = optimize_item("item", series.clone(), &space, &config, run_time()).unwrap();
    let stored = encode_params(&tuned.best_params.unwrap());

    let ctx = DateContext::new(d(2024, 6, 1), 12);
    let table = forecast_item(series, &stored, &ctx, run_time()).unwrap();

    let next = table.rows().last().unwrap();
    assert!(next.y.is_none());
    assert!(next.yhat1.is_finite() && next.yhat1 >= 0.0);
    assert!(next.yhat1_lower <= next.yhat1 && next.yhat1 <= next.yhat1_upper);
    assert!(next.yhat1_lower >= 0.0);

    assert_eq!(table.risk().len(), 11);
    for entry in table.risk() {
        assert!((0.0..=100.0).contains(&entry.prob_vs_mean));
        assert!((0.0..=100.0).contains(&entry.prob_vs_forecast));
    }
    assert_eq!(table.updated_at(), "2024-06-01 05:00:00");
}
