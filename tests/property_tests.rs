//! Property-based tests for the calendar reindexing and the scaler.

use chrono::{Duration, NaiveDate};
use demand_forecast::prelude::*;
use demand_forecast::transform::MaxAbsScaler;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

proptest! {
    /// Reindexing always yields one row per calendar day between the
    /// first and last observed date, in order, with no duplicates, and
    /// keeps every observed value on its day.
    #[test]
    fn fill_missing_dates_covers_the_calendar(
        offsets in prop::collection::btree_set(0i64..400, 1..60)
    ) {
        let offsets: Vec<i64> = offsets.into_iter().collect();
        let dates: Vec<NaiveDate> =
            offsets.iter().map(|&o| base_date() + Duration::days(o)).collect();
        let values: Vec<f64> = offsets.iter().map(|&o| o as f64).collect();

        let series = DailySeries::from_observed(dates.clone(), values).unwrap();
        let filled = series.fill_missing_dates().unwrap();

        let expected_len =
            (offsets[offsets.len() - 1] - offsets[0]) as usize + 1;
        prop_assert_eq!(filled.len(), expected_len);

        for w in filled.dates().windows(2) {
            prop_assert_eq!((w[1] - w[0]).num_days(), 1);
        }

        let observed: BTreeSet<NaiveDate> = dates.into_iter().collect();
        for (date, value) in filled.dates().iter().zip(filled.values()) {
            if observed.contains(date) {
                let offset = (*date - base_date()).num_days();
                prop_assert_eq!(*value, Some(offset as f64));
            } else {
                prop_assert_eq!(*value, None);
            }
        }
    }

    /// Scaling then inverting recovers each value to float tolerance,
    /// and the scaled image of a non-degenerate input sits in [-1, 1].
    #[test]
    fn scaler_round_trips(
        values in prop::collection::vec(-1e6f64..1e6, 1..50)
    ) {
        prop_assume!(values.iter().any(|v| v.abs() > 1e-6));

        let column: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
        let scaler = MaxAbsScaler::fit(&column);

        for &v in &values {
            let scaled = scaler.transform_value(v);
            prop_assert!((-1.0..=1.0).contains(&scaled));
            let back = scaler.inverse_value(scaled);
            prop_assert!(
                (back - v).abs() <= 1e-9 * v.abs().max(1.0),
                "{} -> {} -> {}", v, scaled, back
            );
        }
    }
}
