//! End-of-month boost indicator.
//!
//! Marks presumed high-demand days near month boundaries: for each
//! evaluated month the 5 days with the highest observed demand get a
//! binary flag the model consumes as an event regressor. A mark that
//! falls on a Saturday moves to the previous calendar day, since the
//! business is presumed closed on Saturdays.

use crate::core::DailySeries;
use chrono::{Datelike, NaiveDate, Weekday};

/// How many top-demand days are flagged per evaluated month.
const PEAKS_PER_MONTH: usize = 5;

/// Which month windows the boost rule evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostWindow {
    /// Every calendar month in the series (optimizer variant).
    EveryMonth,
    /// Only the given inclusive date range, normally the last fully
    /// completed month before the forecast origin (forecaster variant).
    LastCompleteMonth { start: NaiveDate, end: NaiveDate },
}

/// Build the boost indicator column for a series.
///
/// Returns one 0/1 entry per row. Months with fewer than
/// [`PEAKS_PER_MONTH`] observed rows mark what they have. A Saturday
/// shift that would land before the first row is a no-op.
pub fn end_of_month_boost(series: &DailySeries, window: BoostWindow) -> Vec<f64> {
    let mut boost = vec![0.0; series.len()];

    let spans: Vec<(usize, usize)> = match window {
        BoostWindow::EveryMonth => series.month_spans(),
        BoostWindow::LastCompleteMonth { start, end } => {
            let lo = series.dates().partition_point(|d| *d < start);
            let hi = series.dates().partition_point(|d| *d <= end);
            if lo < hi {
                vec![(lo, hi)]
            } else {
                Vec::new()
            }
        }
    };

    for (start, end) in spans {
        for idx in top_demand_rows(series, start, end) {
            let target = if series.dates()[idx].weekday() == Weekday::Sat {
                match idx.checked_sub(1) {
                    Some(prev) => prev,
                    None => continue,
                }
            } else {
                idx
            };
            boost[target] = 1.0;
        }
    }

    boost
}

/// Indices of the highest-demand observed rows in `[start, end)`,
/// largest first, ties kept in date order.
fn top_demand_rows(series: &DailySeries, start: usize, end: usize) -> Vec<usize> {
    let mut candidates: Vec<(usize, f64)> = (start..end)
        .filter_map(|i| series.values()[i].map(|y| (i, y)))
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(PEAKS_PER_MONTH);
    candidates.into_iter().map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn month_series(values: Vec<f64>) -> DailySeries {
        // January 2024: the 1st is a Monday, the 6th a Saturday.
        let dates: Vec<NaiveDate> = (1..=values.len() as u32).map(|i| d(2024, 1, i)).collect();
        DailySeries::from_observed(dates, values).unwrap()
    }

    #[test]
    fn marks_five_peaks_in_a_month() {
        let mut values = vec![1.0; 31];
        // Peaks on weekdays: Jan 29-31 (Mon-Wed), Jan 25 (Thu), Jan 22 (Mon).
        for (day, v) in [(29, 50.0), (30, 60.0), (31, 70.0), (25, 40.0), (22, 30.0)] {
            values[day - 1] = v;
        }
        let series = month_series(values);
        let boost = end_of_month_boost(&series, BoostWindow::EveryMonth);

        assert_eq!(boost.iter().filter(|&&b| b == 1.0).count(), 5);
        for day in [22, 25, 29, 30, 31] {
            assert_eq!(boost[day - 1], 1.0, "day {day} should be boosted");
        }
    }

    #[test]
    fn saturday_peak_shifts_to_friday() {
        let mut values = vec![1.0; 31];
        values[5] = 100.0; // Jan 6 2024, a Saturday
        for (day, v) in [(29, 50.0), (30, 60.0), (31, 70.0), (25, 40.0)] {
            values[day - 1] = v;
        }
        let series = month_series(values);
        let boost = end_of_month_boost(&series, BoostWindow::EveryMonth);

        assert_eq!(boost[5], 0.0, "Saturday itself must not be marked");
        assert_eq!(boost[4], 1.0, "mark moves to Friday Jan 5");
    }

    #[test]
    fn saturday_shift_at_series_start_is_noop() {
        // Series starting on Saturday Jan 6 with its peak on that day.
        let dates: Vec<NaiveDate> = (6..=12).map(|i| d(2024, 1, i)).collect();
        let series =
            DailySeries::from_observed(dates, vec![9.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
        let boost = end_of_month_boost(&series, BoostWindow::EveryMonth);

        assert_eq!(boost[0], 0.0);
        // Of the 5 candidates the Saturday peak is skipped, leaving 4.
        assert_eq!(boost.iter().filter(|&&b| b == 1.0).count(), 4);
    }

    #[test]
    fn short_month_marks_what_it_has() {
        let dates = vec![d(2024, 1, 8), d(2024, 1, 9), d(2024, 1, 10)];
        let series = DailySeries::from_observed(dates, vec![3.0, 2.0, 1.0]).unwrap();
        let boost = end_of_month_boost(&series, BoostWindow::EveryMonth);
        assert_eq!(boost, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn last_complete_month_ignores_other_months() {
        let dates: Vec<NaiveDate> = (0..90)
            .map(|i| d(2024, 1, 1) + chrono::Duration::days(i))
            .collect();
        let values: Vec<f64> = (0..90).map(|i| (i % 13) as f64).collect();
        let series = DailySeries::from_observed(dates, values).unwrap();

        let boost = end_of_month_boost(
            &series,
            BoostWindow::LastCompleteMonth {
                start: d(2024, 2, 1),
                end: d(2024, 2, 29),
            },
        );

        let jan_end = series.dates().partition_point(|x| *x < d(2024, 2, 1));
        let feb_end = series.dates().partition_point(|x| *x <= d(2024, 2, 29));
        assert!(boost[..jan_end.saturating_sub(1)].iter().all(|&b| b == 0.0));
        assert!(boost[feb_end..].iter().all(|&b| b == 0.0));
        assert_eq!(boost.iter().filter(|&&b| b == 1.0).count(), 5);
    }

    #[test]
    fn missing_days_are_never_candidates() {
        let dates: Vec<NaiveDate> = (1..=10).map(|i| d(2024, 1, i)).collect();
        let values = vec![
            Some(1.0),
            None,
            Some(2.0),
            None,
            Some(3.0),
            None,
            Some(4.0),
            Some(5.0),
            Some(6.0),
            Some(7.0),
        ];
        let series = DailySeries::new(dates, values).unwrap();
        let boost = end_of_month_boost(&series, BoostWindow::EveryMonth);

        // Top five observed: days 10, 9, 8, 7, 5 (none on Saturday
        // except day 6, which is missing anyway).
        for day in [5, 7, 8, 9, 10] {
            assert_eq!(boost[day - 1], 1.0);
        }
        assert_eq!(boost.iter().filter(|&&b| b == 1.0).count(), 5);
    }
}
