//! Daily series container for per-item demand history.

use crate::error::{DemandError, Result};
use chrono::{Datelike, Duration, NaiveDate};

/// A univariate daily time series with optional derived columns.
///
/// Dates are strictly increasing with at most one row per calendar day.
/// `values` holds the raw target (`None` for calendar gaps introduced by
/// [`DailySeries::fill_missing_dates`]); the scaled target and the
/// end-of-month boost indicator are attached by later pipeline stages.
#[derive(Debug, Clone)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
    scaled: Option<Vec<Option<f64>>>,
    boost: Option<Vec<f64>>,
}

impl DailySeries {
    /// Create a series from parallel date/value vectors.
    ///
    /// Dates must be strictly increasing (no duplicates, no reordering).
    pub fn new(dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(DemandError::Timestamp(format!(
                "dates/values length mismatch: {} vs {}",
                dates.len(),
                values.len()
            )));
        }
        for i in 1..dates.len() {
            if dates[i] <= dates[i - 1] {
                return Err(DemandError::Timestamp(
                    "dates must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self {
            dates,
            values,
            scaled: None,
            boost: None,
        })
    }

    /// Create a series where every value is observed.
    pub fn from_observed(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        let values = values.into_iter().map(Some).collect();
        Self::new(dates, values)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Scaled target column, if the scaler has been applied.
    pub fn scaled(&self) -> Option<&[Option<f64>]> {
        self.scaled.as_deref()
    }

    /// End-of-month boost indicator column, if built.
    pub fn boost(&self) -> Option<&[f64]> {
        self.boost.as_deref()
    }

    /// Attach the scaled target column.
    pub fn set_scaled(&mut self, scaled: Vec<Option<f64>>) -> Result<()> {
        if scaled.len() != self.len() {
            return Err(DemandError::InsufficientData {
                needed: self.len(),
                got: scaled.len(),
            });
        }
        self.scaled = Some(scaled);
        Ok(())
    }

    /// Attach the boost indicator column.
    pub fn set_boost(&mut self, boost: Vec<f64>) -> Result<()> {
        if boost.len() != self.len() {
            return Err(DemandError::InsufficientData {
                needed: self.len(),
                got: boost.len(),
            });
        }
        self.boost = Some(boost);
        Ok(())
    }

    /// Reindex to the complete daily calendar between the first and last
    /// observed date. Inserted rows get `None`, never zero. Derived
    /// columns are dropped; features are rebuilt after reindexing.
    pub fn fill_missing_dates(self) -> Result<Self> {
        let first = *self.dates.first().ok_or(DemandError::EmptyData)?;
        let last = *self.dates.last().ok_or(DemandError::EmptyData)?;

        let n_days = (last - first).num_days() as usize + 1;
        let mut dates = Vec::with_capacity(n_days);
        let mut values = Vec::with_capacity(n_days);

        let mut src = 0usize;
        let mut day = first;
        while day <= last {
            if src < self.dates.len() && self.dates[src] == day {
                values.push(self.values[src]);
                src += 1;
            } else {
                values.push(None);
            }
            dates.push(day);
            day += Duration::days(1);
        }

        Ok(Self {
            dates,
            values,
            scaled: None,
            boost: None,
        })
    }

    /// Drop rows before `start`, keeping derived columns aligned.
    pub fn restrict_from(mut self, start: NaiveDate) -> Self {
        let offset = self.dates.partition_point(|d| *d < start);
        self.dates.drain(..offset);
        self.values.drain(..offset);
        if let Some(scaled) = self.scaled.as_mut() {
            scaled.drain(..offset);
        }
        if let Some(boost) = self.boost.as_mut() {
            boost.drain(..offset);
        }
        self
    }

    /// Split chronologically at `fraction` of the rows (earliest first).
    ///
    /// Temporal order is preserved; no shuffling, so the holdout never
    /// leaks into the training window.
    pub fn split_chronological(&self, fraction: f64) -> Result<(Self, Self)> {
        if self.is_empty() {
            return Err(DemandError::EmptyData);
        }
        if !(0.0..1.0).contains(&fraction) || fraction <= 0.0 {
            return Err(DemandError::InvalidParameter(format!(
                "split fraction must be in (0, 1), got {fraction}"
            )));
        }
        let cut = ((self.len() as f64) * fraction).floor() as usize;
        if cut == 0 || cut == self.len() {
            return Err(DemandError::InsufficientData {
                needed: 2,
                got: self.len(),
            });
        }
        Ok((self.slice(0, cut), self.slice(cut, self.len())))
    }

    fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            dates: self.dates[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            scaled: self.scaled.as_ref().map(|s| s[start..end].to_vec()),
            boost: self.boost.as_ref().map(|b| b[start..end].to_vec()),
        }
    }

    /// Half-open index spans of each calendar month present in the series.
    pub fn month_spans(&self) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut start = 0usize;
        for i in 1..self.dates.len() {
            let prev = self.dates[i - 1];
            let cur = self.dates[i];
            if cur.year() != prev.year() || cur.month() != prev.month() {
                spans.push((start, i));
                start = i;
            }
        }
        if !self.dates.is_empty() {
            spans.push((start, self.dates.len()));
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn new_rejects_unordered_dates() {
        let dates = vec![d(2024, 1, 2), d(2024, 1, 1)];
        let result = DailySeries::new(dates, vec![Some(1.0), Some(2.0)]);
        assert!(matches!(result, Err(DemandError::Timestamp(_))));
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let dates = vec![d(2024, 1, 1), d(2024, 1, 1)];
        let result = DailySeries::new(dates, vec![Some(1.0), Some(2.0)]);
        assert!(matches!(result, Err(DemandError::Timestamp(_))));
    }

    #[test]
    fn fill_missing_dates_covers_full_range() {
        let dates = vec![d(2024, 1, 1), d(2024, 1, 4), d(2024, 1, 7)];
        let series = DailySeries::from_observed(dates, vec![1.0, 4.0, 7.0]).unwrap();
        let filled = series.fill_missing_dates().unwrap();

        assert_eq!(filled.len(), 7);
        assert_eq!(filled.values()[0], Some(1.0));
        assert_eq!(filled.values()[1], None); // gap, not zero
        assert_eq!(filled.values()[3], Some(4.0));
        assert_eq!(filled.values()[6], Some(7.0));

        for w in filled.dates().windows(2) {
            assert_eq!((w[1] - w[0]).num_days(), 1);
        }
    }

    #[test]
    fn fill_missing_dates_empty_errors() {
        let series = DailySeries::new(Vec::new(), Vec::new()).unwrap();
        assert_eq!(series.fill_missing_dates().unwrap_err(), DemandError::EmptyData);
    }

    #[test]
    fn split_is_chronological() {
        let dates: Vec<NaiveDate> = (0..10).map(|i| d(2024, 1, 1 + i)).collect();
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let series = DailySeries::from_observed(dates, values).unwrap();

        let (train, test) = series.split_chronological(0.8).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);
        assert!(train.dates().last().unwrap() < test.dates().first().unwrap());
        assert_eq!(test.values()[0], Some(8.0));
    }

    #[test]
    fn split_rejects_degenerate_fractions() {
        let dates: Vec<NaiveDate> = (0..4).map(|i| d(2024, 1, 1 + i)).collect();
        let series = DailySeries::from_observed(dates, vec![1.0; 4]).unwrap();
        assert!(series.split_chronological(0.0).is_err());
        assert!(series.split_chronological(1.0).is_err());
    }

    #[test]
    fn month_spans_follow_calendar_boundaries() {
        let dates = vec![d(2024, 1, 30), d(2024, 1, 31), d(2024, 2, 1), d(2024, 3, 5)];
        let series = DailySeries::from_observed(dates, vec![1.0; 4]).unwrap();
        assert_eq!(series.month_spans(), vec![(0, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn restrict_from_keeps_columns_aligned() {
        let dates: Vec<NaiveDate> = (0..6).map(|i| d(2024, 1, 1 + i)).collect();
        let mut series = DailySeries::from_observed(dates, vec![1.0; 6]).unwrap();
        series.set_boost(vec![0.0, 0.0, 1.0, 0.0, 1.0, 0.0]).unwrap();

        let trimmed = series.restrict_from(d(2024, 1, 3));
        assert_eq!(trimmed.len(), 4);
        assert_eq!(trimmed.boost().unwrap(), &[1.0, 0.0, 1.0, 0.0]);
    }
}
