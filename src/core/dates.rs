//! Date context derived from a reference date and a lookback offset.

use crate::error::{DemandError, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Time boundaries for a single pipeline run.
///
/// All boundaries derive from one reference date (the forecast origin)
/// and a lookback offset in calendar months.
#[derive(Debug, Clone, Copy)]
pub struct DateContext {
    reference: NaiveDate,
    lookback_months: u32,
}

impl DateContext {
    pub fn new(reference: NaiveDate, lookback_months: u32) -> Self {
        Self {
            reference,
            lookback_months,
        }
    }

    /// The forecast origin (the reference date itself).
    pub fn forecast_origin(&self) -> NaiveDate {
        self.reference
    }

    /// First day of the month `lookback_months` before the reference month.
    pub fn history_start(&self) -> Result<NaiveDate> {
        let months = self.reference.year() * 12 + self.reference.month0() as i32
            - self.lookback_months as i32;
        let (year, month0) = (months.div_euclid(12), months.rem_euclid(12) as u32);
        NaiveDate::from_ymd_opt(year, month0 + 1, 1).ok_or_else(|| {
            DemandError::Timestamp(format!(
                "cannot derive history start from {} minus {} months",
                self.reference, self.lookback_months
            ))
        })
    }

    /// Inclusive date range of the last fully completed month before the
    /// reference month.
    pub fn previous_month(&self) -> Result<(NaiveDate, NaiveDate)> {
        let month_start = NaiveDate::from_ymd_opt(self.reference.year(), self.reference.month(), 1)
            .ok_or_else(|| {
                DemandError::Timestamp(format!("invalid reference date {}", self.reference))
            })?;
        let end = month_start - Duration::days(1);
        let start = NaiveDate::from_ymd_opt(end.year(), end.month(), 1)
            .ok_or_else(|| DemandError::Timestamp(format!("invalid month for {end}")))?;
        Ok((start, end))
    }

    /// History start as a `YYYY-MM-DD` string.
    pub fn history_start_string(&self) -> Result<String> {
        Ok(self.history_start()?.format("%Y-%m-%d").to_string())
    }

    /// Forecast origin as a `YYYY-MM-DD` string.
    pub fn origin_string(&self) -> String {
        self.reference.format("%Y-%m-%d").to_string()
    }

    /// Update timestamp string (`YYYY-MM-DD HH:MM:SS`) for output rows.
    pub fn update_timestamp(now: NaiveDateTime) -> String {
        now.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
