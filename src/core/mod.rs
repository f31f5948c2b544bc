//! Core data structures for the demand pipeline.

mod dates;
mod forecast;
mod series;

pub use dates::DateContext;
pub use forecast::{
    Forecast, ForecastRow, ForecastTable, RiskEntry, LOWER_BOUND_LABEL, UPDATE_LABEL,
    UPPER_BOUND_LABEL,
};
pub use series::DailySeries;
