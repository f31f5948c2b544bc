//! Per-item pipeline runs: optimization, production forecasting and
//! forecast post-processing, with batch loops that keep failures
//! inside their item.

mod forecast;
mod optimize;
pub mod post;

pub use forecast::{forecast_batch, forecast_item, ForecastRunResult};
pub use optimize::{optimize_batch, optimize_item, OptimizationResult};
pub use post::{PostProcessor, RISK_WINDOW};
