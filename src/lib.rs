//! # demand-forecast
//!
//! Per-item daily demand forecasting with hyperparameter search and
//! risk post-processing.
//!
//! The crate covers the full per-item pipeline: calendar reindexing and
//! feature building, max-abs scaling, an AR-Net style decomposition model
//! behind the [`models::Forecaster`] seam, a seeded random hyperparameter
//! search with early stopping, and forecast post-processing (inverse
//! scaling, non-negativity clamp, accuracy, normal-CDF risk table).

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod features;
pub mod models;
pub mod params;
pub mod pipeline;
pub mod transform;
pub mod tuning;
pub mod utils;

pub use error::{DemandError, Result};

pub mod prelude {
    pub use crate::core::{DailySeries, DateContext, Forecast, ForecastTable};
    pub use crate::error::{DemandError, Result};
    pub use crate::models::{ArNet, ArNetConfig, Forecaster};
    pub use crate::params::{LossFunction, ParamSet, ParamValue};
    pub use crate::tuning::{SearchSpace, StudyConfig};
    pub use crate::utils::accuracy;
}
