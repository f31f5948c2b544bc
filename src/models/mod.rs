//! Forecasting model, its configuration and the trait seam.

mod arnet;
mod config;
mod traits;

pub use arnet::ArNet;
pub use config::{
    ArNetConfig, SeasonalityMode, HOLIDAY_REG_KEY, LOSS_KEY, RECENT_MONTHS_REG_KEY,
};
pub use traits::Forecaster;
