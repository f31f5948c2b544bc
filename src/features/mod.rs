//! Feature building for the demand model.

mod boost;

pub use boost::{end_of_month_boost, BoostWindow};
