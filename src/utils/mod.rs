//! Shared metric and statistics helpers.

pub mod metrics;
pub mod stats;

pub use metrics::{accuracy, fill_missing_pairs, mae};
pub use stats::{mean, std_dev, variance};
