//! Data transformations: scaling and rolling window statistics.

pub mod scale;
pub mod window;

pub use scale::MaxAbsScaler;
pub use window::{last_defined, rolling_mean, rolling_std};
