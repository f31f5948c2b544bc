//! Error types for the demand-forecast library.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, DemandError>;

/// Errors that can occur while preparing data, tuning or forecasting.
///
/// Errors raised inside a single item's run are caught at the item
/// boundary by the batch loops and converted into null results; only
/// batch-level errors propagate to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DemandError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Date ordering or calendar error.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// A stored hyperparameter string could not be decoded.
    #[error("cannot decode hyperparameter {key:?} from {value:?}")]
    Decode { key: String, value: String },

    /// A required hyperparameter is absent from the parameter set.
    #[error("missing hyperparameter: {0}")]
    MissingParameter(String),

    /// A parameter is present but has an invalid type or value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Model fitting failed (non-convergence, degenerate design).
    #[error("model fit failed: {0}")]
    ModelFit(String),

    /// Evaluation failed (no overlap, degenerate range or spread).
    #[error("evaluation error: {0}")]
    Evaluation(String),
}
