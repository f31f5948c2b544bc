//! Hyperparameter tuning: search space and the randomized study loop.

mod search;
mod space;

pub use search::{run_study, StudyConfig, StudyOutcome, TrialOutcome, TrialRecord};
pub use space::{ParamDistribution, SearchSpace};
