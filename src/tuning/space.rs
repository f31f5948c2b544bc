//! Declarative hyperparameter search space with seeded sampling.

use crate::error::{DemandError, Result};
use crate::models::{HOLIDAY_REG_KEY, LOSS_KEY, RECENT_MONTHS_REG_KEY};
use crate::params::{LossFunction, ParamSet, ParamValue};
use rand::Rng;

/// Sampling distribution of one hyperparameter.
#[derive(Debug, Clone)]
pub enum ParamDistribution {
    /// Uniform on `[low, high)`.
    Uniform { low: f64, high: f64 },
    /// Log-uniform on `[low, high)`; bounds must be positive.
    LogUniform { low: f64, high: f64 },
    /// Uniform integer on `[low, high]`.
    IntRange { low: i64, high: i64 },
    /// Uniform choice over fixed values (a single value pins the
    /// parameter).
    Choice(Vec<ParamValue>),
}

impl ParamDistribution {
    fn sample<R: Rng + ?Sized>(&self, key: &str, rng: &mut R) -> Result<ParamValue> {
        match self {
            Self::Uniform { low, high } => {
                if !(low.is_finite() && high.is_finite() && low < high) {
                    return Err(invalid_bounds(key, *low, *high));
                }
                Ok(ParamValue::Float(rng.gen_range(*low..*high)))
            }
            Self::LogUniform { low, high } => {
                if !(*low > 0.0 && *high > 0.0 && low < high) {
                    return Err(invalid_bounds(key, *low, *high));
                }
                let draw = rng.gen_range(low.ln()..high.ln());
                Ok(ParamValue::Float(draw.exp()))
            }
            Self::IntRange { low, high } => {
                if low > high {
                    return Err(invalid_bounds(key, *low as f64, *high as f64));
                }
                Ok(ParamValue::Int(rng.gen_range(*low..=*high)))
            }
            Self::Choice(values) => {
                if values.is_empty() {
                    return Err(DemandError::InvalidParameter(format!(
                        "empty choice list for {key}"
                    )));
                }
                Ok(values[rng.gen_range(0..values.len())].clone())
            }
        }
    }
}

fn invalid_bounds(key: &str, low: f64, high: f64) -> DemandError {
    DemandError::InvalidParameter(format!("invalid bounds for {key}: [{low}, {high}]"))
}

/// Ordered set of named parameter distributions.
#[derive(Debug, Clone, Default)]
pub struct SearchSpace {
    entries: Vec<(String, ParamDistribution)>,
}

impl SearchSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a distribution.
    pub fn with(mut self, name: impl Into<String>, dist: ParamDistribution) -> Self {
        let name = name.into();
        self.entries.retain(|(n, _)| *n != name);
        self.entries.push((name, dist));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Draw one full parameter set.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ParamSet> {
        let mut params = ParamSet::new();
        for (name, dist) in &self.entries {
            params.insert(name.clone(), dist.sample(name, rng)?);
        }
        Ok(params)
    }

    /// The demand model search space: ranges for the gradient step,
    /// per-component regularizations, epochs, changepoints and the
    /// seasonality switches. `n_forecasts` is fixed at 1 and the loss
    /// pinned to the absolute-error loss.
    pub fn demand_default() -> Self {
        let flag = || {
            ParamDistribution::Choice(vec![ParamValue::Bool(true), ParamValue::Bool(false)])
        };
        Self::new()
            .with(
                "learning_rate",
                ParamDistribution::LogUniform {
                    low: 0.001,
                    high: 0.1,
                },
            )
            .with(
                "trend_reg",
                ParamDistribution::Uniform {
                    low: 0.001,
                    high: 1.0,
                },
            )
            .with(
                "ar_reg",
                ParamDistribution::Uniform {
                    low: 0.1,
                    high: 10.0,
                },
            )
            .with("epochs", ParamDistribution::IntRange { low: 10, high: 50 })
            .with(
                "seasonality_reg",
                ParamDistribution::Uniform {
                    low: 0.1,
                    high: 10.0,
                },
            )
            .with(
                "n_changepoints",
                ParamDistribution::IntRange { low: 5, high: 30 },
            )
            .with(
                "seasonality_mode",
                ParamDistribution::Choice(vec![
                    ParamValue::Str("additive".to_string()),
                    ParamValue::Str("multiplicative".to_string()),
                ]),
            )
            .with("yearly_seasonality", flag())
            .with("weekly_seasonality", flag())
            .with("daily_seasonality", flag())
            .with(
                RECENT_MONTHS_REG_KEY,
                ParamDistribution::LogUniform {
                    low: 1e-5,
                    high: 1e-1,
                },
            )
            .with(
                HOLIDAY_REG_KEY,
                ParamDistribution::Uniform {
                    low: 0.1,
                    high: 10.0,
                },
            )
            .with(
                LOSS_KEY,
                ParamDistribution::Choice(vec![ParamValue::Loss(LossFunction::L1Loss)]),
            )
    }
}
