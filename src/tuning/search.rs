//! Seeded random search over model configurations.
//!
//! Each trial walks PROPOSE -> TRAIN -> EVALUATE and ends in an
//! explicit outcome; early stopping on the accuracy target is a normal
//! outcome, not an error channel.

use crate::core::DailySeries;
use crate::error::{DemandError, Result};
use crate::models::{ArNet, ArNetConfig, Forecaster};
use crate::params::ParamSet;
use crate::tuning::SearchSpace;
use crate::utils::{accuracy, fill_missing_pairs, mae};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Study configuration.
#[derive(Debug, Clone)]
pub struct StudyConfig {
    /// Maximum number of trials.
    pub n_trials: usize,
    /// Accuracy (percent) above which the study stops early.
    pub early_stop_accuracy: f64,
    /// Chronological share of rows used for training.
    pub train_fraction: f64,
    /// RNG seed for reproducible studies.
    pub seed: u64,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            n_trials: 50,
            early_stop_accuracy: 99.0,
            train_fraction: 0.8,
            seed: 0,
        }
    }
}

impl StudyConfig {
    pub fn with_trials(mut self, n_trials: usize) -> Self {
        self.n_trials = n_trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Outcome of a single trial.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialOutcome {
    /// Trial finished; its MAE is the objective to minimize.
    Continue { mae: f64, accuracy: f64 },
    /// Trial cleared the early-stop target; the study ends here.
    AcceptedEarly { accuracy: f64 },
    /// Trial could not be evaluated and is skipped.
    Failed(String),
}

/// One evaluated trial.
#[derive(Debug, Clone)]
pub struct TrialRecord {
    pub number: usize,
    pub params: ParamSet,
    pub outcome: TrialOutcome,
}

/// Result of a study over one item's series.
#[derive(Debug, Clone)]
pub struct StudyOutcome {
    pub best_params: ParamSet,
    /// Holdout accuracy when accepted early, in-sample accuracy of the
    /// best trial refit on the full series otherwise.
    pub accuracy: f64,
    pub trials: Vec<TrialRecord>,
}

/// Run a seeded random search over the series.
///
/// The series must already carry its feature columns. Up to
/// `config.n_trials` parameter sets are drawn; a trial whose holdout
/// accuracy clears `early_stop_accuracy` ends the study. Without an
/// early accept, the best trial's parameters are refit on the full
/// series with zero holdout and the in-sample accuracy reported.
pub fn run_study(
    series: &DailySeries,
    space: &SearchSpace,
    config: &StudyConfig,
) -> Result<StudyOutcome> {
    let (train, holdout) = series.split_chronological(config.train_fraction)?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut trials = Vec::with_capacity(config.n_trials);
    let mut best: Option<(ParamSet, f64)> = None;
    let mut accepted: Option<(ParamSet, f64)> = None;

    for number in 0..config.n_trials {
        let params = space.sample(&mut rng)?;
        let outcome = evaluate_trial(&params, &train, &holdout, config.early_stop_accuracy);

        match &outcome {
            TrialOutcome::AcceptedEarly { accuracy } => {
                accepted = Some((params.clone(), *accuracy));
            }
            TrialOutcome::Continue { mae, .. } => {
                if best.as_ref().map_or(true, |(_, best_mae)| mae < best_mae) {
                    best = Some((params.clone(), *mae));
                }
            }
            TrialOutcome::Failed(_) => {}
        }

        let stop = accepted.is_some();
        trials.push(TrialRecord {
            number,
            params,
            outcome,
        });
        if stop {
            break;
        }
    }

    if let Some((best_params, accuracy)) = accepted {
        return Ok(StudyOutcome {
            best_params,
            accuracy,
            trials,
        });
    }

    let (best_params, _) = best.ok_or_else(|| {
        DemandError::Evaluation("no trial could be evaluated".to_string())
    })?;
    let accuracy = in_sample_accuracy(&best_params, series)?;
    Ok(StudyOutcome {
        best_params,
        accuracy,
        trials,
    })
}

/// PROPOSE has happened; TRAIN on the chronological training split,
/// EVALUATE on the holdout, classify.
fn evaluate_trial(
    params: &ParamSet,
    train: &DailySeries,
    holdout: &DailySeries,
    early_stop_accuracy: f64,
) -> TrialOutcome {
    match try_evaluate(params, train, holdout) {
        Ok((mae, accuracy)) => classify(mae, accuracy, early_stop_accuracy),
        Err(err) => TrialOutcome::Failed(err.to_string()),
    }
}

fn classify(mae: f64, accuracy: f64, early_stop_accuracy: f64) -> TrialOutcome {
    if accuracy > early_stop_accuracy {
        TrialOutcome::AcceptedEarly { accuracy }
    } else {
        TrialOutcome::Continue { mae, accuracy }
    }
}

fn try_evaluate(
    params: &ParamSet,
    train: &DailySeries,
    holdout: &DailySeries,
) -> Result<(f64, f64)> {
    let config = ArNetConfig::from_params(params)?;
    let mut model = ArNet::new(config);
    model.fit(train)?;

    let forecast = model.predict(holdout.len())?;
    // Train and holdout come from one reindexed daily series, so the
    // forecast steps align 1:1 with the holdout rows by date.
    let truth = holdout
        .scaled()
        .map(|s| s.to_vec())
        .unwrap_or_else(|| holdout.values().to_vec());
    let predicted: Vec<Option<f64>> = forecast.point().iter().map(|p| Some(*p)).collect();

    let (actual, predicted) = fill_missing_pairs(&truth, &predicted);
    let trial_mae = mae(&actual, &predicted);
    let trial_accuracy = accuracy(&actual, &predicted)?;
    Ok((trial_mae, trial_accuracy))
}

/// Zero-holdout fallback: refit on everything, score the fitted values
/// against the rows that carry an observation.
fn in_sample_accuracy(params: &ParamSet, series: &DailySeries) -> Result<f64> {
    let config = ArNetConfig::from_params(params)?;
    let mut model = ArNet::new(config);
    model.fit(series)?;

    let fitted = model
        .fitted_values()
        .ok_or_else(|| DemandError::ModelFit("fit produced no fitted values".to_string()))?;
    let target = series
        .scaled()
        .map(|s| s.to_vec())
        .unwrap_or_else(|| series.values().to_vec());

    let mut actual = Vec::new();
    let mut predicted = Vec::new();
    for (y, yhat) in target.iter().zip(fitted.iter()) {
        if let Some(y) = y {
            actual.push(*y);
            predicted.push(*yhat);
        }
    }
    accuracy(&actual, &predicted)
}
