//! Model configuration mapped from a flat hyperparameter set.

use crate::error::{DemandError, Result};
use crate::params::{
    require_bool, require_f64, require_str, require_usize, LossFunction, ParamSet,
};

/// Storage key of the loss-function reference.
pub const LOSS_KEY: &str = "loss_func";
/// Storage key of the recent-months event regularization.
pub const RECENT_MONTHS_REG_KEY: &str = "regularizacao_ultimos_tres_meses";
/// Storage key of the holiday/boost event regularization.
pub const HOLIDAY_REG_KEY: &str = "regularization_feriados";

/// How seasonal components combine with the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonalityMode {
    Additive,
    Multiplicative,
}

impl SeasonalityMode {
    pub fn parse(text: &str) -> Result<Self> {
        match text {
            "additive" => Ok(Self::Additive),
            "multiplicative" => Ok(Self::Multiplicative),
            other => Err(DemandError::InvalidParameter(format!(
                "seasonality_mode must be additive or multiplicative, got {other:?}"
            ))),
        }
    }
}

/// Configuration of the [`ArNet`](crate::models::ArNet) model.
///
/// Mirrors the external model's constructor surface: gradient step and
/// epoch count, per-component regularization strengths, changepoint
/// count, seasonality switches and the two event regularizations.
#[derive(Debug, Clone)]
pub struct ArNetConfig {
    pub learning_rate: f64,
    pub epochs: usize,
    pub trend_reg: f64,
    pub ar_reg: f64,
    pub seasonality_reg: f64,
    pub n_changepoints: usize,
    pub seasonality_mode: SeasonalityMode,
    pub yearly_seasonality: bool,
    pub weekly_seasonality: bool,
    pub daily_seasonality: bool,
    /// Steps predicted per forward pass; fixed at 1 in production runs.
    pub n_forecasts: usize,
    pub loss: LossFunction,
    /// L2 strength of the last-three-months event regressor.
    pub recent_months_reg: f64,
    /// L2 strength of the end-of-month boost regressor.
    pub holiday_reg: f64,
    /// Autoregressive lag window, in days.
    pub n_lags: usize,
}

impl Default for ArNetConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            epochs: 30,
            trend_reg: 0.1,
            ar_reg: 1.0,
            seasonality_reg: 1.0,
            n_changepoints: 10,
            seasonality_mode: SeasonalityMode::Additive,
            yearly_seasonality: true,
            weekly_seasonality: true,
            daily_seasonality: false,
            n_forecasts: 1,
            loss: LossFunction::L1Loss,
            recent_months_reg: 1e-3,
            holiday_reg: 1.0,
            n_lags: 7,
        }
    }
}

impl ArNetConfig {
    /// Map a decoded parameter set onto the model configuration.
    ///
    /// Every search-space key must be present with its declared type.
    /// The loss reference defaults to the absolute-error loss when the
    /// stored record predates it; `n_forecasts` is always 1.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let loss = match params.get(LOSS_KEY) {
            Some(value) => value.as_loss().ok_or_else(|| {
                DemandError::InvalidParameter(format!(
                    "{LOSS_KEY} must be a loss reference, got {value:?}"
                ))
            })?,
            None => LossFunction::L1Loss,
        };

        Ok(Self {
            learning_rate: require_f64(params, "learning_rate")?,
            epochs: require_usize(params, "epochs")?,
            trend_reg: require_f64(params, "trend_reg")?,
            ar_reg: require_f64(params, "ar_reg")?,
            seasonality_reg: require_f64(params, "seasonality_reg")?,
            n_changepoints: require_usize(params, "n_changepoints")?,
            seasonality_mode: SeasonalityMode::parse(require_str(params, "seasonality_mode")?)?,
            yearly_seasonality: require_bool(params, "yearly_seasonality")?,
            weekly_seasonality: require_bool(params, "weekly_seasonality")?,
            daily_seasonality: require_bool(params, "daily_seasonality")?,
            n_forecasts: 1,
            loss,
            recent_months_reg: require_f64(params, RECENT_MONTHS_REG_KEY)?,
            holiday_reg: require_f64(params, HOLIDAY_REG_KEY)?,
            n_lags: ArNetConfig::default().n_lags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    fn full_params() -> ParamSet {
        let mut p = ParamSet::new();
        p.insert("learning_rate".into(), ParamValue::Float(0.02));
        p.insert("epochs".into(), ParamValue::Int(25));
        p.insert("trend_reg".into(), ParamValue::Float(0.5));
        p.insert("ar_reg".into(), ParamValue::Float(2.0));
        p.insert("seasonality_reg".into(), ParamValue::Float(3.0));
        p.insert("n_changepoints".into(), ParamValue::Int(12));
        p.insert(
            "seasonality_mode".into(),
            ParamValue::Str("multiplicative".into()),
        );
        p.insert("yearly_seasonality".into(), ParamValue::Bool(true));
        p.insert("weekly_seasonality".into(), ParamValue::Bool(false));
        p.insert("daily_seasonality".into(), ParamValue::Bool(false));
        p.insert(
            RECENT_MONTHS_REG_KEY.into(),
            ParamValue::Float(1e-4),
        );
        p.insert(HOLIDAY_REG_KEY.into(), ParamValue::Float(0.7));
        p.insert(LOSS_KEY.into(), ParamValue::Loss(LossFunction::L1Loss));
        p
    }

    #[test]
    fn maps_all_search_space_keys() {
        let config = ArNetConfig::from_params(&full_params()).unwrap();
        assert_eq!(config.epochs, 25);
        assert_eq!(config.n_changepoints, 12);
        assert_eq!(config.seasonality_mode, SeasonalityMode::Multiplicative);
        assert!(!config.weekly_seasonality);
        assert_eq!(config.n_forecasts, 1);
        assert_eq!(config.loss, LossFunction::L1Loss);
        assert_eq!(config.holiday_reg, 0.7);
    }

    #[test]
    fn missing_key_is_reported_by_name() {
        let mut params = full_params();
        params.remove("ar_reg");
        let err = ArNetConfig::from_params(&params).unwrap_err();
        assert_eq!(err, DemandError::MissingParameter("ar_reg".to_string()));
    }

    #[test]
    fn loss_defaults_to_absolute_error() {
        let mut params = full_params();
        params.remove(LOSS_KEY);
        let config = ArNetConfig::from_params(&params).unwrap();
        assert_eq!(config.loss, LossFunction::L1Loss);
    }

    #[test]
    fn wrong_type_is_invalid_parameter() {
        let mut params = full_params();
        params.insert("epochs".into(), ParamValue::Str("many".into()));
        assert!(matches!(
            ArNetConfig::from_params(&params),
            Err(DemandError::InvalidParameter(_))
        ));
    }

    #[test]
    fn seasonality_mode_rejects_unknown_values() {
        assert!(SeasonalityMode::parse("additive").is_ok());
        assert!(SeasonalityMode::parse("robust").is_err());
    }
}
