//! Hyperparameter values, sets and the string storage codec.

pub mod codec;

pub use codec::{decode, decode_params, encode, encode_params, StoredParam};

use crate::error::{DemandError, Result};
use std::collections::BTreeMap;

/// A flat hyperparameter mapping, keyed by parameter name.
pub type ParamSet = BTreeMap<String, ParamValue>;

/// Supported loss functions, resolved by name.
///
/// The stored form carries a `nn.`-style prefixed reference; this enum
/// is the closed lookup table those references resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossFunction {
    /// Mean absolute error.
    L1Loss,
    /// Mean squared error.
    MSELoss,
    /// Huber loss with unit threshold.
    HuberLoss,
}

impl LossFunction {
    /// Bare name, as used for lookup.
    pub fn name(&self) -> &'static str {
        match self {
            Self::L1Loss => "L1Loss",
            Self::MSELoss => "MSELoss",
            Self::HuberLoss => "HuberLoss",
        }
    }

    /// Registered storage name, including the reserved prefix.
    pub fn registered_name(&self) -> String {
        format!("{}{}", codec::LOSS_PREFIX, self.name())
    }

    /// Resolve a bare name against the lookup table.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "L1Loss" => Some(Self::L1Loss),
            "MSELoss" => Some(Self::MSELoss),
            "HuberLoss" => Some(Self::HuberLoss),
            _ => None,
        }
    }
}

/// A single typed hyperparameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Loss(LossFunction),
}

impl ParamValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_loss(&self) -> Option<LossFunction> {
        match self {
            Self::Loss(v) => Some(*v),
            _ => None,
        }
    }
}

/// Fetch a required float parameter.
pub fn require_f64(params: &ParamSet, key: &str) -> Result<f64> {
    let value = params
        .get(key)
        .ok_or_else(|| DemandError::MissingParameter(key.to_string()))?;
    value
        .as_f64()
        .ok_or_else(|| DemandError::InvalidParameter(format!("{key} must be numeric, got {value:?}")))
}

/// Fetch a required integer parameter, accepting whole floats.
pub fn require_usize(params: &ParamSet, key: &str) -> Result<usize> {
    let value = params
        .get(key)
        .ok_or_else(|| DemandError::MissingParameter(key.to_string()))?;
    let as_int = match value {
        ParamValue::Int(v) => Some(*v),
        ParamValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
        _ => None,
    };
    match as_int {
        Some(v) if v >= 0 => Ok(v as usize),
        _ => Err(DemandError::InvalidParameter(format!(
            "{key} must be a non-negative integer, got {value:?}"
        ))),
    }
}

/// Fetch a required boolean parameter.
pub fn require_bool(params: &ParamSet, key: &str) -> Result<bool> {
    let value = params
        .get(key)
        .ok_or_else(|| DemandError::MissingParameter(key.to_string()))?;
    value
        .as_bool()
        .ok_or_else(|| DemandError::InvalidParameter(format!("{key} must be a boolean, got {value:?}")))
}

/// Fetch a required categorical string parameter.
pub fn require_str<'a>(params: &'a ParamSet, key: &str) -> Result<&'a str> {
    let value = params
        .get(key)
        .ok_or_else(|| DemandError::MissingParameter(key.to_string()))?;
    value
        .as_str()
        .ok_or_else(|| DemandError::InvalidParameter(format!("{key} must be a string, got {value:?}")))
}
