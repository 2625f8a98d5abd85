//! Fitted feature scalers.
//!
//! The scaler is produced outside this crate and persisted as JSON tagged by
//! `"type"`. Only the fitted parameters are stored; fitting is never done here.

use crate::error::{ServingError, ServingResult};
use serde::{Deserialize, Serialize};

/// A fitted scaler as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scaler {
    /// Standardization: `(x - mean) / scale`.
    Standard(StandardScaler),
    /// Range scaling: `x * scale + min`.
    MinMax(MinMaxScaler),
}

/// Per-feature mean and standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean subtracted from each feature
    pub mean: Vec<f64>,
    /// Divisor applied after centering
    pub scale: Vec<f64>,
}

/// Per-feature offset and multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    /// Offset added after scaling
    pub min: Vec<f64>,
    /// Multiplier applied first
    pub scale: Vec<f64>,
}

impl Scaler {
    /// Short name used in logs and the health report.
    pub fn kind(&self) -> &'static str {
        match self {
            Scaler::Standard(_) => "standard",
            Scaler::MinMax(_) => "min_max",
        }
    }

    /// Number of features the scaler was fitted on.
    pub fn n_features(&self) -> usize {
        match self {
            Scaler::Standard(s) => s.mean.len(),
            Scaler::MinMax(s) => s.min.len(),
        }
    }

    /// Check that the stored parameters are usable.
    pub fn validate(&self) -> Result<(), String> {
        let (offsets, scale) = match self {
            Scaler::Standard(s) => (&s.mean, &s.scale),
            Scaler::MinMax(s) => (&s.min, &s.scale),
        };
        if offsets.is_empty() {
            return Err("scaler has no features".to_string());
        }
        if offsets.len() != scale.len() {
            return Err(format!(
                "parameter lengths differ ({} vs {})",
                offsets.len(),
                scale.len()
            ));
        }
        if offsets.iter().chain(scale).any(|v| !v.is_finite()) {
            return Err("parameters must be finite".to_string());
        }
        if let Scaler::Standard(s) = self {
            if let Some(idx) = s.scale.iter().position(|&v| v == 0.0) {
                return Err(format!("scale[{idx}] is zero"));
            }
        }
        Ok(())
    }

    /// Apply the fitted transformation to one row.
    pub fn transform(&self, row: &[f64]) -> ServingResult<Vec<f64>> {
        if row.len() != self.n_features() {
            return Err(ServingError::dimension_mismatch(
                "scaler",
                self.n_features(),
                row.len(),
            ));
        }
        let out = match self {
            Scaler::Standard(s) => row
                .iter()
                .zip(s.mean.iter().zip(&s.scale))
                .map(|(x, (m, sc))| (x - m) / sc)
                .collect(),
            Scaler::MinMax(s) => row
                .iter()
                .zip(s.min.iter().zip(&s.scale))
                .map(|(x, (mn, sc))| x * sc + mn)
                .collect(),
        };
        Ok(out)
    }
}
