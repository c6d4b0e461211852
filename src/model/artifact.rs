//! On-disk model artifacts
//!
//! Artifacts are JSON documents tagged by `kind`. Linear models carry the
//! fitted intercept and coefficients; gradient boosted models carry trees in
//! XGBoost's JSON dump layout.

use super::{LinearRegressor, Regressor, TreeEnsembleRegressor};
use crate::error::{ForecastError, Result};
use crate::types::Horizon;
use serde::Deserialize;
use std::path::Path;

/// Default XGBoost global bias when the artifact does not record one
pub const DEFAULT_BASE_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
        /// Column names the model was fitted on, if exported
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
    GradientBoosted {
        #[serde(default = "default_base_score")]
        base_score: f64,
        trees: Vec<TreeNode>,
    },
}

fn default_base_score() -> f64 {
    DEFAULT_BASE_SCORE
}

/// One node of an XGBoost JSON tree dump
#[derive(Debug, Clone, Deserialize)]
pub struct TreeNode {
    pub nodeid: u32,
    #[serde(default)]
    pub depth: Option<u32>,
    /// Feature name, or `fN` for an unnamed column
    #[serde(default)]
    pub split: Option<String>,
    #[serde(default)]
    pub split_condition: Option<f64>,
    #[serde(default)]
    pub yes: Option<u32>,
    #[serde(default)]
    pub no: Option<u32>,
    #[serde(default)]
    pub missing: Option<u32>,
    #[serde(default)]
    pub leaf: Option<f64>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl ModelArtifact {
    /// Parse an artifact from JSON text
    pub fn from_json(horizon: Horizon, text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| ForecastError::model_load(horizon, format!("invalid artifact: {}", e)))
    }

    /// Build the regressor this artifact describes
    pub fn into_regressor(self, horizon: Horizon) -> Result<Box<dyn Regressor>> {
        match self {
            Self::Linear {
                intercept,
                coefficients,
                feature_names,
            } => {
                let model = LinearRegressor::new(intercept, coefficients, feature_names.as_deref())
                    .map_err(|reason| ForecastError::model_load(horizon, reason))?;
                Ok(Box::new(model))
            }
            Self::GradientBoosted { base_score, trees } => {
                let model = TreeEnsembleRegressor::from_dump(base_score, &trees)
                    .map_err(|reason| ForecastError::model_load(horizon, reason))?;
                Ok(Box::new(model))
            }
        }
    }
}

pub(super) fn load_regressor(horizon: Horizon, path: &Path) -> Result<Box<dyn Regressor>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ForecastError::model_load(horizon, format!("cannot read {}: {}", path.display(), e))
    })?;
    ModelArtifact::from_json(horizon, &text)?.into_regressor(horizon)
}
