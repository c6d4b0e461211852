//! Ordinary least squares model

use super::Regressor;
use crate::error::ModelFault;
use crate::types::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

/// `intercept + Σ coefficient · feature`
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    intercept: f64,
    coefficients: [f64; FEATURE_COUNT],
}

impl LinearRegressor {
    /// Validate fitted parameters against the canonical feature layout
    pub fn new(
        intercept: f64,
        coefficients: Vec<f64>,
        feature_names: Option<&[String]>,
    ) -> Result<Self, String> {
        if let Some(names) = feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(format!(
                    "feature names {:?} do not match expected order {:?}",
                    names, FEATURE_NAMES
                ));
            }
        }

        let got = coefficients.len();
        let coefficients: [f64; FEATURE_COUNT] = coefficients
            .try_into()
            .map_err(|_| format!("expected {} coefficients, got {}", FEATURE_COUNT, got))?;

        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err("non-finite parameter".to_string());
        }

        Ok(Self {
            intercept,
            coefficients,
        })
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelFault> {
        let y = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.values())
                .map(|(c, x)| c * x)
                .sum::<f64>();
        if !y.is_finite() {
            return Err(ModelFault::NonFinite(y));
        }
        Ok(y)
    }

    fn name(&self) -> &str {
        "LinearRegression"
    }
}
