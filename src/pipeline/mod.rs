//! Prediction pipeline
//!
//! ```text
//! record → validate → FeatureVector (canonical order) → every registered model → clamp at 0 → result
//! ```
//!
//! Stateless: every call is independent and only reads the shared registry.
//! A request either produces all horizons or fails as a whole.


use crate::error::{ForecastError, ModelFault, Result};
use crate::model::ModelRegistry;
use crate::types::{FeatureVector, PredictionResult};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Negative spend is meaningless, so predictions are floored at zero
pub fn clamp_at_zero(raw: f64) -> f64 {
    // also folds -0.0 into 0.0
    if raw > 0.0 {
        raw
    } else {
        0.0
    }
}

/// Runs one feature vector through every registered model
#[derive(Debug, Clone)]
pub struct PredictionPipeline {
    registry: Arc<ModelRegistry>,
}

impl PredictionPipeline {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Validate an untyped record, then predict. Invalid input never reaches a model.
    pub fn predict_record(&self, record: &Map<String, Value>) -> Result<PredictionResult> {
        let features = FeatureVector::from_record(record)?;
        self.predict(&features)
    }

    /// Predict every horizon for an already validated feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        let mut entries = Vec::with_capacity(self.registry.len());
        for (horizon, model) in self.registry.entries() {
            let raw = model
                .predict(features)
                .and_then(|y| if y.is_finite() { Ok(y) } else { Err(ModelFault::NonFinite(y)) })
                .map_err(|source| ForecastError::Inference { horizon, source })?;

            let value = clamp_at_zero(raw);
            debug!("{} ({}): raw={:.4} clamped={:.4}", horizon, model.name(), raw, value);
            entries.push((horizon, value));
        }
        Ok(entries.into_iter().collect())
    }
}
