//! Test doubles shared by unit tests

use crate::error::ModelFault;
use crate::model::{ModelRegistry, Regressor};
use crate::types::{FeatureVector, Horizon};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Returns the spend of its own trailing window divided by 10
pub struct WindowSpendRegressor {
    pub window: Horizon,
}

impl Regressor for WindowSpendRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelFault> {
        Ok(features.spend(self.window) / 10.0)
    }

    fn name(&self) -> &str {
        "WindowSpend"
    }
}

/// Always returns the same value
pub struct ConstantRegressor(pub f64);

impl Regressor for ConstantRegressor {
    fn predict(&self, _features: &FeatureVector) -> Result<f64, ModelFault> {
        Ok(self.0)
    }

    fn name(&self) -> &str {
        "Constant"
    }
}

/// Always fails
pub struct FailingRegressor;

impl Regressor for FailingRegressor {
    fn predict(&self, _features: &FeatureVector) -> Result<f64, ModelFault> {
        Err(ModelFault::Other("feature shape mismatch".to_string()))
    }

    fn name(&self) -> &str {
        "Failing"
    }
}

/// Counts invocations and returns the first feature value
#[derive(Clone, Default)]
pub struct CountingRegressor {
    pub calls: Arc<AtomicUsize>,
}

impl Regressor for CountingRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelFault> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(features.values()[0])
    }

    fn name(&self) -> &str {
        "Counting"
    }
}

/// Registry where each horizon's stub reads its own spend window
pub fn window_spend_registry() -> ModelRegistry {
    registry_with(|h| Box::new(WindowSpendRegressor { window: h }))
}

/// Registry with one regressor per horizon built by `make`
pub fn registry_with(mut make: impl FnMut(Horizon) -> Box<dyn Regressor>) -> ModelRegistry {
    let entries = Horizon::ALL.into_iter().map(|h| (h, make(h))).collect();
    ModelRegistry::from_entries(entries).unwrap()
}

/// The reference customer record
pub fn sample_record() -> Map<String, Value> {
    match json!({
        "spend_past_30d": 100,
        "orders_past_30d": 2,
        "spend_past_60d": 150,
        "orders_past_60d": 3,
        "spend_past_90d": 200,
        "orders_past_90d": 4,
        "spend_past_180d": 300,
        "orders_past_180d": 5,
        "recency_days": 10
    }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}
