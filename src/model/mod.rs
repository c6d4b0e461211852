//! Trained regressors and the registry that holds them
//!
//! Each forecast horizon has its own independently trained model. Models are
//! decoded from artifacts once at startup and are read-only afterwards.

mod artifact;
mod linear;
mod tree;

pub use artifact::{ModelArtifact, TreeNode};
pub use linear::LinearRegressor;
pub use tree::TreeEnsembleRegressor;

use crate::error::{ForecastError, ModelFault, Result};
use crate::types::{FeatureVector, Horizon};
use std::path::PathBuf;

/// A trained model: one feature vector in, one scalar out
#[cfg_attr(test, mockall::automock)]
pub trait Regressor: Send + Sync {
    /// Raw (unclamped) prediction
    fn predict(&self, features: &FeatureVector) -> std::result::Result<f64, ModelFault>;

    /// Model family name for logging
    fn name(&self) -> &str;
}

/// Immutable set of one regressor per horizon
pub struct ModelRegistry {
    entries: Vec<(Horizon, Box<dyn Regressor>)>,
    // position in `entries` for each horizon, indexed by `Horizon::index`
    slots: [usize; 4],
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(h, m)| (h.label(), m.name())))
            .finish()
    }
}

impl ModelRegistry {
    /// Build a registry from constructed regressors.
    ///
    /// Every horizon must appear exactly once. Iteration order is the order given.
    pub fn from_entries(entries: Vec<(Horizon, Box<dyn Regressor>)>) -> Result<Self> {
        let mut slots = [None; 4];
        for (pos, (horizon, _)) in entries.iter().enumerate() {
            let slot = &mut slots[horizon.index()];
            if slot.is_some() {
                return Err(ForecastError::model_load(*horizon, "registered more than once"));
            }
            *slot = Some(pos);
        }

        let mut resolved = [0usize; 4];
        for horizon in Horizon::ALL {
            resolved[horizon.index()] = slots[horizon.index()]
                .ok_or_else(|| ForecastError::model_load(horizon, "no model registered"))?;
        }

        Ok(Self {
            entries,
            slots: resolved,
        })
    }

    /// Decode every artifact. Fails on the first missing or invalid one.
    pub fn load(sources: &[(Horizon, PathBuf)]) -> Result<Self> {
        let mut entries: Vec<(Horizon, Box<dyn Regressor>)> = Vec::with_capacity(sources.len());
        for (horizon, path) in sources {
            let model = artifact::load_regressor(*horizon, path)?;
            tracing::info!(
                "Loaded {} model for {} from {}",
                model.name(),
                horizon,
                path.display()
            );
            entries.push((*horizon, model));
        }
        Self::from_entries(entries)
    }

    /// Regressor for a horizon
    pub fn get(&self, horizon: Horizon) -> &dyn Regressor {
        self.entries[self.slots[horizon.index()]].1.as_ref()
    }

    /// All entries in registration order
    pub fn entries(&self) -> impl Iterator<Item = (Horizon, &dyn Regressor)> + '_ {
        self.entries.iter().map(|(h, m)| (*h, m.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
