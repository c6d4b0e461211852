//! Core types: horizons, the feature vector and prediction results

use crate::error::ValidationError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Canonical feature order. Models were trained on exactly this column order.
pub const FEATURE_NAMES: [&str; 9] = [
    "spend_past_30d",
    "orders_past_30d",
    "spend_past_60d",
    "orders_past_60d",
    "spend_past_90d",
    "orders_past_90d",
    "spend_past_180d",
    "orders_past_180d",
    "recency_days",
];

/// Number of model input features
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Forecast window with its own independently trained model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "60d")]
    Days60,
    #[serde(rename = "90d")]
    Days90,
    #[serde(rename = "180d")]
    Days180,
}

impl Horizon {
    /// All horizons in declaration order
    pub const ALL: [Horizon; 4] = [Self::Days30, Self::Days60, Self::Days90, Self::Days180];

    /// Internal label ("30d", ...)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Days30 => "30d",
            Self::Days60 => "60d",
            Self::Days90 => "90d",
            Self::Days180 => "180d",
        }
    }

    /// Presentation-facing response key ("spend_next_30d", ...)
    pub fn presentation_name(&self) -> &'static str {
        match self {
            Self::Days30 => "spend_next_30d",
            Self::Days60 => "spend_next_60d",
            Self::Days90 => "spend_next_90d",
            Self::Days180 => "spend_next_180d",
        }
    }

    /// Default artifact file name for this horizon
    pub fn default_artifact(&self) -> &'static str {
        match self {
            Self::Days30 => "LinearRegression_30d.json",
            Self::Days60 => "XGBoost_60d.json",
            Self::Days90 => "XGBoost_90d.json",
            Self::Days180 => "XGBoost_180d.json",
        }
    }

    /// Length of the window in days
    pub fn days(&self) -> u32 {
        match self {
            Self::Days30 => 30,
            Self::Days60 => 60,
            Self::Days90 => 90,
            Self::Days180 => 180,
        }
    }

    /// Position in [`Horizon::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Self::Days30 => 0,
            Self::Days60 => 1,
            Self::Days90 => 2,
            Self::Days180 => 3,
        }
    }

    /// Key under the given response naming
    pub fn key(&self, naming: ResponseNaming) -> &'static str {
        match naming {
            ResponseNaming::Horizon => self.label(),
            ResponseNaming::Presentation => self.presentation_name(),
        }
    }

    /// Resolve a response key under either naming
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|h| h.label() == key || h.presentation_name() == key)
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Horizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|h| h.label() == s)
            .ok_or_else(|| format!("unknown horizon: {}", s))
    }
}

/// How prediction keys are named in responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseNaming {
    /// "30d", "60d", ...
    #[default]
    Horizon,
    /// "spend_next_30d", ...
    Presentation,
}

/// Customer activity as submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerActivity {
    pub spend_past_30d: f64,
    pub orders_past_30d: u64,
    pub spend_past_60d: f64,
    pub orders_past_60d: u64,
    pub spend_past_90d: f64,
    pub orders_past_90d: u64,
    pub spend_past_180d: f64,
    pub orders_past_180d: u64,
    pub recency_days: u64,
}

/// Validated model input. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    spend_past_30d: f64,
    orders_past_30d: u64,
    spend_past_60d: f64,
    orders_past_60d: u64,
    spend_past_90d: f64,
    orders_past_90d: u64,
    spend_past_180d: f64,
    orders_past_180d: u64,
    recency_days: u64,
}

impl FeatureVector {
    /// Validate an untyped JSON record and project it into canonical order.
    ///
    /// Unknown keys are ignored. Fields are checked in canonical order and
    /// the first failure is returned.
    pub fn from_record(record: &Map<String, Value>) -> Result<Self, ValidationError> {
        Ok(Self {
            spend_past_30d: spend_field(record, "spend_past_30d")?,
            orders_past_30d: count_field(record, "orders_past_30d")?,
            spend_past_60d: spend_field(record, "spend_past_60d")?,
            orders_past_60d: count_field(record, "orders_past_60d")?,
            spend_past_90d: spend_field(record, "spend_past_90d")?,
            orders_past_90d: count_field(record, "orders_past_90d")?,
            spend_past_180d: spend_field(record, "spend_past_180d")?,
            orders_past_180d: count_field(record, "orders_past_180d")?,
            recency_days: count_field(record, "recency_days")?,
        })
    }

    /// Feature values in canonical order
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.spend_past_30d,
            self.orders_past_30d as f64,
            self.spend_past_60d,
            self.orders_past_60d as f64,
            self.spend_past_90d,
            self.orders_past_90d as f64,
            self.spend_past_180d,
            self.orders_past_180d as f64,
            self.recency_days as f64,
        ]
    }

    /// Spend over the trailing window matching `horizon`
    pub fn spend(&self, horizon: Horizon) -> f64 {
        match horizon {
            Horizon::Days30 => self.spend_past_30d,
            Horizon::Days60 => self.spend_past_60d,
            Horizon::Days90 => self.spend_past_90d,
            Horizon::Days180 => self.spend_past_180d,
        }
    }

    /// Order count over the trailing window matching `horizon`
    pub fn orders(&self, horizon: Horizon) -> u64 {
        match horizon {
            Horizon::Days30 => self.orders_past_30d,
            Horizon::Days60 => self.orders_past_60d,
            Horizon::Days90 => self.orders_past_90d,
            Horizon::Days180 => self.orders_past_180d,
        }
    }

    pub fn recency_days(&self) -> u64 {
        self.recency_days
    }

    /// Position of a named feature in the canonical order
    pub fn feature_index(name: &str) -> Option<usize> {
        FEATURE_NAMES.iter().position(|f| *f == name)
    }
}

impl TryFrom<CustomerActivity> for FeatureVector {
    type Error = ValidationError;

    fn try_from(a: CustomerActivity) -> Result<Self, Self::Error> {
        Ok(Self {
            spend_past_30d: check_spend("spend_past_30d", a.spend_past_30d)?,
            orders_past_30d: a.orders_past_30d,
            spend_past_60d: check_spend("spend_past_60d", a.spend_past_60d)?,
            orders_past_60d: a.orders_past_60d,
            spend_past_90d: check_spend("spend_past_90d", a.spend_past_90d)?,
            orders_past_90d: a.orders_past_90d,
            spend_past_180d: check_spend("spend_past_180d", a.spend_past_180d)?,
            orders_past_180d: a.orders_past_180d,
            recency_days: a.recency_days,
        })
    }
}

fn present<'a>(record: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, ValidationError> {
    match record.get(name) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(name)),
        Some(v) => Ok(v),
    }
}

fn check_spend(name: &'static str, x: f64) -> Result<f64, ValidationError> {
    if !x.is_finite() {
        return Err(ValidationError::NotNumber(name));
    }
    if x < 0.0 {
        return Err(ValidationError::Negative(name));
    }
    Ok(x)
}

fn spend_field(record: &Map<String, Value>, name: &'static str) -> Result<f64, ValidationError> {
    let x = present(record, name)?
        .as_f64()
        .ok_or(ValidationError::NotNumber(name))?;
    check_spend(name, x)
}

fn count_field(record: &Map<String, Value>, name: &'static str) -> Result<u64, ValidationError> {
    let value = present(record, name)?;
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    // an i64 that is not a u64 is negative
    if value.as_i64().is_some() {
        return Err(ValidationError::Negative(name));
    }
    let x = value.as_f64().ok_or(ValidationError::NotNumber(name))?;
    if x < 0.0 {
        return Err(ValidationError::Negative(name));
    }
    if x.fract() != 0.0 || x >= u64::MAX as f64 {
        return Err(ValidationError::NotInteger(name));
    }
    Ok(x as u64)
}

/// Non-negative spend prediction per horizon, in registry order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictionResult {
    entries: Vec<(Horizon, f64)>,
}

impl PredictionResult {
    /// Predicted spend for a horizon
    pub fn get(&self, horizon: Horizon) -> Option<f64> {
        self.entries
            .iter()
            .find(|(h, _)| *h == horizon)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Horizon, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Horizons present, in order
    pub fn horizons(&self) -> Vec<Horizon> {
        self.entries.iter().map(|(h, _)| *h).collect()
    }

    /// Serializable view keyed under the given naming
    pub fn labeled(&self, naming: ResponseNaming) -> LabeledPrediction<'_> {
        LabeledPrediction { result: self, naming }
    }

    /// Rebuild from a response object keyed under either naming.
    /// Returns `None` unless every horizon appears exactly once with a
    /// numeric value.
    pub fn from_response(body: &Map<String, Value>) -> Option<Self> {
        let mut slots: [Option<f64>; 4] = [None; 4];
        for (key, value) in body {
            let horizon = Horizon::from_key(key)?;
            let slot = &mut slots[horizon.index()];
            if slot.is_some() {
                return None;
            }
            *slot = Some(value.as_f64()?);
        }

        Horizon::ALL
            .into_iter()
            .map(|h| slots[h.index()].map(|v| (h, v)))
            .collect::<Option<Vec<_>>>()
            .map(|entries| Self { entries })
    }
}

impl FromIterator<(Horizon, f64)> for PredictionResult {
    fn from_iter<I: IntoIterator<Item = (Horizon, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A [`PredictionResult`] paired with the key naming used to serialize it
pub struct LabeledPrediction<'a> {
    result: &'a PredictionResult,
    naming: ResponseNaming,
}

impl Serialize for LabeledPrediction<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.result.len()))?;
        for (horizon, value) in self.result.iter() {
            map.serialize_entry(horizon.key(self.naming), &value)?;
        }
        map.end()
    }
}
