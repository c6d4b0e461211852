//! Retail Spend Prediction
//!
//! Predicts a customer's future spend over four horizons from trailing
//! activity, using one independently trained model per horizon.
//!
//! ## Architecture
//!
//! ```text
//! HTTP (server) → PredictionPipeline → ModelRegistry (30d, 60d, 90d, 180d)
//!       ↑                                      ↑
//!   client / CLI                        JSON model artifacts
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod server;
pub mod types;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod config_tests;
