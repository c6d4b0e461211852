//! HTTP client for the prediction API
//!
//! Used by the `predict` subcommand to submit one customer record and
//! render the returned spend forecast.

use crate::config::ClientConfig;
use crate::error::{ForecastError, Result};
use crate::types::{CustomerActivity, Horizon, PredictionResult};
use reqwest::Client;
use serde_json::{Map, Value};
use std::fmt::Write;
use std::time::Duration;
use tracing::debug;

/// Prediction API client
#[derive(Clone)]
pub struct SpendClient {
    http: Client,
    base_url: String,
}

impl SpendClient {
    /// Create a new client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Check that the server is up
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.http.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Submit one record. Any non-success status is an [`ForecastError::Api`].
    pub async fn predict(&self, activity: &CustomerActivity) -> Result<PredictionResult> {
        let url = format!("{}/predict", self.base_url);
        let resp = self.http.post(&url).json(activity).send().await?;

        let status = resp.status();
        if !status.is_success() {
            debug!("Prediction request returned {}", status);
            return Err(ForecastError::Api {
                status: status.as_u16(),
            });
        }

        let body: Map<String, Value> = resp.json().await?;
        PredictionResult::from_response(&body).ok_or(ForecastError::Api {
            status: status.as_u16(),
        })
    }
}

/// Human-readable label for a horizon
pub fn horizon_title(horizon: Horizon) -> String {
    format!("Next {} Days", horizon.days())
}

/// Render predictions two per row, like the dashboard cards
pub fn render(result: &PredictionResult, currency: &str) -> String {
    let cells: Vec<String> = result
        .iter()
        .map(|(h, v)| format!("{:<14} {} {:.2}", horizon_title(h), currency, v))
        .collect();

    let mut out = String::new();
    for row in cells.chunks(2) {
        let _ = writeln!(out, "{}", row.join("    "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_base_url() {
        let client = SpendClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_render_two_per_row() {
        let result: PredictionResult = vec![
            (Horizon::Days30, 10.0),
            (Horizon::Days60, 15.5),
            (Horizon::Days90, 20.0),
            (Horizon::Days180, 30.25),
        ]
        .into_iter()
        .collect();

        let text = render(&result, "₹");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Next 30 Days"));
        assert!(lines[0].contains("₹ 10.00"));
        assert!(lines[0].contains("₹ 15.50"));
        assert!(lines[1].contains("Next 180 Days"));
        assert!(lines[1].contains("₹ 30.25"));
    }

    #[tokio::test]
    async fn test_predict_unreachable_server_is_error() {
        // port 9 (discard) is not expected to host an HTTP server
        let client = SpendClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let activity = CustomerActivity {
            spend_past_30d: 1.0,
            orders_past_30d: 1,
            spend_past_60d: 1.0,
            orders_past_60d: 1,
            spend_past_90d: 1.0,
            orders_past_90d: 1,
            spend_past_180d: 1.0,
            orders_past_180d: 1,
            recency_days: 1,
        };
        assert!(client.predict(&activity).await.is_err());
    }
}
