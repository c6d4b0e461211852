//! HTTP API for the prediction pipeline
//!
//! - `GET /` service banner
//! - `GET /health` liveness
//! - `POST /predict` one customer record in, one prediction per horizon out

use crate::config::ServerConfig;
use crate::error::ForecastError;
use crate::pipeline::PredictionPipeline;
use crate::types::ResponseNaming;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

/// State shared across handlers
pub struct ServerState {
    pub pipeline: PredictionPipeline,
    pub naming: ResponseNaming,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(pipeline: PredictionPipeline, naming: ResponseNaming) -> Self {
        Self {
            pipeline,
            naming,
            started_at: Utc::now(),
        }
    }
}

/// Banner returned by `GET /`
#[derive(Debug, Serialize)]
struct ServiceInfo {
    message: &'static str,
    version: &'static str,
    docs: &'static str,
    horizons: Vec<&'static str>,
    uptime_secs: i64,
}

/// Error body for `/predict`
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

/// Maps pipeline errors onto HTTP responses
pub struct ApiError(ForecastError);

impl From<ForecastError> for ApiError {
    fn from(e: ForecastError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ForecastError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self.0 {
            ForecastError::Validation(e) => ErrorBody {
                detail: e.to_string(),
                field: Some(e.field()),
            },
            // details stay in the log
            _ => ErrorBody {
                detail: "prediction failed".to_string(),
                field: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

async fn home(State(state): State<Arc<ServerState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Retail Spend Prediction API is running",
        version: env!("CARGO_PKG_VERSION"),
        docs: "/predict",
        horizons: state
            .pipeline
            .registry()
            .entries()
            .map(|(h, _)| h.key(state.naming))
            .collect(),
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    })
}

/// Health check
async fn health_check() -> &'static str {
    "OK"
}

async fn predict(
    State(state): State<Arc<ServerState>>,
    Json(record): Json<Map<String, Value>>,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();

    match state.pipeline.predict_record(&record) {
        Ok(result) => {
            tracing::info!(%request_id, "Prediction served for {} horizons", result.len());
            Ok(Json(result.labeled(state.naming)).into_response())
        }
        Err(e @ ForecastError::Validation(_)) => {
            tracing::info!(%request_id, "Rejected prediction request: {}", e);
            Err(e.into())
        }
        Err(e) => {
            tracing::error!(%request_id, "Prediction failed: {}", e);
            Err(e.into())
        }
    }
}

/// Create API router
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/predict", post(predict))
        .with_state(state)
}

/// Serve on an already bound listener until the task is dropped
pub async fn serve(listener: TcpListener, state: Arc<ServerState>) -> std::io::Result<()> {
    axum::serve(listener, create_router(state)).await
}

/// Bind the configured address and serve
pub async fn start_server(config: &ServerConfig, pipeline: PredictionPipeline) -> crate::error::Result<()> {
    let state = Arc::new(ServerState::new(pipeline, config.response_naming));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Prediction server listening on http://{}", listener.local_addr()?);

    serve(listener, state).await?;
    Ok(())
}
