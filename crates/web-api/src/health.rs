//! Liveness endpoint.
//!
//! `GET /health` always answers `200`; the body reports whether the stores
//! were reachable when the request was served.

use axum::{extract::State, Json};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use trend_forecast_core::ForecastPipeline;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "ok" when both stores answered, "degraded" otherwise.
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub model_trained: bool,
    /// True when observations newer than the model's training window exist.
    pub stale: bool,
    pub latest_observation: Option<String>,
}

fn format_optional(date: Option<NaiveDate>) -> Option<String> {
    date.map(trend_forecast_core::format_date)
}

/// GET /health
pub async fn health(State(pipeline): State<Arc<ForecastPipeline>>) -> Json<HealthResponse> {
    let timestamp = Utc::now();

    let response = match pipeline.status().await {
        Ok(status) => HealthResponse {
            status: "ok".to_string(),
            timestamp,
            model_trained: status.trained,
            stale: status.stale,
            latest_observation: format_optional(status.latest_observation),
        },
        Err(e) => {
            tracing::error!("Health check could not reach stores: {}", e);
            HealthResponse {
                status: "degraded".to_string(),
                timestamp,
                model_trained: false,
                stale: false,
                latest_observation: None,
            }
        }
    };

    Json(response)
}
