use crate::error::ApiError;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use trend_forecast_core::{
    ForecastPipeline, ForecastPoint, ModelStatus, Observation, ObservationInput,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainResponse {
    pub message: String,
    pub sample_count: usize,
}

/// Lists all stored observations, sorted by date.
///
/// # Errors
/// Returns `500` if the observation store cannot be read.
pub async fn list_observations(
    State(pipeline): State<Arc<ForecastPipeline>>,
) -> Result<Json<Vec<Observation>>, ApiError> {
    let observations = pipeline.list_observations().await?;
    Ok(Json(observations))
}

/// Stores a new observation from `{"date": "YYYY-MM-DD", "actual": <number>}`.
///
/// # Errors
/// Returns `400` for a malformed body or invalid observation, `500` if the
/// write fails.
pub async fn add_observation(
    State(pipeline): State<Arc<ForecastPipeline>>,
    payload: Result<Json<ObservationInput>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(input) = payload?;
    pipeline.add_observation(&input).await?;

    Ok(Json(MessageResponse {
        message: "Data added successfully".to_string(),
    }))
}

/// Fits and persists a new trend model.
///
/// # Errors
/// Returns `400` if there are fewer than two usable observations or they all
/// share one date, `500` on store failures.
pub async fn train(
    State(pipeline): State<Arc<ForecastPipeline>>,
) -> Result<Json<TrainResponse>, ApiError> {
    let model = pipeline.train().await?;

    Ok(Json(TrainResponse {
        message: "Training completed".to_string(),
        sample_count: model.sample_count,
    }))
}

/// Returns the 30-day forecast following the latest stored observation.
///
/// # Errors
/// Returns `400` if no model has been trained, `500` on store failures.
pub async fn predict(
    State(pipeline): State<Arc<ForecastPipeline>>,
) -> Result<Json<Vec<ForecastPoint>>, ApiError> {
    let points = pipeline.predict().await?;
    Ok(Json(points))
}

/// Describes the persisted model and whether newer observations exist.
///
/// # Errors
/// Returns `500` on store failures.
pub async fn model_status(
    State(pipeline): State<Arc<ForecastPipeline>>,
) -> Result<Json<ModelStatus>, ApiError> {
    let status = pipeline.status().await?;
    Ok(Json(status))
}
