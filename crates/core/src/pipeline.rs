//! Pipeline orchestration.
//!
//! Coordinates the training path (query, encode, fit, persist) and the
//! prediction path (load, anchor, generate) over injected stores.
//!
//! ```text
//! add_observation -> ObservationInput::validate -> ObservationStore::append
//! train           -> query_trainable -> encode -> TrendModel::fit -> ModelStore::save
//! predict         -> ModelStore::load -> latest_date (or today) -> generate(30)
//! ```

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::encoder::encode;
use crate::error::Result;
use crate::forecast::{generate, ForecastPoint, FORECAST_HORIZON_DAYS};
use crate::model::TrendModel;
use crate::observation::{sort_by_date, Observation, ObservationInput};
use crate::traits::{ModelStore, ObservationStore};

/// Snapshot of the persisted model relative to the stored observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub trained: bool,
    pub model: Option<TrendModel>,
    #[serde(default, with = "optional_date")]
    pub latest_observation: Option<NaiveDate>,
    /// True when observations newer than the model's training window exist
    pub stale: bool,
}

/// Orchestrates ingest, training and prediction.
#[derive(Clone)]
pub struct ForecastPipeline {
    observations: Arc<dyn ObservationStore>,
    models: Arc<dyn ModelStore>,
}

impl ForecastPipeline {
    #[must_use]
    pub fn new(observations: Arc<dyn ObservationStore>, models: Arc<dyn ModelStore>) -> Self {
        Self {
            observations,
            models,
        }
    }

    /// Validates and stores a new observation.
    ///
    /// # Errors
    /// Returns `ForecastError::Validation` for malformed input (the store is not
    /// touched) or `ForecastError::Storage` if the write fails.
    pub async fn add_observation(&self, input: &ObservationInput) -> Result<Observation> {
        let observation = input.validate()?;
        self.observations.append(&observation).await?;

        debug!(
            date = %observation.date,
            value = observation.value,
            "Stored observation"
        );

        Ok(observation)
    }

    /// Returns all observations sorted by date.
    ///
    /// # Errors
    /// Returns `ForecastError::Storage` if the store cannot be read.
    pub async fn list_observations(&self) -> Result<Vec<Observation>> {
        let mut observations = self.observations.query_all().await?;
        sort_by_date(&mut observations);
        Ok(observations)
    }

    /// Fits a new model on every trainable observation and persists it.
    ///
    /// The persisted model is only replaced after a successful fit.
    ///
    /// # Errors
    /// Returns `ForecastError::InsufficientData` for fewer than two observations,
    /// `ForecastError::DegenerateInput` when they all share one date, or
    /// `ForecastError::Storage` on store failures.
    pub async fn train(&self) -> Result<TrendModel> {
        let observations = self.observations.query_trainable().await?;

        let batch = encode(&observations).inspect_err(|e| {
            warn!(samples = observations.len(), error = %e, "Training rejected");
        })?;
        let model = TrendModel::fit(&batch, Utc::now()).inspect_err(|e| {
            warn!(samples = batch.len(), error = %e, "Training rejected");
        })?;

        self.models.save(&model).await?;

        info!(
            samples = model.sample_count,
            slope = model.slope,
            intercept = model.intercept,
            r_squared = model.r_squared,
            base_date = %model.base_date,
            end_date = %model.end_date,
            "Trained trend model"
        );

        Ok(model)
    }

    /// Forecasts the next 30 days, falling back to today's UTC date as the
    /// anchor when no observations are stored.
    ///
    /// # Errors
    /// Returns `ForecastError::ModelNotTrained` if no model was ever persisted, or
    /// `ForecastError::Storage` on store failures.
    pub async fn predict(&self) -> Result<Vec<ForecastPoint>> {
        self.predict_at(Utc::now().date_naive()).await
    }

    /// Forecasts the next 30 days using `today` as the empty-store anchor.
    ///
    /// # Errors
    /// Same as [`ForecastPipeline::predict`].
    pub async fn predict_at(&self, today: NaiveDate) -> Result<Vec<ForecastPoint>> {
        let model = self.models.load().await?;
        let latest = self.observations.latest_date().await?;

        let anchor = match latest {
            Some(date) => {
                if model.is_stale(date) {
                    warn!(
                        model_end_date = %model.end_date,
                        latest_observation = %date,
                        "Serving forecast from stale model"
                    );
                }
                date
            }
            None => {
                debug!(anchor = %today, "No stored observations, anchoring on today");
                today
            }
        };

        let points = generate(&model, anchor, FORECAST_HORIZON_DAYS);

        debug!(anchor = %anchor, points = points.len(), "Generated forecast");

        Ok(points)
    }

    /// Reports whether a model exists and whether newer observations arrived since.
    ///
    /// # Errors
    /// Returns `ForecastError::Storage` on store failures.
    pub async fn status(&self) -> Result<ModelStatus> {
        let model = self.models.load_optional().await?;
        let latest_observation = self.observations.latest_date().await?;

        let stale = match (&model, latest_observation) {
            (Some(model), Some(latest)) => model.is_stale(latest),
            _ => false,
        };

        Ok(ModelStatus {
            trained: model.is_some(),
            model,
            latest_observation,
            stale,
        })
    }
}

mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        date.map(crate::observation::format_date)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| crate::observation::parse_date(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
