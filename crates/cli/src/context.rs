//! Wiring from configuration to a ready pipeline.

use std::sync::Arc;

use anyhow::Result;
use trend_forecast_core::{AppConfig, ForecastPipeline, ModelBackend, ModelStore};
use trend_forecast_data::{DatabaseClient, FileModelStore, ObservationRepository, Repositories};

/// Open stores plus the pipeline built over them.
pub struct AppContext {
    pub config: AppConfig,
    pub database: DatabaseClient,
    pub observations: ObservationRepository,
    pub pipeline: Arc<ForecastPipeline>,
}

impl AppContext {
    /// Opens the observation database and the configured model store.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn open(config: AppConfig) -> Result<Self> {
        tracing::info!("Opening observation database at {}", config.database.url);
        let database =
            DatabaseClient::new(&config.database.url, config.database.max_connections).await?;
        let repos = Repositories::new(database.pool().clone());

        let models: Arc<dyn ModelStore> = match config.model.backend {
            ModelBackend::File => {
                tracing::info!("Persisting model to file {}", config.model.path);
                Arc::new(FileModelStore::new(&config.model.path))
            }
            ModelBackend::Database => {
                tracing::info!("Persisting model to the observation database");
                Arc::new(repos.model)
            }
        };

        let observations = repos.observations;
        let pipeline = Arc::new(ForecastPipeline::new(
            Arc::new(observations.clone()),
            models,
        ));

        Ok(Self {
            config,
            database,
            observations,
            pipeline,
        })
    }

    pub async fn close(self) {
        self.database.close().await;
    }
}
