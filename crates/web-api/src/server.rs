use crate::{handlers, health};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use trend_forecast_core::ForecastPipeline;

pub struct ApiServer {
    pipeline: Arc<ForecastPipeline>,
}

impl ApiServer {
    #[must_use]
    pub const fn new(pipeline: Arc<ForecastPipeline>) -> Self {
        Self { pipeline }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/data", get(handlers::list_observations))
            .route("/add", post(handlers::add_observation))
            .route("/train", post(handlers::train))
            .route("/predict", get(handlers::predict))
            .route("/model", get(handlers::model_status))
            .route("/health", get(health::health))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.pipeline.clone())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Forecast API listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
