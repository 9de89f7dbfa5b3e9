pub mod config;
pub mod config_loader;
pub mod encoder;
pub mod error;
pub mod forecast;
pub mod model;
pub mod observation;
pub mod pipeline;
pub mod traits;

pub use config::{AppConfig, DatabaseConfig, ModelBackend, ModelStoreConfig, ServerConfig};
pub use config_loader::ConfigLoader;
pub use encoder::{encode, EncodedBatch, EncodedSample, MIN_TRAINING_SAMPLES};
pub use error::{ForecastError, Result};
pub use forecast::{generate, ForecastPoint, FORECAST_HORIZON_DAYS};
pub use model::{linear_regression, LineFit, TrendModel};
pub use observation::{format_date, parse_date, Observation, ObservationInput, DATE_FORMAT};
pub use pipeline::{ForecastPipeline, ModelStatus};
pub use traits::{ModelStore, ObservationStore};
