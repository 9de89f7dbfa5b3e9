//! Trend model persistence to a JSON file, surviving restarts.
//!
//! Saves never modify the target file in place: the model is written to a
//! uniquely named sibling file, flushed to disk, then renamed over the target.
//! A concurrent reader therefore sees either the previous model or the new one.
//!
//! # Example
//!
//! ```ignore
//! use trend_forecast_data::FileModelStore;
//! use trend_forecast_core::ModelStore;
//!
//! let store = FileModelStore::new("data/model.json");
//! store.save(&model).await?;
//! let model = store.load().await?; // ModelNotTrained if never saved
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use trend_forecast_core::{ForecastError, ModelStore, TrendModel};

/// Distinguishes temp files of concurrent saves within one process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persists the current model as a single JSON document.
#[derive(Debug, Clone)]
pub struct FileModelStore {
    /// Path to the model file.
    path: PathBuf,
}

impl FileModelStore {
    /// Creates a new store for the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the model file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if a model file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map_or_else(|| "model".into(), |n| n.to_string_lossy().into_owned());
        let unique = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.path
            .with_file_name(format!(".{name}.{}.{unique}.tmp", std::process::id()))
    }

    /// Writes the model to disk atomically.
    ///
    /// Creates parent directories if they don't exist.
    ///
    /// # Errors
    /// Returns an error if serialization, writing, or the final rename fails. On
    /// failure the previous model file is left untouched.
    pub async fn write(&self, model: &TrendModel) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create model directory: {}", parent.display())
                })?;
            }
        }

        let bytes = serde_json::to_vec_pretty(model).context("Failed to serialize model")?;
        let temp = self.temp_path();

        let result = async {
            let mut file = fs::File::create(&temp)
                .await
                .with_context(|| format!("Failed to create {}", temp.display()))?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
            drop(file);

            fs::rename(&temp, &self.path).await.with_context(|| {
                format!(
                    "Failed to move {} over {}",
                    temp.display(),
                    self.path.display()
                )
            })
        }
        .await;

        if result.is_err() {
            let _ = fs::remove_file(&temp).await;
        }
        result?;

        debug!(
            path = %self.path.display(),
            samples = model.sample_count,
            "Saved trend model file"
        );

        Ok(())
    }

    /// Reads the model from disk, `None` if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not hold a valid model.
    pub async fn read(&self) -> Result<Option<TrendModel>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No persisted model file found");
                return Ok(None);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        let model: TrendModel = serde_json::from_slice(&bytes)
            .with_context(|| format!("Corrupt model file {}", self.path.display()))?;

        Ok(Some(model))
    }
}

#[async_trait]
impl ModelStore for FileModelStore {
    async fn save(&self, model: &TrendModel) -> trend_forecast_core::Result<()> {
        self.write(model).await.map_err(ForecastError::storage)
    }

    async fn load_optional(&self) -> trend_forecast_core::Result<Option<TrendModel>> {
        self.read().await.map_err(ForecastError::storage)
    }
}

// =============================================================================
// Tests
// =============================================================================
