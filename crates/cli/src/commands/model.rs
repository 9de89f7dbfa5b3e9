//! Training, forecasting and model inspection commands.

use anyhow::Result;
use trend_forecast_core::TrendModel;
use trend_forecast_data::CsvStorage;

use crate::context::AppContext;

/// Fits and persists a new model from the stored observations.
///
/// # Errors
/// Returns an error if there is too little or degenerate data, or the model
/// cannot be saved. The previously persisted model is left in place.
pub async fn run_train(ctx: &AppContext) -> Result<TrendModel> {
    let model = ctx.pipeline.train().await?;

    println!(
        "Training completed: {} samples, slope {:.6}/day, intercept {:.6}, r² {:.4}",
        model.sample_count, model.slope, model.intercept, model.r_squared
    );
    Ok(model)
}

/// Prints the 30-day forecast, or writes it as `date,predicted` CSV.
///
/// # Errors
/// Returns an error if no model has been trained or the output cannot be written.
pub async fn run_predict(ctx: &AppContext, output: Option<&str>) -> Result<()> {
    let points = ctx.pipeline.predict().await?;

    match output {
        Some(path) => {
            CsvStorage::write_forecast(path, &points)?;
            tracing::info!("Wrote {} forecast points to {}", points.len(), path);
        }
        None => println!("{}", serde_json::to_string_pretty(&points)?),
    }

    Ok(())
}

/// Prints the persisted model and whether it lags the stored observations.
///
/// # Errors
/// Returns an error if either store cannot be read.
pub async fn run_status(ctx: &AppContext) -> Result<()> {
    let status = ctx.pipeline.status().await?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use trend_forecast_core::{AppConfig, ModelBackend, ObservationInput};

    async fn open_temp(dir: &TempDir, backend: ModelBackend) -> AppContext {
        let mut config = AppConfig::default();
        config.database.url = format!("sqlite://{}", dir.path().join("obs.db").display());
        config.model.backend = backend;
        config.model.path = dir.path().join("model.json").display().to_string();
        AppContext::open(config).await.unwrap()
    }

    async fn seed(ctx: &AppContext) {
        for (date, value) in [("2024-01-01", 10.0), ("2024-01-02", 12.0), ("2024-01-03", 14.0)] {
            ctx.pipeline
                .add_observation(&ObservationInput::new(date, value))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_train_then_predict_to_csv() {
        let dir = TempDir::new().unwrap();
        let ctx = open_temp(&dir, ModelBackend::File).await;
        seed(&ctx).await;

        let model = run_train(&ctx).await.unwrap();
        assert_eq!(model.sample_count, 3);
        assert!(dir.path().join("model.json").exists());

        let out = dir.path().join("forecast.csv");
        run_predict(&ctx, Some(out.to_str().unwrap())).await.unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("date,predicted"));
        assert_eq!(lines.next(), Some("2024-01-04,16.0"));
        assert_eq!(content.lines().count(), 31);
    }

    #[tokio::test]
    async fn test_database_backend_leaves_no_model_file() {
        let dir = TempDir::new().unwrap();
        let ctx = open_temp(&dir, ModelBackend::Database).await;
        seed(&ctx).await;

        run_train(&ctx).await.unwrap();
        assert!(!dir.path().join("model.json").exists());
        assert!(ctx.pipeline.status().await.unwrap().trained);
    }

    #[tokio::test]
    async fn test_predict_without_model_fails() {
        let dir = TempDir::new().unwrap();
        let ctx = open_temp(&dir, ModelBackend::File).await;

        assert!(run_predict(&ctx, None).await.is_err());
    }
}
