//! Observation ingest and listing commands.

use anyhow::{Context, Result};
use trend_forecast_core::ObservationInput;
use trend_forecast_data::CsvStorage;

use crate::context::AppContext;

/// Validates and stores a single observation.
///
/// # Errors
/// Returns an error if the observation is invalid or cannot be stored.
pub async fn run_add(ctx: &AppContext, date: &str, value: f64) -> Result<()> {
    let observation = ctx
        .pipeline
        .add_observation(&ObservationInput::new(date, value))
        .await?;

    println!("{}", serde_json::to_string(&observation)?);
    Ok(())
}

/// Prints every stored observation as JSON sorted by date, or exports it as
/// `date,actual` CSV.
///
/// # Errors
/// Returns an error if the store cannot be read or the output cannot be written.
pub async fn run_list(ctx: &AppContext, output: Option<&str>) -> Result<()> {
    let observations = ctx.pipeline.list_observations().await?;

    match output {
        Some(path) => {
            CsvStorage::write_observations(path, &observations)?;
            tracing::info!("Exported {} observations to {}", observations.len(), path);
        }
        None => println!("{}", serde_json::to_string_pretty(&observations)?),
    }

    Ok(())
}

/// Imports a `date,actual` CSV file.
///
/// Every row is validated before any is written; one bad row rejects the file.
///
/// # Errors
/// Returns an error naming the first invalid line, or if the batch insert fails.
pub async fn run_import(ctx: &AppContext, file: &str) -> Result<usize> {
    let observations = CsvStorage::read_observations(file)?;

    ctx.observations
        .insert_batch(&observations)
        .await
        .with_context(|| format!("Failed to store observations from {file}"))?;

    tracing::info!("Imported {} observations from {}", observations.len(), file);
    Ok(observations.len())
}
