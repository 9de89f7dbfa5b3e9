//! Trend model repository.
//!
//! Persists the single current model as row `id = 1` of `trend_model`. The
//! upsert runs in a transaction, so readers see either the previous row or the
//! new one.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;
use trend_forecast_core::{ForecastError, ModelStore, TrendModel};

use crate::models::TrendModelRow;

/// Repository for the persisted trend model.
#[derive(Debug, Clone)]
pub struct SqliteModelStore {
    pool: SqlitePool,
}

impl SqliteModelStore {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Replaces the stored model.
    ///
    /// # Errors
    /// Returns an error if the database transaction fails.
    pub async fn upsert(&self, model: &TrendModel) -> Result<()> {
        let row = TrendModelRow::from_model(model);
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO trend_model
                (id, slope, intercept, base_date, end_date, sample_count, r_squared, fitted_at)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT (id) DO UPDATE
            SET slope = excluded.slope,
                intercept = excluded.intercept,
                base_date = excluded.base_date,
                end_date = excluded.end_date,
                sample_count = excluded.sample_count,
                r_squared = excluded.r_squared,
                fitted_at = excluded.fitted_at
            ",
        )
        .bind(row.slope)
        .bind(row.intercept)
        .bind(&row.base_date)
        .bind(&row.end_date)
        .bind(row.sample_count)
        .bind(row.r_squared)
        .bind(row.fitted_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            samples = model.sample_count,
            fitted_at = %model.fitted_at,
            "Saved trend model row"
        );

        Ok(())
    }

    /// Gets the stored model, if any.
    ///
    /// # Errors
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn get(&self) -> Result<Option<TrendModel>> {
        let row = sqlx::query_as::<_, TrendModelRow>(
            r"
            SELECT slope, intercept, base_date, end_date, sample_count, r_squared, fitted_at
            FROM trend_model
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(TrendModelRow::into_model).transpose()
    }
}

#[async_trait]
impl ModelStore for SqliteModelStore {
    async fn save(&self, model: &TrendModel) -> trend_forecast_core::Result<()> {
        self.upsert(model).await.map_err(ForecastError::storage)
    }

    async fn load_optional(&self) -> trend_forecast_core::Result<Option<TrendModel>> {
        self.get().await.map_err(ForecastError::storage)
    }
}
