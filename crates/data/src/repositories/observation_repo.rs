//! Observation repository.
//!
//! Append-only access to the `observations` table. Rows come back in insertion
//! order so that callers sorting by date keep a reproducible tie order.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use trend_forecast_core::{
    format_date, parse_date, ForecastError, Observation, ObservationStore,
};

use crate::models::ObservationRow;

/// Repository for observation operations.
#[derive(Debug, Clone)]
pub struct ObservationRepository {
    pool: SqlitePool,
}

impl ObservationRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a single observation.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn insert(&self, observation: &Observation) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO observations (date, value, created_at)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(format_date(observation.date))
        .bind(observation.value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a batch of observations in one transaction.
    ///
    /// Either every observation is stored or none is.
    ///
    /// # Errors
    /// Returns an error if the database transaction fails.
    pub async fn insert_batch(&self, observations: &[Observation]) -> Result<()> {
        if observations.is_empty() {
            return Ok(());
        }

        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        for observation in observations {
            sqlx::query(
                r"
                INSERT INTO observations (date, value, created_at)
                VALUES (?1, ?2, ?3)
                ",
            )
            .bind(format_date(observation.date))
            .bind(observation.value)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Queries every observation in insertion order.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored row is corrupt.
    pub async fn query_all(&self) -> Result<Vec<Observation>> {
        let rows = sqlx::query_as::<_, ObservationRow>(
            r"
            SELECT id, date, value
            FROM observations
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(ObservationRow::into_observation)
            .collect()
    }

    /// Queries observations that carry a value, in insertion order.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored row is corrupt.
    pub async fn query_with_value(&self) -> Result<Vec<Observation>> {
        let rows = sqlx::query_as::<_, ObservationRow>(
            r"
            SELECT id, date, value
            FROM observations
            WHERE value IS NOT NULL
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(ObservationRow::into_observation)
            .collect()
    }

    /// Gets the most recent observation date.
    ///
    /// # Errors
    /// Returns an error if the query fails or the stored date is corrupt.
    pub async fn get_latest_date(&self) -> Result<Option<NaiveDate>> {
        let row: Option<(String,)> = sqlx::query_as(
            r"
            SELECT date
            FROM observations
            ORDER BY date DESC
            LIMIT 1
            ",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(date,)| parse_date(&date)).transpose()?)
    }

    /// Counts stored observations.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM observations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ObservationStore for ObservationRepository {
    async fn append(&self, observation: &Observation) -> trend_forecast_core::Result<()> {
        self.insert(observation)
            .await
            .map_err(ForecastError::storage)
    }

    async fn query_all(&self) -> trend_forecast_core::Result<Vec<Observation>> {
        ObservationRepository::query_all(self)
            .await
            .map_err(ForecastError::storage)
    }

    async fn query_trainable(&self) -> trend_forecast_core::Result<Vec<Observation>> {
        self.query_with_value()
            .await
            .map_err(ForecastError::storage)
    }

    async fn latest_date(&self) -> trend_forecast_core::Result<Option<NaiveDate>> {
        self.get_latest_date()
            .await
            .map_err(ForecastError::storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseClient;

    async fn repo() -> ObservationRepository {
        let db = DatabaseClient::new_in_memory().await.unwrap();
        ObservationRepository::new(db.pool().clone())
    }

    fn obs(date: &str, value: f64) -> Observation {
        Observation::new(parse_date(date).unwrap(), value)
    }

    #[tokio::test]
    async fn test_insert_and_query_preserves_insertion_order() {
        let repo = repo().await;
        repo.insert(&obs("2024-01-03", 3.0)).await.unwrap();
        repo.insert(&obs("2024-01-01", 1.0)).await.unwrap();
        repo.insert(&obs("2024-01-01", 1.5)).await.unwrap();

        let all = repo.query_all().await.unwrap();
        assert_eq!(
            all,
            vec![
                obs("2024-01-03", 3.0),
                obs("2024-01-01", 1.0),
                obs("2024-01-01", 1.5)
            ]
        );
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let repo = repo().await;
        repo.insert(&obs("2024-01-01", 1.0)).await.unwrap();
        repo.insert(&obs("2024-01-01", 1.0)).await.unwrap();

        assert_eq!(repo.query_with_value().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_latest_date() {
        let repo = repo().await;
        assert_eq!(repo.get_latest_date().await.unwrap(), None);

        repo.insert(&obs("2024-03-01", 1.0)).await.unwrap();
        repo.insert(&obs("2024-12-31", 2.0)).await.unwrap();
        repo.insert(&obs("2024-06-15", 3.0)).await.unwrap();

        assert_eq!(
            repo.get_latest_date().await.unwrap(),
            Some(parse_date("2024-12-31").unwrap())
        );
    }

    #[tokio::test]
    async fn test_insert_batch_is_atomic() {
        let repo = repo().await;
        repo.insert_batch(&[obs("2024-01-01", 1.0), obs("2024-01-02", 2.0)])
            .await
            .unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);

        repo.insert_batch(&[]).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_row_surfaces_as_storage_error() {
        let repo = repo().await;
        sqlx::query("INSERT INTO observations (date, value, created_at) VALUES ('not-a-date', 1.0, '2024-01-01')")
            .execute(&repo.pool)
            .await
            .unwrap();

        let err = ObservationStore::query_all(&repo).await.unwrap_err();
        assert!(matches!(err, ForecastError::Storage(_)));
    }
}
