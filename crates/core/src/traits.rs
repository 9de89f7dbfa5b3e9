use crate::error::{ForecastError, Result};
use crate::model::TrendModel;
use crate::observation::Observation;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Typed access to the stored observation collection.
///
/// Implementations hold no business logic. The collection is a multiset:
/// duplicate dates are kept.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Durably appends a validated observation.
    async fn append(&self, observation: &Observation) -> Result<()>;

    /// Returns every observation in insertion order.
    async fn query_all(&self) -> Result<Vec<Observation>>;

    /// Returns the observations usable for training.
    async fn query_trainable(&self) -> Result<Vec<Observation>>;

    /// Returns the most recent observation date, if any.
    async fn latest_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self.query_all().await?.iter().map(|o| o.date).max())
    }
}

/// Durable home of the single current trend model.
#[async_trait]
pub trait ModelStore: Send + Sync {
    /// Atomically replaces the persisted model.
    ///
    /// A concurrent `load` observes either the previous model or this one.
    async fn save(&self, model: &TrendModel) -> Result<()>;

    /// Loads the persisted model, `None` if nothing was ever saved.
    async fn load_optional(&self) -> Result<Option<TrendModel>>;

    /// Loads the persisted model.
    ///
    /// # Errors
    /// Returns `ForecastError::ModelNotTrained` if no model was ever saved.
    async fn load(&self) -> Result<TrendModel> {
        self.load_optional()
            .await?
            .ok_or(ForecastError::ModelNotTrained)
    }
}
