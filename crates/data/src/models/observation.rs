//! Observation row model.

use anyhow::{Context, Result};
use trend_forecast_core::{parse_date, Observation};

/// A stored observation as read from the `observations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ObservationRow {
    /// Insertion sequence number
    pub id: i64,
    /// Canonical `YYYY-MM-DD` date
    pub date: String,
    pub value: f64,
}

impl ObservationRow {
    /// Converts into a domain observation.
    ///
    /// # Errors
    /// Returns an error if the stored date is not a valid calendar date, which
    /// only happens when the table was written outside this crate.
    pub fn into_observation(self) -> Result<Observation> {
        let date = parse_date(&self.date)
            .with_context(|| format!("Corrupt observation row {}", self.id))?;
        Ok(Observation::new(date, self.value))
    }
}
