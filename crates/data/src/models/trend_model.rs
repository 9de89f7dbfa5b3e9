//! Trend model row model.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use trend_forecast_core::{format_date, parse_date, TrendModel};

/// The single persisted model row (`id = 1`).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrendModelRow {
    pub slope: f64,
    pub intercept: f64,
    pub base_date: String,
    pub end_date: String,
    pub sample_count: i64,
    pub r_squared: f64,
    pub fitted_at: DateTime<Utc>,
}

impl TrendModelRow {
    #[must_use]
    pub fn from_model(model: &TrendModel) -> Self {
        Self {
            slope: model.slope,
            intercept: model.intercept,
            base_date: format_date(model.base_date),
            end_date: format_date(model.end_date),
            sample_count: i64::try_from(model.sample_count).unwrap_or(i64::MAX),
            r_squared: model.r_squared,
            fitted_at: model.fitted_at,
        }
    }

    /// Converts into a domain model.
    ///
    /// # Errors
    /// Returns an error if a stored date or the sample count is invalid.
    pub fn into_model(self) -> Result<TrendModel> {
        Ok(TrendModel {
            slope: self.slope,
            intercept: self.intercept,
            base_date: parse_date(&self.base_date).context("Corrupt model base_date")?,
            end_date: parse_date(&self.end_date).context("Corrupt model end_date")?,
            sample_count: usize::try_from(self.sample_count)
                .context("Corrupt model sample_count")?,
            r_squared: self.r_squared,
            fitted_at: self.fitted_at,
        })
    }
}
