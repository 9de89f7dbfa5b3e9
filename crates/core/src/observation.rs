//! Dated scalar observations and ingest-boundary validation.
//!
//! Observations arrive from clients as loosely typed JSON or CSV rows
//! (`ObservationInput`) and are validated into `Observation` before they reach
//! any store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Canonical date format for observations and forecasts.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single validated observation.
///
/// Serialized with the `actual` key used by the existing dashboard protocol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar date of the observation
    #[serde(with = "canonical_date")]
    pub date: NaiveDate,
    /// Observed value
    #[serde(rename = "actual")]
    pub value: f64,
}

impl Observation {
    /// Creates an observation from already-typed parts.
    #[must_use]
    pub const fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// An observation as submitted by a client, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationInput {
    pub date: Option<String>,
    pub actual: Option<f64>,
}

impl ObservationInput {
    #[must_use]
    pub fn new(date: impl Into<String>, actual: f64) -> Self {
        Self {
            date: Some(date.into()),
            actual: Some(actual),
        }
    }

    /// Validates the input into an `Observation`.
    ///
    /// Only presence, calendar validity and finiteness are checked; negative or
    /// implausible values are accepted as-is.
    ///
    /// # Errors
    /// Returns `ForecastError::Validation` if the date or value is missing, the
    /// date is not a real `YYYY-MM-DD` calendar date, or the value is not finite.
    pub fn validate(&self) -> Result<Observation> {
        let (Some(date), Some(value)) = (self.date.as_deref(), self.actual) else {
            return Err(ForecastError::Validation(
                "Missing date or actual field".to_string(),
            ));
        };

        let date = parse_date(date)?;

        if !value.is_finite() {
            return Err(ForecastError::Validation(format!(
                "actual must be a finite number, got {value}"
            )));
        }

        Ok(Observation { date, value })
    }
}

/// Parses a canonical `YYYY-MM-DD` date.
///
/// # Errors
/// Returns `ForecastError::Validation` if the string is not a valid calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if !has_canonical_shape(trimmed) {
        return Err(ForecastError::Validation(format!(
            "invalid date '{raw}': expected YYYY-MM-DD"
        )));
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|e| {
        ForecastError::Validation(format!("invalid date '{raw}': expected YYYY-MM-DD ({e})"))
    })
}

/// Four-digit year, zero-padded month and day. Stored dates sort as text.
fn has_canonical_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Formats a date in canonical `YYYY-MM-DD` form.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Serde adapter for dates in canonical `YYYY-MM-DD` form.
pub mod canonical_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(de::Error::custom)
    }
}

/// Sorts observations ascending by date, keeping insertion order for equal dates.
pub fn sort_by_date(observations: &mut [Observation]) {
    observations.sort_by_key(|o| o.date);
}
