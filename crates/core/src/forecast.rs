//! Forecast generation from a fitted trend model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::TrendModel;
use crate::observation::canonical_date;

/// Number of future days served per prediction request.
pub const FORECAST_HORIZON_DAYS: usize = 30;

/// A single forecast value.
///
/// Serialized with the `predicted` key used by the existing dashboard protocol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    #[serde(with = "canonical_date")]
    pub date: NaiveDate,
    #[serde(rename = "predicted")]
    pub predicted_value: f64,
}

/// Generates `horizon` consecutive daily forecasts starting the day after `anchor`.
///
/// Each point is evaluated against the model's own base date, so the anchor
/// may lie anywhere relative to the training window. The sequence ends early
/// only if it would run past the last representable calendar date.
#[must_use]
pub fn generate(model: &TrendModel, anchor: NaiveDate, horizon: usize) -> Vec<ForecastPoint> {
    anchor
        .iter_days()
        .skip(1)
        .take(horizon)
        .map(|date| ForecastPoint {
            date,
            predicted_value: model.predict_date(date),
        })
        .collect()
}
