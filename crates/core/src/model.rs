//! Univariate linear trend model and its least-squares fit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::encoder::{EncodedBatch, MIN_TRAINING_SAMPLES};
use crate::error::{ForecastError, Result};
use crate::observation::canonical_date;

/// Closed-form ordinary least squares line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    /// Slope of the regression line.
    pub slope: f64,
    /// Y-intercept.
    pub intercept: f64,
    /// R-squared value.
    pub r_squared: f64,
}

/// Computes simple linear regression on mean-centred sums.
///
/// Returns `None` when the inputs differ in length, hold fewer than two points,
/// `x` has zero variance, or the sums overflow into non-finite coefficients.
#[must_use]
pub fn linear_regression(x: &[f64], y: &[f64]) -> Option<LineFit> {
    let n = x.len();
    if n < MIN_TRAINING_SAMPLES || n != y.len() {
        return None;
    }

    let n_f = n as f64;
    let mean_x = x.iter().sum::<f64>() / n_f;
    let mean_y = y.iter().sum::<f64>() / n_f;

    let mut ss_xx = 0.0;
    let mut ss_xy = 0.0;
    let mut ss_yy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        ss_xx += dx * dx;
        ss_xy += dx * dy;
        ss_yy += dy * dy;
    }

    if ss_xx == 0.0 {
        return None;
    }

    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;

    // Flat targets are fit perfectly by a horizontal line
    let r_squared = if ss_yy == 0.0 {
        1.0
    } else {
        (ss_xy * ss_xy) / (ss_xx * ss_yy)
    };

    if !(slope.is_finite() && intercept.is_finite() && r_squared.is_finite()) {
        return None;
    }

    Some(LineFit {
        slope,
        intercept,
        r_squared,
    })
}

/// A fitted trend line over days since `base_date`.
///
/// Encodes `value ≈ slope * (date - base_date).days + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    /// Change in value per day
    pub slope: f64,
    /// Value at `base_date`
    pub intercept: f64,
    /// Earliest training date, origin of the day offset
    #[serde(with = "canonical_date")]
    pub base_date: NaiveDate,
    /// Latest training date
    #[serde(with = "canonical_date")]
    pub end_date: NaiveDate,
    /// Number of samples the line was fit on (always >= 2)
    pub sample_count: usize,
    /// Coefficient of determination on the training batch
    pub r_squared: f64,
    /// When the fit happened
    pub fitted_at: DateTime<Utc>,
}

impl TrendModel {
    /// Fits a trend model to an encoded batch.
    ///
    /// # Errors
    /// Returns `ForecastError::InsufficientData` for fewer than two samples and
    /// `ForecastError::DegenerateInput` when every sample shares one date or the
    /// values are too large for a finite fit.
    pub fn fit(batch: &EncodedBatch, fitted_at: DateTime<Utc>) -> Result<Self> {
        if batch.len() < MIN_TRAINING_SAMPLES {
            return Err(ForecastError::InsufficientData {
                required: MIN_TRAINING_SAMPLES,
                actual: batch.len(),
            });
        }

        if batch.has_zero_variance() {
            return Err(ForecastError::DegenerateInput(format!(
                "all {} observations share the date {}, slope is undefined",
                batch.len(),
                batch.base_date
            )));
        }

        let fit = linear_regression(&batch.x(), &batch.y()).ok_or_else(|| {
            ForecastError::DegenerateInput(
                "least-squares fit overflowed to non-finite coefficients".to_string(),
            )
        })?;

        Ok(Self {
            slope: fit.slope,
            intercept: fit.intercept,
            base_date: batch.base_date,
            end_date: batch.end_date,
            sample_count: batch.len(),
            r_squared: fit.r_squared,
            fitted_at,
        })
    }

    /// Whole days from the base date to `date` (negative before it).
    #[must_use]
    pub fn offset_days(&self, date: NaiveDate) -> i64 {
        (date - self.base_date).num_days()
    }

    /// Value of the line at an encoded day offset.
    #[must_use]
    pub fn predict_offset(&self, x: i64) -> f64 {
        self.slope * x as f64 + self.intercept
    }

    /// Value of the line on a calendar date.
    #[must_use]
    pub fn predict_date(&self, date: NaiveDate) -> f64 {
        self.predict_offset(self.offset_days(date))
    }

    /// Returns true if observations newer than the training batch exist.
    #[must_use]
    pub fn is_stale(&self, latest_observation: NaiveDate) -> bool {
        latest_observation > self.end_date
    }
}
