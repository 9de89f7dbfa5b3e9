//! Feature encoding for trend regression.
//!
//! Turns a batch of dated observations into day offsets from the earliest date
//! (`x`) and unmodified values (`y`).

use chrono::NaiveDate;

use crate::error::{ForecastError, Result};
use crate::observation::{sort_by_date, Observation};

/// Minimum number of observations needed to fit a line.
pub const MIN_TRAINING_SAMPLES: usize = 2;

/// One encoded regression sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedSample {
    /// Whole days since the batch base date
    pub x: i64,
    /// Observed value
    pub y: f64,
}

/// Encoded training batch, ordered by date.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedBatch {
    /// Earliest date in the batch, origin of `x`
    pub base_date: NaiveDate,
    /// Latest date in the batch
    pub end_date: NaiveDate,
    pub samples: Vec<EncodedSample>,
}

impl EncodedBatch {
    /// Design vector as floats, in sample order.
    #[must_use]
    pub fn x(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.x as f64).collect()
    }

    /// Target vector, in sample order.
    #[must_use]
    pub fn y(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.y).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns true when every sample shares the same date.
    #[must_use]
    pub fn has_zero_variance(&self) -> bool {
        self.base_date == self.end_date
    }
}

/// Encodes observations for regression.
///
/// Observations are sorted ascending by date with a stable sort, so duplicates
/// keep their store insertion order. Duplicates are not removed.
///
/// # Errors
/// Returns `ForecastError::InsufficientData` if fewer than two observations are given.
pub fn encode(observations: &[Observation]) -> Result<EncodedBatch> {
    if observations.len() < MIN_TRAINING_SAMPLES {
        return Err(ForecastError::InsufficientData {
            required: MIN_TRAINING_SAMPLES,
            actual: observations.len(),
        });
    }

    let mut sorted = observations.to_vec();
    sort_by_date(&mut sorted);

    let base_date = sorted[0].date;
    let end_date = sorted[sorted.len() - 1].date;

    let samples = sorted
        .iter()
        .map(|o| EncodedSample {
            x: (o.date - base_date).num_days(),
            y: o.value,
        })
        .collect();

    Ok(EncodedBatch {
        base_date,
        end_date,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(date: &str, value: f64) -> Observation {
        Observation::new(crate::observation::parse_date(date).unwrap(), value)
    }

    #[test]
    fn test_encode_sorts_and_offsets_from_earliest_date() {
        let batch = encode(&[
            obs("2024-01-10", 3.0),
            obs("2024-01-01", 1.0),
            obs("2024-01-04", 2.0),
        ])
        .unwrap();

        assert_eq!(batch.base_date, obs("2024-01-01", 0.0).date);
        assert_eq!(batch.end_date, obs("2024-01-10", 0.0).date);
        assert_eq!(batch.x(), vec![0.0, 3.0, 9.0]);
        assert_eq!(batch.y(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_encode_spans_month_and_leap_day() {
        let batch = encode(&[obs("2024-02-28", 1.0), obs("2024-03-01", 2.0)]).unwrap();
        assert_eq!(batch.x(), vec![0.0, 2.0]);
    }

    #[test]
    fn test_encode_keeps_duplicates_in_insertion_order() {
        let batch = encode(&[
            obs("2024-01-02", 5.0),
            obs("2024-01-01", 1.0),
            obs("2024-01-01", 2.0),
        ])
        .unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.x(), vec![0.0, 0.0, 1.0]);
        assert_eq!(batch.y(), vec![1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_encode_requires_two_observations() {
        assert_eq!(
            encode(&[]),
            Err(ForecastError::InsufficientData {
                required: 2,
                actual: 0
            })
        );
        assert_eq!(
            encode(&[obs("2024-01-01", 1.0)]),
            Err(ForecastError::InsufficientData {
                required: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_zero_variance_detection() {
        let flat = encode(&[obs("2024-01-01", 1.0), obs("2024-01-01", 2.0)]).unwrap();
        assert!(flat.has_zero_variance());

        let spread = encode(&[obs("2024-01-01", 1.0), obs("2024-01-02", 2.0)]).unwrap();
        assert!(!spread.has_zero_variance());
    }
}
