//! Database row models.
//!
//! Rows derive `sqlx::FromRow` and convert into the core domain types.
//! Dates are stored as canonical `YYYY-MM-DD` text.

pub mod observation;
pub mod trend_model;

pub use observation::ObservationRow;
pub use trend_model::TrendModelRow;
