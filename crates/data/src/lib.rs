//! Storage for the trend forecasting pipeline.
//!
//! This crate provides:
//! - `SQLite` database client with embedded migrations
//! - Row models for observations and the persisted model
//! - Repositories implementing the core store traits
//! - An atomic JSON file model store
//! - CSV import/export utilities

pub mod csv_storage;
pub mod database;
pub mod model_file;
pub mod models;
pub mod repositories;

// Re-export commonly used types
pub use csv_storage::CsvStorage;
pub use database::DatabaseClient;
pub use model_file::FileModelStore;

// Re-export models
pub use models::{ObservationRow, TrendModelRow};

// Re-export repositories
pub use repositories::{ObservationRepository, Repositories, SqliteModelStore};
