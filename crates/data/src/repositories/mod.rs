//! Database repositories for trend forecasting.
//!
//! Each repository provides typed access to a specific table and implements
//! the matching store trait from `trend-forecast-core`.

pub mod model_repo;
pub mod observation_repo;

pub use model_repo::SqliteModelStore;
pub use observation_repo::ObservationRepository;

use sqlx::SqlitePool;

/// Creates all repositories from a single database pool.
pub struct Repositories {
    pub observations: ObservationRepository,
    pub model: SqliteModelStore,
}

impl Repositories {
    /// Creates a new set of repositories from a database pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            observations: ObservationRepository::new(pool.clone()),
            model: SqliteModelStore::new(pool),
        }
    }
}
