use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub model: ModelStoreConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Socket address string for binding, e.g. `0.0.0.0:5001`.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Observation database URL, e.g. `sqlite://data/observations.db`
    pub url: String,
    pub max_connections: u32,
}

/// Where the trained model is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// JSON document replaced via temp file + rename
    File,
    /// Single row in the observation database
    Database,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStoreConfig {
    pub backend: ModelBackend,
    /// Model file path, used by the `file` backend
    pub path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5001,
            },
            database: DatabaseConfig {
                url: "sqlite://data/observations.db".to_string(),
                max_connections: 5,
            },
            model: ModelStoreConfig {
                backend: ModelBackend::File,
                path: "data/model.json".to_string(),
            },
        }
    }
}
