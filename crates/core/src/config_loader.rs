use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Default location of the TOML configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration from a specific TOML file.
    ///
    /// Missing files are skipped, so built-in defaults apply. Environment
    /// variables prefixed with `APP_` override file values; nested keys are
    /// separated by `__` (e.g. `APP_SERVER__PORT=8080`). A JSON file next to
    /// the TOML file (same stem) sits between the defaults and the TOML layer.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let config: AppConfig = Self::figment(path.as_ref()).extract()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Json::file(path.with_extension("json")))
            .merge(Toml::file(path))
            .merge(Env::prefixed("APP_").split("__"))
    }
}
