use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Environment variable prefix; nested keys are separated by `__`,
/// e.g. `CHARACTER_VAULT_STORAGE__DATA_DIR`
pub const ENV_PREFIX: &str = "CHARACTER_VAULT_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the default path
    ///
    /// Sources, later ones win:
    /// 1. built-in defaults
    /// 2. ./config.toml (optional)
    /// 3. environment variables
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// Load from the given path
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, figment::Error> {
        Self::figment(path.as_ref()).extract()
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.storage.data_dir.as_os_str().is_empty() {
            return Err(ConfigValidationError::MissingDataDir);
        }

        if let Some(origin) = config
            .cors
            .allowed_origins
            .iter()
            .find(|o| o.parse::<axum::http::HeaderValue>().is_err())
        {
            return Err(ConfigValidationError::InvalidOrigin(origin.clone()));
        }

        Ok(())
    }
}

/// Configuration validation error
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("Server port is invalid, must be greater than 0")]
    InvalidPort,

    #[error("Storage data directory is not configured")]
    MissingDataDir,

    #[error("CORS origin is not a valid header value: {0}")]
    InvalidOrigin(String),
}

/// Default configuration file path
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}
