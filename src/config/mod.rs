//! Configuration
//!
//! Loads application settings from defaults, an optional TOML file and
//! environment variable overrides.

pub mod config;
pub mod loader;

pub use config::AppConfig;
pub use loader::{ConfigLoader, ConfigValidationError};
