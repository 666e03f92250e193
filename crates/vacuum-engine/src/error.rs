//! Error types for engine configuration

use thiserror::Error;

/// Errors that can occur while loading a [`VacuumConfig`](crate::VacuumConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}
