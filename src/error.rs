//! Error types for configuration loading and validation.

use thiserror::Error;

/// Errors raised before a simulation starts
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config text is not valid TOML for `SimConfig`
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A knob holds a value the simulation cannot run with
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
