//! Error types for configuration discovery and loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found at {}", root.display())]
    NotFound { root: PathBuf },

    #[error("Invalid configuration value for '{field}'{}", hint.as_deref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    #[error(transparent)]
    Core(#[from] weftpack_core::WeftpackError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn invalid_value(field: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::InvalidValue { field: field.into(), hint: Some(hint.into()) }
    }
}
