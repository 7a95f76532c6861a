//! CLI-facing error type and its conversion into a `miette` diagnostic.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] weftpack_config::ConfigError),

    #[error(transparent)]
    Build(#[from] weftpack_core::WeftpackError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Renders a `CliError` as a human-facing `miette::Report`.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Build(e) => miette::miette!("{e}"),
        other => miette::miette!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_formats_message() {
        let err = CliError::InvalidArgument("missing entry point".to_string());
        assert_eq!(err.to_string(), "invalid argument: missing entry point");
    }

    #[test]
    fn build_error_displays_transparently() {
        let err = CliError::Build(weftpack_core::WeftpackError::MissingInputOptions);
        assert!(err.to_string().contains("options object"));
    }
}
