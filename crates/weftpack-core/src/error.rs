//! Errors surfaced by the orchestrator, one variant per the error-kind table.

use std::fmt;

/// Top-level failure type returned from `weftpack()`, `BuildHandle::generate`
/// and `BuildHandle::write`.
///
/// `Extension` preserves the identity of an error thrown by a plugin hook
/// rather than wrapping it, matching the propagation rule that an extension
/// error surfacing through the core must not be replaced.
#[derive(Debug, thiserror::Error)]
pub enum WeftpackError {
    #[error("You must supply an options object to rollup")]
    MissingInputOptions,

    #[error("You must specify output.file")]
    MissingOutputOptions,

    #[error("{message}")]
    InvalidOption { code: &'static str, message: String },

    #[error("The 'es6' output format is deprecated. Use 'esm' instead")]
    DeprecatedFormat,

    #[error("{message}")]
    MissingNameForFormat { message: String },

    /// `.code`/`.map` on a `generate()` result: a compatibility trap for
    /// callers still using the old pre-async two-field return shape.
    #[error("Accessing '.{field}' on the return value of generate() is deprecated; await the returned promise instead")]
    DeprecatedAccessor { field: &'static str },

    #[error(transparent)]
    Graph(#[from] weftpack_graph::GraphError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Extension(Box<dyn std::error::Error + Send + Sync>),
}

impl WeftpackError {
    pub fn invalid_option(code: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOption { code, message: message.into() }
    }

    pub fn extension(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Extension(Box::new(err))
    }

    pub fn deprecated_accessor(field: &'static str) -> Self {
        Self::DeprecatedAccessor { field }
    }

    /// The machine-readable code carried by error kinds that have one.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::InvalidOption { code, .. } => Some(code),
            Self::DeprecatedFormat => Some("DEPRECATED_FORMAT"),
            _ => None,
        }
    }
}

/// Opaque wrapper preserving an extension error's original identity through
/// `std::error::Error` + `Display`, used when a hook's boxed error must be
/// rethrown unchanged by a caller that only has `&dyn Error`.
pub struct OpaqueError(pub Box<dyn std::error::Error + Send + Sync>);

impl fmt::Debug for OpaqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for OpaqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for OpaqueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

pub type Result<T> = std::result::Result<T, WeftpackError>;
