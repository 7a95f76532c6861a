use std::path::PathBuf;

/// Failures surfaced by the module graph collaborator.
///
/// The core treats this type as opaque (see `weftpack_core::error::WeftpackError::Graph`);
/// it only needs `Display` and `std::error::Error` to propagate it with `?`.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("could not resolve entry module '{specifier}'")]
    UnresolvedEntry { specifier: String },

    #[error("'{path}' could not be parsed: {message}")]
    ParseFailure { path: PathBuf, message: String },

    #[error("inlineDynamicImports requires exactly one entry module, found {count}")]
    InlineDynamicImportsMultipleEntries { count: usize },

    #[error("circular manualChunks grouping is not representable: module '{module}' requested in more than one group")]
    ManualChunkConflict { module: String },

    #[error("asset '{name}' has no source and cannot be finalized")]
    UnfinalizedAsset { name: String },
}

pub type Result<T> = std::result::Result<T, GraphError>;
