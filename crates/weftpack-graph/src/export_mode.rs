/// Resolved export shape for an entry-facade chunk, consulted by the
/// pre-render pass before a dialect-specific wrapper is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// No exports - the chunk is run for side effects only.
    None,
    /// Exactly one export named `default`.
    Default,
    /// One or more named exports (including a `default` alongside others).
    Named,
}

/// Mirrors `getExportMode(chunk, out)`: chunk export names in, export mode out.
pub fn resolve(export_names: &[String]) -> ExportMode {
    match export_names {
        [] => ExportMode::None,
        [only] if only == "default" => ExportMode::Default,
        _ => ExportMode::Named,
    }
}
