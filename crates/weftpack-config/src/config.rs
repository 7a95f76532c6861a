//! The typed configuration surface: what `weftpack()` should be called
//! with, loaded from a `weftpack.toml` (or the `weftpack` field of
//! `package.json`).
//!
//! Maps onto `weftpack_core::{InputOptions, OutputOptions}` rather than
//! reproducing them field-for-field, since those are the structs the
//! orchestrator already normalizes; this module's job stops at producing a
//! valid one from a loosely-typed file.

use std::path::PathBuf;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use weftpack_core::{InputOptions, OutputOptions};
use weftpack_graph::graph::EntrySource;

use crate::error::{ConfigError, Result};

/// The `[output]` table, mirroring the public fields of
/// `weftpack_core::OutputOptions` that make sense to set from a config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub format: Option<String>,
    pub file: Option<PathBuf>,
    pub dir: Option<PathBuf>,
    pub entry_file_names: Option<String>,
    pub chunk_file_names: Option<String>,
    pub asset_file_names: Option<String>,
    pub sourcemap: Option<String>,
    #[serde(default)]
    pub globals: FxHashMap<String, String>,
    pub name: Option<String>,
}

impl OutputSection {
    fn into_output_options(self) -> Result<OutputOptions> {
        let mut output = OutputOptions { format: self.format, file: self.file, dir: self.dir, ..Default::default() };
        if let Some(pattern) = self.entry_file_names {
            output.entry_file_names = pattern;
        }
        if let Some(pattern) = self.chunk_file_names {
            output.chunk_file_names = pattern;
        }
        if let Some(pattern) = self.asset_file_names {
            output.asset_file_names = pattern;
        }
        if let Some(mode) = self.sourcemap {
            output.sourcemap = match mode.as_str() {
                "off" | "false" => weftpack_core::options::SourcemapMode::Off,
                "inline" => weftpack_core::options::SourcemapMode::Inline,
                "external" | "true" => weftpack_core::options::SourcemapMode::External,
                other => return Err(ConfigError::invalid_value("output.sourcemap", format!("unrecognized mode '{other}'"))),
            };
        }
        output.globals = self.globals;
        output.name = self.name;
        Ok(output)
    }
}

/// The top-level shape of `weftpack.toml` / `package.json["weftpack"]`.
///
/// `entries` is a plain list of paths rather than `weftpack_core`'s richer
/// `EntrySpec` (which also allows inline sources) - a config file on disk
/// only ever names files, never inline module text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeftpackConfig {
    #[serde(default)]
    pub entries: Vec<PathBuf>,

    #[serde(default = "default_true")]
    pub cache: bool,

    #[serde(default)]
    pub preserve_modules: bool,

    #[serde(default)]
    pub inline_dynamic_imports: bool,

    #[serde(default)]
    pub optimize_chunks: bool,

    #[serde(default)]
    pub chunk_grouping_size: Option<usize>,

    #[serde(default)]
    pub perf: bool,

    #[serde(default)]
    pub output: Option<OutputSection>,
}

fn default_true() -> bool {
    true
}

impl WeftpackConfig {
    /// Create from a `serde_json::Value` (for programmatic config, e.g.
    /// passed in from a caller that already has the data parsed).
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|err| ConfigError::invalid_value("config", err.to_string()))
    }

    /// Converts the on-disk shape into the `InputOptions` `weftpack()`
    /// expects.
    ///
    /// The generic "missing input" case is left to
    /// `weftpack_core::options::normalize_input` - this only rejects the
    /// degenerate zero-entries case early enough to give a config-specific
    /// error rather than surfacing the bundler's generic one.
    pub fn into_input_options(self) -> Result<InputOptions> {
        if self.entries.is_empty() {
            return Err(ConfigError::invalid_value("entries", "add at least one entry point, e.g. entries = [\"src/index.js\"]"));
        }

        let mut named: IndexMap<String, EntrySource> = IndexMap::new();
        for path in &self.entries {
            let name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "main".to_string());
            named.insert(name, EntrySource::Path(path.clone()));
        }

        let output = self.output.map(OutputSection::into_output_options).transpose()?;

        Ok(InputOptions {
            input: weftpack_core::options::EntrySpec::Named(named),
            cache: self.cache,
            preserve_modules: self.preserve_modules,
            inline_dynamic_imports: self.inline_dynamic_imports,
            optimize_chunks: self.optimize_chunks,
            chunk_grouping_size: self.chunk_grouping_size,
            perf: self.perf,
            output,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_creates_config() {
        let value = json!({
            "entries": ["index.ts"],
            "optimize_chunks": true
        });

        let config = WeftpackConfig::from_value(value).unwrap();
        assert_eq!(config.entries, vec![PathBuf::from("index.ts")]);
    }

    #[test]
    fn into_input_options_rejects_empty_entries() {
        let config = WeftpackConfig::default();
        let err = config.into_input_options().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn into_input_options_names_entries_from_file_stem() {
        let mut config = WeftpackConfig::default();
        config.entries = vec![PathBuf::from("src/index.ts")];
        let input = config.into_input_options().unwrap();
        match input.input {
            weftpack_core::options::EntrySpec::Named(named) => {
                assert!(named.contains_key("index"));
            }
            _ => panic!("expected named entries"),
        }
    }
}
