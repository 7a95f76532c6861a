//! OutputConfig, and the *normalize-output* operation that layers
//! call-site options over input defaults and validates the result.

use std::path::PathBuf;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use weftpack_graph::Dialect;

use crate::error::{Result, WeftpackError};

/// Source-map emission mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcemapMode {
    #[default]
    Off,
    External,
    Inline,
}

/// Per-generate/write output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputOptions {
    pub format: Option<String>,

    pub file: Option<PathBuf>,
    pub dir: Option<PathBuf>,

    #[serde(default = "default_entry_file_names")]
    pub entry_file_names: String,
    #[serde(default = "default_chunk_file_names")]
    pub chunk_file_names: String,
    #[serde(default = "default_asset_file_names")]
    pub asset_file_names: String,

    #[serde(default)]
    pub sourcemap: SourcemapMode,

    #[serde(default)]
    pub globals: FxHashMap<String, String>,

    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_entry_file_names() -> String {
    "[name].js".to_string()
}

fn default_chunk_file_names() -> String {
    "[name]-[hash].js".to_string()
}

fn default_asset_file_names() -> String {
    "assets/[name]-[hash][extname]".to_string()
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: None,
            file: None,
            dir: None,
            entry_file_names: default_entry_file_names(),
            chunk_file_names: default_chunk_file_names(),
            asset_file_names: default_asset_file_names(),
            sourcemap: SourcemapMode::Off,
            globals: FxHashMap::default(),
            name: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl OutputOptions {
    /// Resolves the caller-declared dialect tag, rejecting the deprecated
    /// `es6` spelling.
    pub fn dialect(&self) -> Result<Dialect> {
        let raw = self.format.as_deref().ok_or(WeftpackError::MissingOutputOptions)?;
        if raw.eq_ignore_ascii_case("es6") {
            return Err(WeftpackError::DeprecatedFormat);
        }
        Dialect::parse(raw)
            .ok_or_else(|| WeftpackError::invalid_option("INVALID_OPTION", format!("Unrecognized output.format '{raw}'")))
    }
}

const KNOWN_OUTPUT_KEYS: &[&str] = &[
    "format",
    "file",
    "dir",
    "entryFileNames",
    "chunkFileNames",
    "assetFileNames",
    "sourcemap",
    "globals",
    "name",
];

/// *normalize-output*: layers call-site options over the input's `output`
/// defaults, validates `format`, and enforces the multi-chunk,
/// `preserveModules`, and named-input invariants. `chunk_count` is the
/// caller's knowledge of how many chunks the build produced, since the
/// multi-chunk gate is parameterized by it rather than computed here.
pub fn normalize_output(
    call_site: OutputOptions,
    input_defaults: Option<&OutputOptions>,
    chunk_count: usize,
    preserve_modules: bool,
    named_inputs: bool,
    on_warn: &dyn crate::warning::WarningHandler,
) -> Result<OutputOptions> {
    let merged = match input_defaults {
        Some(defaults) => layer(call_site, defaults),
        None => call_site,
    };

    for key in merged.extra.keys() {
        if !KNOWN_OUTPUT_KEYS.contains(&key.as_str()) {
            on_warn.handle(crate::warning::Warning::unknown_option(key));
        }
    }

    let dialect = merged.dialect()?;

    if merged.file.is_some() && merged.dir.is_some() {
        return Err(WeftpackError::invalid_option(
            "INVALID_OPTION",
            "output.file and output.dir are mutually exclusive",
        ));
    }

    if named_inputs && merged.file.is_some() {
        return Err(WeftpackError::invalid_option(
            "INVALID_OPTION",
            "You must set output.dir instead of output.file when providing named inputs.",
        ));
    }

    if preserve_modules && merged.file.is_some() {
        return Err(WeftpackError::invalid_option(
            "INVALID_OPTION",
            "You cannot set output.file when preserveModules is true; use output.dir instead.",
        ));
    }

    if chunk_count > 1 {
        if merged.file.is_some() {
            return Err(WeftpackError::invalid_option(
                "INVALID_OPTION",
                "You must set output.dir instead of output.file when generating multiple chunks.",
            ));
        }
        if dialect.is_single_chunk_only() {
            return Err(WeftpackError::invalid_option(
                "INVALID_OPTION",
                format!("Multiple chunks are not supported for output format '{dialect}'."),
            ));
        }
    }

    Ok(merged)
}

/// Layers `call_site` over `defaults`: any field left at its wire-level
/// default on the call site falls back to the value from `input.output`.
fn layer(call_site: OutputOptions, defaults: &OutputOptions) -> OutputOptions {
    OutputOptions {
        format: call_site.format.or_else(|| defaults.format.clone()),
        file: call_site.file.or_else(|| defaults.file.clone()),
        dir: call_site.dir.or_else(|| defaults.dir.clone()),
        entry_file_names: if call_site.entry_file_names == default_entry_file_names() {
            defaults.entry_file_names.clone()
        } else {
            call_site.entry_file_names
        },
        chunk_file_names: if call_site.chunk_file_names == default_chunk_file_names() {
            defaults.chunk_file_names.clone()
        } else {
            call_site.chunk_file_names
        },
        asset_file_names: if call_site.asset_file_names == default_asset_file_names() {
            defaults.asset_file_names.clone()
        } else {
            call_site.asset_file_names
        },
        sourcemap: if call_site.sourcemap == SourcemapMode::Off { defaults.sourcemap } else { call_site.sourcemap },
        globals: if call_site.globals.is_empty() { defaults.globals.clone() } else { call_site.globals },
        name: call_site.name.or_else(|| defaults.name.clone()),
        extra: call_site.extra,
    }
}
