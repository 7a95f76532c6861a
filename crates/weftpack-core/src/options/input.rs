//! InputConfig, and the *normalize-input* operation that validates and
//! merges a caller's configuration.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use weftpack_graph::graph::{EntrySource, ManualChunks};

use crate::error::{Result, WeftpackError};
use crate::options::output::OutputOptions;
use crate::plugin::SharedPlugin;
use crate::warning::{SilentWarningHandler, TracingMirrorHandler, Warning, WarningHandler};

/// One of the three shapes the caller's entry specifier may take.
#[derive(Debug, Clone)]
pub enum EntrySpec {
    Single(EntrySource),
    List(Vec<EntrySource>),
    Named(IndexMap<String, EntrySource>),
}

impl EntrySpec {
    /// Normalizes to the ordered `(name, source)` form the Graph consumes,
    /// deriving a name from the file stem for `Single`/`List` forms.
    pub fn into_named(self) -> IndexMap<String, EntrySource> {
        match self {
            Self::Single(source) => {
                let name = entry_stem(&source);
                let mut map = IndexMap::new();
                map.insert(name, source);
                map
            }
            Self::List(sources) => sources
                .into_iter()
                .map(|source| (entry_stem(&source), source))
                .collect(),
            Self::Named(map) => map,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::List(items) => items.len(),
            Self::Named(map) => map.len(),
        }
    }

    pub fn is_named_map(&self) -> bool {
        matches!(self, Self::Named(_))
    }
}

fn entry_stem(source: &EntrySource) -> String {
    let path = match source {
        EntrySource::Path(p) => p.as_path(),
        EntrySource::Inline { virtual_path, .. } => virtual_path.as_path(),
    };
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "main".to_string())
}

/// Caller-supplied top-level configuration, immutable after normalization.
///
/// `extra` captures any key this struct doesn't recognize when deserialized
/// from a loosely-typed source (e.g. `weftpack.toml`), letting
/// [`normalize_input`] emit an `UNKNOWN_OPTION` warning instead of failing
/// deserialization outright.
#[derive(Clone, Serialize, Deserialize)]
pub struct InputOptions {
    #[serde(skip, default = "default_entry")]
    pub input: EntrySpec,

    #[serde(skip)]
    pub plugins: Vec<SharedPlugin>,

    #[serde(default = "default_true")]
    pub cache: bool,

    #[serde(default)]
    pub preserve_modules: bool,

    #[serde(default)]
    pub inline_dynamic_imports: bool,

    #[serde(skip)]
    pub manual_chunks: Option<ManualChunks>,

    #[serde(default)]
    pub optimize_chunks: bool,

    #[serde(default)]
    pub chunk_grouping_size: Option<usize>,

    #[serde(default)]
    pub perf: bool,

    #[serde(skip)]
    pub on_warn: Option<Arc<dyn WarningHandler>>,

    #[serde(default)]
    pub output: Option<OutputOptions>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_true() -> bool {
    true
}

fn default_entry() -> EntrySpec {
    EntrySpec::Named(IndexMap::new())
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            input: default_entry(),
            plugins: Vec::new(),
            cache: true,
            preserve_modules: false,
            inline_dynamic_imports: false,
            manual_chunks: None,
            optimize_chunks: false,
            chunk_grouping_size: None,
            perf: false,
            on_warn: None,
            output: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl std::fmt::Debug for InputOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputOptions")
            .field("input_count", &self.input.len())
            .field("plugin_count", &self.plugins.len())
            .field("cache", &self.cache)
            .field("preserve_modules", &self.preserve_modules)
            .field("inline_dynamic_imports", &self.inline_dynamic_imports)
            .field("optimize_chunks", &self.optimize_chunks)
            .finish()
    }
}

const KNOWN_TOP_LEVEL_KEYS: &[&str] = &[
    "input",
    "plugins",
    "cache",
    "preserveModules",
    "inlineDynamicImports",
    "manualChunks",
    "optimizeChunks",
    "chunkGroupingSize",
    "perf",
    "output",
];

/// *normalize-input*: merges against the closed allowed set (warning, not
/// failing, on stray keys), drops falsy plugin entries, then enforces the
/// `inlineDynamicImports`/`preserveModules` invariants.
pub fn normalize_input(mut options: InputOptions) -> Result<InputOptions> {
    if options.input.len() == 0 {
        return Err(WeftpackError::MissingInputOptions);
    }

    let inner = options.on_warn.take().unwrap_or_else(|| Arc::new(SilentWarningHandler));
    let warn: Option<Arc<dyn WarningHandler>> = Some(Arc::new(TracingMirrorHandler::new(inner)));
    options.on_warn = warn.clone();
    for key in options.extra.keys() {
        if !KNOWN_TOP_LEVEL_KEYS.contains(&key.as_str()) {
            if let Some(handler) = &warn {
                handler.handle(Warning::unknown_option(key));
            }
        }
    }

    if options.inline_dynamic_imports {
        if options.manual_chunks.is_some() {
            return Err(WeftpackError::invalid_option(
                "INVALID_OPTION",
                "inlineDynamicImports and manualChunks cannot be used together",
            ));
        }
        if options.optimize_chunks {
            return Err(WeftpackError::invalid_option(
                "INVALID_OPTION",
                "inlineDynamicImports and chunk post-optimization cannot be used together",
            ));
        }
        if options.input.len() != 1 {
            return Err(WeftpackError::invalid_option(
                "INVALID_OPTION",
                "inlineDynamicImports requires exactly one entry module",
            ));
        }
    }

    if options.preserve_modules {
        if options.inline_dynamic_imports {
            return Err(WeftpackError::invalid_option(
                "INVALID_OPTION",
                "preserveModules and inlineDynamicImports cannot be used together",
            ));
        }
        if options.manual_chunks.is_some() {
            return Err(WeftpackError::invalid_option(
                "INVALID_OPTION",
                "preserveModules and manualChunks cannot be used together",
            ));
        }
        if options.optimize_chunks {
            return Err(WeftpackError::invalid_option(
                "INVALID_OPTION",
                "preserveModules and chunk post-optimization cannot be used together",
            ));
        }
    }

    options.plugins.retain(|p| p.enabled());

    Ok(options)
}
