//! The module dependency graph: resolution, chunk partitioning, dialect
//! rendering and asset finalization.
//!
//! `weftpack-core` treats the types in this crate as the "Graph",
//! "Chunk", "Asset finalizer" and "Export mode resolver" collaborators its
//! own orchestration logic calls out to but does not implement itself.
//! Everything upstream of a finished [`chunk::RenderedChunk`] - module
//! resolution, import/export extraction, chunk boundary decisions, and
//! per-dialect code shape - lives here.
//!
//! ```text
//!                 ┌────────────────┐
//!  entries ──────▶│  graph::build  │───▶ Vec<Chunk>
//!                 └───────┬────────┘
//!                         │ per module
//!                 ┌───────▼────────┐
//!                 │  parse::extract│  (regex over oxc-validated source)
//!                 └───────┬────────┘
//!                         │
//!                 ┌───────▼────────┐
//!  Chunk::render ▶│ render + naming│───▶ RenderedChunk { code, map }
//!                 └────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use indexmap::IndexMap;
//! use weftpack_graph::dialect::Dialect;
//! use weftpack_graph::graph::{EntrySource, ModuleGraph};
//!
//! let mut entries = IndexMap::new();
//! entries.insert("main".to_string(), EntrySource::Path("src/main.js".into()));
//!
//! let mut graph = ModuleGraph::new();
//! let mut chunks = graph.build(&entries, None, false, false)?;
//! for chunk in &mut chunks {
//!     chunk.pre_render(Dialect::Esm, std::path::Path::new("src"));
//!     let rendered = chunk.render(Dialect::Esm, &[], None, false);
//!     println!("{}", rendered.code);
//! }
//! # Ok::<(), weftpack_graph::error::GraphError>(())
//! ```

pub mod asset;
pub mod chunk;
pub mod dialect;
pub mod error;
pub mod export_mode;
pub mod graph;
pub mod import_export;
pub mod module;
pub mod module_id;
pub mod naming;
pub mod parse;
pub mod render;
pub mod sourcemap;

pub use asset::Asset;
pub use chunk::{Chunk, RenderedChunk};
pub use dialect::Dialect;
pub use error::{GraphError, Result};
pub use export_mode::ExportMode;
pub use graph::{EntrySource, GraphCache, ManualChunks, ModuleGraph};
pub use module::Module;
pub use module_id::ModuleId;
pub use sourcemap::SourceMap;
