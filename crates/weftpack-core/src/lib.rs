//! The build-pipeline orchestrator: normalizes caller options, drives
//! extensions through their hook lifecycle, and calls out to the
//! `weftpack-graph` Graph/Chunk collaborators to turn a set of entry
//! modules into a written bundle.
//!
//! ```text
//!  InputOptions ──▶ build::run_build ──▶ BuildHandle ──▶ .generate()/.write()
//!                        │                                   │
//!                        ▼                                   ▼
//!                 weftpack_graph::ModuleGraph          generate::run_generate
//!                                                             │
//!                                                             ▼
//!                                                        write::run_write
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! # async fn run() -> weftpack_core::Result<()> {
//! use indexmap::IndexMap;
//! use weftpack_core::{InputOptions, OutputOptions};
//! use weftpack_core::options::EntrySpec;
//! use weftpack_graph::graph::EntrySource;
//!
//! let mut entries = IndexMap::new();
//! entries.insert("main".to_string(), EntrySource::Path("src/main.js".into()));
//!
//! let build = weftpack_core::weftpack(InputOptions {
//!     input: EntrySpec::Named(entries),
//!     ..Default::default()
//! })
//! .await?;
//!
//! let bundle = build
//!     .generate(OutputOptions { format: Some("esm".to_string()), ..Default::default() })
//!     .await?;
//! for entry in bundle.sorted() {
//!     println!("{}", entry.file_name());
//! }
//! # Ok(())
//! # }
//! ```

mod build;
pub mod bundle;
pub mod driver;
pub mod error;
mod generate;
mod handle;
#[cfg(feature = "logging")]
pub mod logging;
pub mod options;
pub mod plugin;
pub mod timing;
pub mod warning;
mod write;

pub use bundle::OutputBundle;
pub use error::{Result, WeftpackError};
pub use handle::{set_current_watcher, GeneratePromise, BuildHandle, WatcherHandle};
pub use options::{InputOptions, OutputOptions};
pub use plugin::{Plugin, SharedPlugin};

/// The single top-level entry point: runs the build orchestrator once and
/// resolves to a handle that can be `generate`d or `write`ten any number of
/// times.
pub async fn weftpack(input: InputOptions) -> Result<BuildHandle> {
    build::run_build(input).await
}
