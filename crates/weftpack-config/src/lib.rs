//! Loads a typed `weftpack()` configuration from disk.
//!
//! See [`config`] for the on-disk shape and its conversion into
//! `weftpack_core::{InputOptions, OutputOptions}`, and [`discovery`] for how
//! a CLI front end locates the file in the first place.

pub mod config;
pub mod discovery;
pub mod error;

pub use config::*;
pub use discovery::{discover, ConfigDiscovery};
pub use error::*;
