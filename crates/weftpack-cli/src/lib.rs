//! The `weftpack` command-line front end: argument parsing, logging setup,
//! and the `build` subcommand's glue into `weftpack_core`/`weftpack_config`.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;

pub use error::{CliError, Result};
