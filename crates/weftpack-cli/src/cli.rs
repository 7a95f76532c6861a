//! Command-line argument parsing, via `clap`'s derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// weftpack - an ECMAScript module bundler build-pipeline orchestrator.
#[derive(Parser, Debug)]
#[command(name = "weftpack", version, about = "Bundles ECMAScript modules into one or more output chunks")]
pub struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bundle one or more entry points.
    Build(BuildArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Entry point file(s) to bundle. Each becomes a named entry, named
    /// after its file stem.
    #[arg(required = true, value_name = "ENTRY")]
    pub entry: Vec<PathBuf>,

    /// Output dialect: amd, cjs, system, esm, iife, or umd.
    #[arg(short = 'f', long, default_value = "esm")]
    pub format: String,

    /// Output directory. Required once more than one chunk is produced.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output file. Only valid for single-chunk builds.
    #[arg(short = 'o', long, value_name = "FILE", conflicts_with = "dir")]
    pub file: Option<PathBuf>,

    /// Source map emission mode: off, external, or inline.
    #[arg(long, default_value = "off")]
    pub sourcemap: String,

    /// Global variable name for IIFE/UMD bundles.
    #[arg(long)]
    pub name: Option<String>,

    /// Emit one chunk per module instead of partitioning shared chunks.
    #[arg(long)]
    pub preserve_modules: bool,

    /// Group dynamic-import targets into the chunk that imports them
    /// rather than splitting them into their own chunk.
    #[arg(long)]
    pub inline_dynamic_imports: bool,

    /// Run the post-render chunk-merging pass on secondary chunks.
    #[arg(long)]
    pub optimize_chunks: bool,

    /// Report per-phase build timings after the build completes.
    #[arg(long)]
    pub perf: bool,
}
