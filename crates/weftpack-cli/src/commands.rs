//! The `build` subcommand: turns parsed CLI arguments into an `InputOptions`/
//! `OutputOptions` pair and drives `weftpack_core::weftpack(...).write(...)`.

use indexmap::IndexMap;
use weftpack_core::options::{EntrySpec, SourcemapMode};
use weftpack_core::{InputOptions, OutputOptions};
use weftpack_graph::EntrySource;

use crate::cli::BuildArgs;
use crate::error::{CliError, Result};

pub async fn build_execute(args: BuildArgs) -> Result<()> {
    if args.entry.is_empty() {
        return Err(CliError::InvalidArgument("at least one entry point is required".to_string()));
    }

    let mut named = IndexMap::new();
    for path in &args.entry {
        if !path.exists() {
            return Err(CliError::InvalidArgument(format!("entry point not found: {}", path.display())));
        }
        let name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "main".to_string());
        named.insert(name, EntrySource::Path(path.clone()));
    }

    let input = InputOptions {
        input: EntrySpec::Named(named),
        preserve_modules: args.preserve_modules,
        inline_dynamic_imports: args.inline_dynamic_imports,
        optimize_chunks: args.optimize_chunks,
        perf: args.perf,
        ..Default::default()
    };

    let sourcemap = match args.sourcemap.as_str() {
        "off" | "false" => SourcemapMode::Off,
        "inline" => SourcemapMode::Inline,
        "external" | "true" => SourcemapMode::External,
        other => return Err(CliError::InvalidArgument(format!("unrecognized --sourcemap mode '{other}'"))),
    };

    // Fall back to a discovered `weftpack.toml`'s `[output]` table for the
    // write destination when neither --dir nor --file was passed on the
    // command line - CLI flags otherwise always take precedence.
    let mut dir = args.dir.clone();
    let mut file = args.file.clone();
    if dir.is_none() && file.is_none() {
        match weftpack_config::discover() {
            Ok(config) => {
                if let Some(section) = config.output {
                    dir = section.dir;
                    file = section.file;
                }
            }
            Err(weftpack_config::ConfigError::NotFound { .. }) => {}
            Err(other) => return Err(other.into()),
        }
    }

    let output = OutputOptions {
        format: Some(args.format.clone()),
        dir,
        file,
        sourcemap,
        name: args.name.clone(),
        ..Default::default()
    };

    if output.file.is_none() && output.dir.is_none() {
        return Err(CliError::InvalidArgument("one of --dir or --file is required (pass --dir/--file, or set [output] in weftpack.toml)".to_string()));
    }

    let build = weftpack_core::weftpack(input).await?;
    let written = build.write(output).await?;

    for file_name in &written {
        tracing::info!(file = %file_name, "wrote output file");
    }

    if args.perf {
        if let Some(timings) = build.get_timings() {
            for timing in timings {
                tracing::info!(phase = %timing.label, duration_ms = timing.millis, "timing");
            }
        }
    }

    Ok(())
}
