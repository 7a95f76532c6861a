//! Build orchestrator: the once-per-handle sequence from raw
//! `InputOptions` down to an ordered chunk list.

use std::sync::Arc;

use parking_lot::Mutex;
use weftpack_graph::graph::ModuleGraph;

use crate::driver::PluginDriver;
use crate::error::Result;
use crate::handle::{take_current_watcher, BuildHandle};
use crate::options::{normalize_input, InputOptions};
use crate::timing::Timings;

/// Invokes each extension's `options` hook in declaration order, each free
/// to return a replacement configuration. Dispatched here, ahead of the
/// synchronous invariant checks in `normalize_input`, since only the hook
/// dispatch itself needs to be async.
async fn apply_options_hooks(mut input: InputOptions) -> Result<InputOptions> {
    let plugins = input.plugins.clone();
    for plugin in &plugins {
        if let Some(replacement) = plugin.options(&input).await? {
            input = replacement;
        }
    }
    Ok(input)
}

/// Runs the build phase once for a top-level `weftpack()` call.
pub async fn run_build(input: InputOptions) -> Result<BuildHandle> {
    let timings = Arc::new(Timings::new());

    // Step 1: normalize input; initialize timers.
    let input = apply_options_hooks(input).await?;
    let input = normalize_input(input)?;

    // Step 2: instantiate the Graph collaborator, consuming the process-scoped
    // watcher handle so it cannot leak into a subsequent build.
    let _watcher = take_current_watcher();
    let mut graph = ModuleGraph::new();

    // Step 3: clear the cache field - modeled here as simply never reading it
    // again rather than mutating `input`, since `InputOptions` is immutable
    // after normalization.
    let on_warn = input.on_warn.clone().unwrap_or_else(|| Arc::new(crate::warning::SilentWarningHandler));
    let driver = PluginDriver::new(input.plugins.clone(), on_warn);

    // Step 4: await buildStart (parallel).
    driver.build_start(&input).await?;

    // Step 5: await Graph.build.
    let entries = input.input.clone().into_named();
    let build_result = timings.time_sync("build", || {
        graph.build(&entries, input.manual_chunks.as_ref(), input.inline_dynamic_imports, input.preserve_modules)
    });

    // Step 6: await buildEnd, receiving any error from step 5; buildEnd
    // failures shadow the build error.
    let build_error_message = build_result.as_ref().err().map(|e| e.to_string());
    driver.build_end(build_error_message.as_deref()).await?;
    let chunks = build_result?;

    let cache = input.cache.then(|| graph.get_cache());
    let watch_files = graph.watch_files().to_vec();
    let input_base = graph.input_base(&entries);

    Ok(BuildHandle::new(
        Arc::new(Mutex::new(graph)),
        Arc::new(driver),
        input,
        chunks,
        input_base,
        cache,
        watch_files,
        timings,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::EntrySpec;
    use indexmap::IndexMap;
    use weftpack_graph::graph::EntrySource;

    fn inline_entry(name: &str, source: &str) -> InputOptions {
        let mut named = IndexMap::new();
        named.insert(
            name.to_string(),
            EntrySource::Inline { virtual_path: format!("{name}.js").into(), source: source.to_string() },
        );
        InputOptions { input: EntrySpec::Named(named), ..Default::default() }
    }

    #[tokio::test]
    async fn builds_single_entry_into_one_chunk() {
        let build = run_build(inline_entry("x", "export const x = function () {};\n")).await.unwrap();
        assert_eq!(build.chunk_count(), 1);
    }

    #[tokio::test]
    async fn missing_input_rejects_before_any_hook_fires() {
        let err = run_build(InputOptions::default()).await.unwrap_err();
        assert!(matches!(err, crate::error::WeftpackError::MissingInputOptions));
    }
}
