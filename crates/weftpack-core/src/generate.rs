//! Generate orchestrator: normalize-output through a finished
//! `OutputBundle`, plus the chunk post-optimizer and the UMD/IIFE
//! name-requirement check.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use rustc_hash::FxHashSet;
use weftpack_graph::{Chunk, Dialect};

use crate::bundle::{AssetEntry, BundleEntry, ChunkEntry, OutputBundle};
use crate::driver::PluginDriver;
use crate::error::{Result, WeftpackError};
use crate::handle::Inner;
use crate::options::{normalize_output, OutputOptions};
use crate::plugin::EmitAssetContext;
use crate::warning::Warning;

/// Grouping-size threshold used by the post-optimizer when the caller sets
/// `optimizeChunks` without naming `chunkGroupingSize`.
const DEFAULT_GROUPING_SIZE: usize = 4096;

pub async fn run_generate(inner: &Arc<Inner>, output: OutputOptions, is_write: bool) -> Result<OutputBundle> {
    // Step 1: normalize output, multi-chunk gate = chunk count > 1.
    let named_inputs = inner.input.input.is_named_map();
    let output = normalize_output(
        output,
        inner.input.output.as_ref(),
        inner.chunks.len(),
        inner.input.preserve_modules,
        named_inputs,
        inner.driver.on_warn(),
    )?;
    let dialect = output.dialect()?;

    // Step 2: fresh bundle, finalize standing assets.
    let mut bundle = OutputBundle::new();
    let asset_pattern = output.asset_file_names.clone();
    {
        let mut graph = inner.graph.lock();
        for (file_name, asset) in graph.finalise_assets(&asset_pattern)? {
            bundle.insert(BundleEntry::Asset(AssetEntry { file_name, source: asset.source.unwrap_or_default() }));
        }
    }

    // Step 3: inputBase was computed once at build time - the
    // longest-common-prefix is a property of the entries, not the output.
    let input_base = inner.input_base.clone();

    // Steps 4-11 can fail and must dispatch renderError before rethrowing;
    // isolated in its own scope so the `?` here is the single point that
    // decides whether renderError fires.
    let rendered = match render_chunks(inner, &output, dialect, &input_base).await {
        Ok(rendered) => rendered,
        Err(err) => {
            inner.driver.render_error(&err.to_string()).await?;
            return Err(err);
        }
    };
    for entry in rendered {
        bundle.insert(BundleEntry::Chunk(entry));
    }

    // Step 12: generateBundle runs sequentially over extensions, each free
    // to emit assets scoped to this call via the snapshot-backed emitter.
    let emitter = AssetEmitter { graph: inner.graph.clone() };
    inner.driver.generate_bundle(&output, &mut bundle, is_write, &emitter).await?;

    // Step 13: finalize any asset emitted (including during generateBundle)
    // that still lacks a file name.
    {
        let mut graph = inner.graph.lock();
        for (file_name, asset) in graph.finalise_assets(&asset_pattern)? {
            if !bundle.contains(&file_name) {
                bundle.insert(BundleEntry::Asset(AssetEntry { file_name, source: asset.source.unwrap_or_default() }));
            }
        }
    }

    Ok(bundle)
}

/// Steps 4-10: renderStart, pre-render, optimize, naming, parallel render +
/// per-chunk `ongenerate`. Returns the populated chunk entries in build
/// order; any failure here is the caller's renderError trigger.
async fn render_chunks(
    inner: &Arc<Inner>,
    output: &OutputOptions,
    dialect: Dialect,
    input_base: &std::path::Path,
) -> Result<Vec<ChunkEntry>> {
    // Step 4: renderStart, then collect addons.
    let addons = inner.driver.render_start(output).await?;

    // Each generate call works from its own clone of the build's chunk
    // template so repeated calls stay structurally idempotent.
    let mut chunks: Vec<Chunk> = inner.chunks.clone();

    // Step 5/6: pre-render passes.
    for chunk in &mut chunks {
        if !inner.input.preserve_modules {
            chunk.generate_internal_exports(dialect);
        }
        chunk.pre_render(dialect, input_base);
    }

    check_umd_iife_requirements(&chunks, output, dialect, &inner.driver)?;

    // Step 7: chunk post-optimizer, at most once per handle.
    if inner.input.optimize_chunks
        && inner.optimized.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_ok()
    {
        let grouping_size = inner.input.chunk_grouping_size.unwrap_or(DEFAULT_GROUPING_SIZE);
        chunks = optimize_chunks(chunks, grouping_size);
    }

    // Step 8: naming.
    let mut used_ids: FxHashSet<String> = FxHashSet::default();
    for chunk in &mut chunks {
        let id = if let Some(file) = &output.file {
            file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "bundle.js".to_string())
        } else if inner.input.preserve_modules {
            chunk.generate_id_preserve_modules(input_base)
        } else {
            let pattern = if chunk.is_entry_module_facade() { &output.entry_file_names } else { &output.chunk_file_names };
            chunk.generate_id(pattern, dialect, &used_ids)
        };
        used_ids.insert(id.clone());
        chunk.id = Some(id);
    }

    // Steps 9-10: populate entries, render, then dispatch per-chunk
    // `ongenerate` concurrently over extensions.
    let globals: Vec<(String, String)> = output.globals.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    let want_map = output.sourcemap != crate::options::SourcemapMode::Off;

    let mut entries = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let id = chunk.id.clone().expect("id assigned in naming step");
        let rendered = chunk.render(dialect, &globals, output.name.as_deref(), want_map);
        let code = format!("{}{}{}{}{}", addons.banner, addons.intro, rendered.code, addons.outro, addons.footer);
        entries.push(ChunkEntry {
            file_name: id,
            is_entry: chunk.is_entry_module_facade(),
            imports: chunk.import_ids(),
            exports: chunk.export_names().to_vec(),
            modules: chunk.rendered_modules().iter().map(|m| m.path.to_string_lossy().into_owned()).collect(),
            code: Some(code),
            map: rendered.map,
        });
    }

    let ongenerate_futures = entries.iter().map(|entry| inner.driver.ongenerate(output, &entry.file_name));
    for result in futures::future::join_all(ongenerate_futures).await {
        result?;
    }

    Ok(entries)
}

/// UMD/IIFE without `name`: hard error only when the entry facade actually
/// has exports to hang off the wrapper's global variable (`ExportMode::
/// Named`/`Default`); a side-effect-only entry (`ExportMode::None`) instead
/// downgrades to a `MISSING_GLOBAL_NAME` warning, since there is nothing for
/// `name` to bind in that case. See DESIGN.md.
fn check_umd_iife_requirements(chunks: &[Chunk], output: &OutputOptions, dialect: Dialect, driver: &PluginDriver) -> Result<()> {
    if !matches!(dialect, Dialect::Umd | Dialect::Iife) || output.name.is_some() {
        return Ok(());
    }

    for chunk in chunks {
        if !chunk.is_entry_module_facade() {
            continue;
        }
        match chunk.export_mode() {
            Some(weftpack_graph::ExportMode::Named) | Some(weftpack_graph::ExportMode::Default) => {
                return Err(WeftpackError::MissingNameForFormat {
                    message: format!("You must supply output.name for {dialect} bundles that have exports"),
                });
            }
            _ => {
                for specifier in chunk.import_ids() {
                    if !output.globals.contains_key(&specifier) {
                        driver.warn(Warning::missing_global_name(&specifier));
                    }
                }
            }
        }
    }
    Ok(())
}

/// Greedy size-threshold grouping: entry facades are never merge targets or
/// sources; consecutive secondary chunks accumulate into one until the
/// running total would exceed `grouping_size`, then a new accumulator
/// starts. A deliberately modest stand-in for a real bin-packing optimizer.
fn optimize_chunks(chunks: Vec<Chunk>, grouping_size: usize) -> Vec<Chunk> {
    let mut entries = Vec::new();
    let mut secondaries = Vec::new();
    for chunk in chunks {
        if chunk.is_entry_module_facade() {
            entries.push(chunk);
        } else {
            secondaries.push(chunk);
        }
    }

    let mut optimized: Vec<Chunk> = Vec::new();
    let mut accumulator: Option<Chunk> = None;
    for chunk in secondaries {
        match &mut accumulator {
            Some(acc) if acc.approx_size() < grouping_size => acc.absorb(chunk),
            _ => {
                if let Some(prev) = accumulator.take() {
                    optimized.push(prev);
                }
                accumulator = Some(chunk);
            }
        }
    }
    if let Some(last) = accumulator {
        optimized.push(last);
    }

    entries.into_iter().chain(optimized).collect()
}

struct AssetEmitter {
    graph: Arc<parking_lot::Mutex<weftpack_graph::graph::ModuleGraph>>,
}

impl EmitAssetContext for AssetEmitter {
    fn emit_asset(&self, name: &str, source: Option<Vec<u8>>) -> String {
        self.graph.lock().emit_asset(name, source)
    }
}
