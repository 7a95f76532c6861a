//! Extension lifecycle coverage: hook dispatch order, the deprecated
//! `ongenerate` warning, `renderError` propagation, and asset emission
//! through `generateBundle`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use weftpack_core::bundle::{BundleEntry, OutputBundle};
use weftpack_core::options::EntrySpec;
use weftpack_core::plugin::{Addons, EmitAssetContext, Plugin};
use weftpack_core::warning::CollectingWarningHandler;
use weftpack_core::{weftpack, InputOptions, OutputOptions, WeftpackError};
use weftpack_graph::graph::EntrySource;

fn inline(name: &str, source: &str) -> EntrySource {
    EntrySource::Inline { virtual_path: format!("{name}.js").into(), source: source.to_string() }
}

fn single_entry(name: &str, source: &str) -> InputOptions {
    InputOptions { input: EntrySpec::Single(inline(name, source)), ..Default::default() }
}

#[derive(Default)]
struct LifecycleRecorder {
    build_start: AtomicUsize,
    build_end: AtomicUsize,
    render_start: AtomicUsize,
    generate_bundle: AtomicUsize,
    onwrite: AtomicUsize,
}

#[async_trait]
impl Plugin for LifecycleRecorder {
    fn name(&self) -> &str {
        "lifecycle-recorder"
    }

    async fn build_start(&self, _input: &InputOptions) -> weftpack_core::error::Result<()> {
        self.build_start.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn build_end(&self, _error: Option<&str>) -> weftpack_core::error::Result<()> {
        self.build_end.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn render_start(&self, _output: &OutputOptions) -> weftpack_core::error::Result<()> {
        self.render_start.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn addons(&self, _output: &OutputOptions) -> weftpack_core::error::Result<Addons> {
        Ok(Addons { banner: "/* banner */\n".to_string(), ..Default::default() })
    }

    async fn generate_bundle(
        &self,
        _output: &OutputOptions,
        _bundle: &mut OutputBundle,
        _is_write: bool,
        _emit: &dyn EmitAssetContext,
    ) -> weftpack_core::error::Result<()> {
        self.generate_bundle.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn onwrite(&self, _output: &OutputOptions, _file_name: &str) -> weftpack_core::error::Result<()> {
        self.onwrite.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn lifecycle_hooks_fire_in_the_documented_sequence() {
    let recorder = Arc::new(LifecycleRecorder::default());
    let mut input = single_entry("x", "export const x = 1;\n");
    input.plugins = vec![recorder.clone()];

    let build = weftpack(input).await.unwrap();
    assert_eq!(recorder.build_start.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.build_end.load(Ordering::SeqCst), 1);

    let output = OutputOptions { format: Some("esm".to_string()), dir: Some("out".into()), ..Default::default() };
    let bundle = build.generate(output).await.unwrap();
    assert_eq!(recorder.render_start.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.generate_bundle.load(Ordering::SeqCst), 1);

    let entry = bundle.get("x.js").expect("entry chunk present");
    let BundleEntry::Chunk(chunk) = entry else { panic!("expected chunk entry") };
    assert!(chunk.code.as_deref().unwrap().starts_with("/* banner */\n"));
}

#[tokio::test]
async fn onwrite_fires_once_per_written_file() {
    let recorder = Arc::new(LifecycleRecorder::default());
    let mut input = single_entry("x", "export const x = 1;\n");
    input.plugins = vec![recorder.clone()];

    let build = weftpack(input).await.unwrap();
    let output = OutputOptions { format: Some("esm".to_string()), dir: Some("out".into()), ..Default::default() };
    let tmp = tempfile::TempDir::new().unwrap();
    let output = OutputOptions { dir: Some(tmp.path().to_path_buf()), ..output };
    let written = build.write(output).await.unwrap();
    assert_eq!(recorder.onwrite.load(Ordering::SeqCst), written.len());
}

struct DeprecatedOngeneratePlugin;

#[async_trait]
impl Plugin for DeprecatedOngeneratePlugin {
    fn name(&self) -> &str {
        "legacy"
    }

    fn has_ongenerate(&self) -> bool {
        true
    }

    async fn ongenerate(&self, _output: &OutputOptions, _chunk_file_name: &str) -> weftpack_core::error::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn ongenerate_override_warns_with_the_plugin_position() {
    let handler = Arc::new(CollectingWarningHandler::new());
    let mut input = single_entry("x", "export const x = 1;\n");
    input.on_warn = Some(handler.clone());
    input.plugins = vec![Arc::new(DeprecatedOngeneratePlugin)];

    let build = weftpack(input).await.unwrap();
    let output = OutputOptions { format: Some("esm".to_string()), dir: Some("out".into()), ..Default::default() };
    build.generate(output).await.unwrap();

    let warnings = handler.take();
    let found = warnings.iter().find(|w| w.plugin_code == Some("ONGENERATE_HOOK_DEPRECATED")).expect("deprecation warning present");
    assert_eq!(found.plugin_position, Some(0));
    assert!(found.message.contains("position 0"));
}

struct FailingRenderPlugin;

#[async_trait]
impl Plugin for FailingRenderPlugin {
    fn name(&self) -> &str {
        "render-start-failure"
    }

    async fn render_start(&self, _output: &OutputOptions) -> weftpack_core::error::Result<()> {
        Err(WeftpackError::extension(std::io::Error::other("render start exploded")))
    }
}

#[derive(Default)]
struct RenderErrorRecorder {
    seen: parking_lot::Mutex<Option<String>>,
}

#[async_trait]
impl Plugin for RenderErrorRecorder {
    fn name(&self) -> &str {
        "render-error-recorder"
    }

    async fn render_error(&self, error: &str) -> weftpack_core::error::Result<()> {
        *self.seen.lock() = Some(error.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn render_error_dispatches_before_the_original_error_is_rethrown() {
    let recorder = Arc::new(RenderErrorRecorder::default());
    let mut input = single_entry("x", "export const x = 1;\n");
    input.plugins = vec![Arc::new(FailingRenderPlugin), recorder.clone()];

    let build = weftpack(input).await.unwrap();
    let output = OutputOptions { format: Some("esm".to_string()), dir: Some("out".into()), ..Default::default() };
    let err = build.generate(output).await.unwrap_err();

    assert!(err.to_string().contains("render start exploded"));
    let seen = recorder.seen.lock().clone();
    assert!(seen.expect("renderError was dispatched").contains("render start exploded"));
}

struct AssetEmittingPlugin;

#[async_trait]
impl Plugin for AssetEmittingPlugin {
    fn name(&self) -> &str {
        "asset-emitter"
    }

    async fn generate_bundle(
        &self,
        _output: &OutputOptions,
        bundle: &mut OutputBundle,
        is_write: bool,
        emit: &dyn EmitAssetContext,
    ) -> weftpack_core::error::Result<()> {
        let content = if is_write { b"written".to_vec() } else { b"generated".to_vec() };
        let file_name = emit.emit_asset("manifest.json", Some(content));
        // emitted during generateBundle, so it is not yet present in this
        // call's bundle; it is folded in by the post-hook finalize pass.
        assert!(!bundle.contains(&file_name));
        Ok(())
    }
}

#[tokio::test]
async fn generate_bundle_can_emit_an_asset_scoped_to_the_call() {
    let mut input = single_entry("x", "export const x = 1;\n");
    input.plugins = vec![Arc::new(AssetEmittingPlugin)];

    let build = weftpack(input).await.unwrap();
    let output = OutputOptions { format: Some("esm".to_string()), dir: Some("out".into()), ..Default::default() };
    let bundle = build.generate(output).await.unwrap();

    let emitted = bundle.iter().find(|e| e.file_name().contains("manifest")).expect("asset was emitted");
    match emitted {
        BundleEntry::Asset(asset) => assert_eq!(asset.source, b"generated".to_vec()),
        BundleEntry::Chunk(_) => panic!("expected an asset entry"),
    }
}
