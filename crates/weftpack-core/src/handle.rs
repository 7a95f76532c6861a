//! The public handle: what `weftpack()` resolves to, plus the
//! process-scoped watcher-handle slot, consumed by exactly one subsequent
//! top-level call.

use std::future::IntoFuture;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, Mutex as StdMutex};

use parking_lot::Mutex;
use weftpack_graph::graph::{GraphCache, ModuleGraph};
use weftpack_graph::Chunk;

use crate::driver::PluginDriver;
use crate::error::{Result, WeftpackError};
use crate::generate;
use crate::options::{InputOptions, OutputOptions};
use crate::timing::{Timing, Timings};
use crate::write::run_write;

/// Opaque reference to an external watcher, set by watcher code and
/// consumed by exactly one subsequent `weftpack()` call.
#[derive(Debug, Clone)]
pub struct WatcherHandle(pub Arc<str>);

static CURRENT_WATCHER: LazyLock<StdMutex<Option<WatcherHandle>>> = LazyLock::new(|| StdMutex::new(None));

pub fn set_current_watcher(handle: WatcherHandle) {
    *CURRENT_WATCHER.lock().unwrap() = Some(handle);
}

/// Clears the slot so it cannot leak into a later, unrelated build - cleared
/// within the call, before any suspension that could admit a racing caller.
pub(crate) fn take_current_watcher() -> Option<WatcherHandle> {
    CURRENT_WATCHER.lock().unwrap().take()
}

pub(crate) struct Inner {
    pub graph: Arc<Mutex<ModuleGraph>>,
    pub driver: Arc<PluginDriver>,
    pub input: InputOptions,
    pub chunks: Vec<Chunk>,
    pub input_base: PathBuf,
    pub optimized: AtomicBool,
    timings: Arc<Timings>,
}

/// The handle returned by `weftpack()`: cache, watched files, and the
/// `generate`/`write` entry points, plus timings when `perf` is enabled.
#[derive(Clone)]
pub struct BuildHandle {
    inner: Arc<Inner>,
    cache: Option<GraphCache>,
    watch_files: Vec<PathBuf>,
}

impl BuildHandle {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        graph: Arc<Mutex<ModuleGraph>>,
        driver: Arc<PluginDriver>,
        input: InputOptions,
        chunks: Vec<Chunk>,
        input_base: PathBuf,
        cache: Option<GraphCache>,
        watch_files: Vec<PathBuf>,
        timings: Arc<Timings>,
    ) -> Self {
        let inner = Inner { graph, driver, input, chunks, input_base, optimized: AtomicBool::new(false), timings };
        Self { inner: Arc::new(inner), cache, watch_files }
    }

    pub fn chunk_count(&self) -> usize {
        self.inner.chunks.len()
    }

    pub fn cache(&self) -> Option<&GraphCache> {
        self.cache.as_ref()
    }

    pub fn watch_files(&self) -> &[PathBuf] {
        &self.watch_files
    }

    /// Present on the handle only when `perf` was set on the input.
    pub fn get_timings(&self) -> Option<Vec<Timing>> {
        self.inner.input.perf.then(|| self.inner.timings.snapshot())
    }

    /// Returns a `GeneratePromise` rather than a bare future so the
    /// deprecated `.code()`/`.map()` accessor trap is reachable on the
    /// return value before it is awaited.
    pub fn generate(&self, output: OutputOptions) -> GeneratePromise {
        let inner = self.inner.clone();
        GeneratePromise::new(Box::pin(async move { generate::run_generate(&inner, output, false).await }))
    }

    /// `write` rejects with `MissingOutputOptions` if neither `file` nor
    /// `dir` is set, otherwise drives the generate orchestrator with
    /// `isWrite = true` followed by the writer, returning the written file
    /// names in deterministic sort order.
    pub async fn write(&self, output: OutputOptions) -> Result<Vec<String>> {
        if output.file.is_none() && output.dir.is_none() {
            return Err(WeftpackError::MissingOutputOptions);
        }
        let bundle = generate::run_generate(&self.inner, output.clone(), true).await?;
        run_write(&self.inner.driver, &output, &bundle).await
    }
}

/// `generate()`'s return value: directly awaitable via `IntoFuture`, but
/// also exposes the deprecated synchronous `.code()`/`.map()` accessors the
/// old pre-async two-field shape offered, both of which always fail with a
/// deprecation diagnostic.
pub struct GeneratePromise {
    fut: Pin<Box<dyn std::future::Future<Output = Result<crate::bundle::OutputBundle>> + Send>>,
}

impl GeneratePromise {
    fn new(fut: Pin<Box<dyn std::future::Future<Output = Result<crate::bundle::OutputBundle>> + Send>>) -> Self {
        Self { fut }
    }

    #[deprecated(note = "await the promise and read its properties instead")]
    pub fn code(&self) -> Result<String> {
        Err(WeftpackError::deprecated_accessor("code"))
    }

    #[deprecated(note = "await the promise and read its properties instead")]
    pub fn map(&self) -> Result<()> {
        Err(WeftpackError::deprecated_accessor("map"))
    }
}

impl IntoFuture for GeneratePromise {
    type Output = Result<crate::bundle::OutputBundle>;
    type IntoFuture = Pin<Box<dyn std::future::Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        self.fut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watcher_slot_is_consumed_once() {
        set_current_watcher(WatcherHandle(Arc::from("watcher-a")));
        assert!(take_current_watcher().is_some());
        assert!(take_current_watcher().is_none());
    }
}
