//! The extension driver: three named hook-dispatch modes over an ordered
//! plugin list.
//!
//! Dispatch is deliberately not one overloaded primitive - each mode is its
//! own method, which keeps a reader from having to guess the ordering
//! semantics from a shared call site. Concurrency within `parallel` is
//! cooperative: `futures::future::join_all` starts every future and polls
//! them on this task, never spawning onto another OS thread - consistent
//! with the single-threaded cooperative scheduling the rest of the
//! orchestrator assumes.

use crate::bundle::OutputBundle;
use crate::error::Result;
use crate::options::OutputOptions;
use crate::plugin::{Addons, EmitAssetContext, SharedPlugin};
use crate::warning::{SharedWarningHandler, Warning};

pub struct PluginDriver {
    plugins: Vec<SharedPlugin>,
    on_warn: SharedWarningHandler,
}

impl PluginDriver {
    pub fn new(plugins: Vec<SharedPlugin>, on_warn: SharedWarningHandler) -> Self {
        Self { plugins, on_warn }
    }

    pub fn plugins(&self) -> &[SharedPlugin] {
        &self.plugins
    }

    pub fn on_warn(&self) -> &dyn crate::warning::WarningHandler {
        self.on_warn.as_ref()
    }

    pub fn warn(&self, warning: Warning) {
        self.on_warn.handle(warning);
    }

    /// Parallel `buildStart`: side effects only, any failure rejects the
    /// aggregate.
    pub async fn build_start(&self, input: &crate::options::InputOptions) -> Result<()> {
        tracing::debug!(plugin_count = self.plugins.len(), "dispatching buildStart");
        let futures = self.plugins.iter().map(|p| p.build_start(input));
        for result in futures::future::join_all(futures).await {
            result?;
        }
        Ok(())
    }

    /// Parallel `buildEnd`: receives the build error if any; must still run
    /// even when step 5 (Graph.build) failed.
    pub async fn build_end(&self, error: Option<&str>) -> Result<()> {
        let futures = self.plugins.iter().map(|p| p.build_end(error));
        for result in futures::future::join_all(futures).await {
            result?;
        }
        Ok(())
    }

    /// Parallel `renderStart`, followed by addon collection. Declaration
    /// order is not required for the parallel dispatch itself, but
    /// concatenation order should still be deterministic, so addons are
    /// gathered in plugin order after every `renderStart` has resolved.
    pub async fn render_start(&self, output: &OutputOptions) -> Result<Addons> {
        tracing::debug!(format = output.format.as_deref().unwrap_or("?"), "dispatching renderStart");
        let futures = self.plugins.iter().map(|p| p.render_start(output));
        for result in futures::future::join_all(futures).await {
            result?;
        }

        let mut addons = Addons::default();
        for plugin in &self.plugins {
            let contributed = plugin.addons(output).await?;
            addons.extend(&contributed);
        }
        Ok(addons)
    }

    /// Deprecated per-chunk `ongenerate` hook: parallel dispatch, plus a
    /// `PLUGIN_WARNING`/`ONGENERATE_HOOK_DEPRECATED` warning for every
    /// plugin (in declaration order) that still implements it, naming its
    /// position in the plugin list.
    pub async fn ongenerate(&self, output: &OutputOptions, chunk_file_name: &str) -> Result<()> {
        for (position, plugin) in self.plugins.iter().enumerate() {
            if plugin.has_ongenerate() {
                self.on_warn.handle(Warning::plugin(
                    "ONGENERATE_HOOK_DEPRECATED",
                    position,
                    format!("Plugin at position {position} uses the deprecated 'ongenerate' hook"),
                ));
            }
        }
        let futures = self.plugins.iter().map(|p| p.ongenerate(output, chunk_file_name));
        for result in futures::future::join_all(futures).await {
            result?;
        }
        Ok(())
    }

    /// Parallel `renderError`: receives the error, always rethrows it to the
    /// caller (the driver itself never swallows a generate failure).
    pub async fn render_error(&self, error: &str) -> Result<()> {
        let futures = self.plugins.iter().map(|p| p.render_error(error));
        for result in futures::future::join_all(futures).await {
            result?;
        }
        Ok(())
    }

    /// Sequential `generateBundle`: each hook is awaited before the next,
    /// and may mutate the bundle via `emit`.
    pub async fn generate_bundle(
        &self,
        output: &OutputOptions,
        bundle: &mut OutputBundle,
        is_write: bool,
        emit: &dyn EmitAssetContext,
    ) -> Result<()> {
        for plugin in &self.plugins {
            plugin.generate_bundle(output, bundle, is_write, emit).await?;
        }
        Ok(())
    }

    /// Sequential `onwrite`, run once per written chunk.
    pub async fn onwrite(&self, output: &OutputOptions, file_name: &str) -> Result<()> {
        for plugin in &self.plugins {
            plugin.onwrite(output, file_name).await?;
        }
        Ok(())
    }
}
