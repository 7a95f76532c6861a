//! Extensions: caller-supplied hook implementations, called "plugin"
//! throughout this crate's public API.
//!
//! Modeled as a tagged trait with optional-by-default methods rather than a
//! class hierarchy: `Plugin` provides a default (empty) body for every hook,
//! so an implementor only overrides the ones it cares about, and the driver
//! dispatches "by field presence" via `dyn Plugin` method calls instead of
//! inspecting which methods were overridden.

use std::sync::Arc;

use async_trait::async_trait;

use crate::bundle::OutputBundle;
use crate::error::Result;
use crate::options::{InputOptions, OutputOptions};

/// A single named export/declared string contributed to the banner, footer,
/// intro, or outro of a chunk.
#[derive(Debug, Clone, Default)]
pub struct Addons {
    pub banner: String,
    pub footer: String,
    pub intro: String,
    pub outro: String,
}

impl Addons {
    pub fn extend(&mut self, other: &Addons) {
        self.banner.push_str(&other.banner);
        self.footer.push_str(&other.footer);
        self.intro.push_str(&other.intro);
        self.outro.push_str(&other.outro);
    }
}

/// Per-call handle passed to `generateBundle`, letting a plugin emit assets
/// scoped to the current generate call only.
pub trait EmitAssetContext: Send + Sync {
    fn emit_asset(&self, name: &str, source: Option<Vec<u8>>) -> String;
}

/// A caller-supplied extension. Every hook has a no-op default; `enabled()`
/// lets a plugin opt out of a build at construction time rather than
/// requiring the caller to filter its own plugin list (falsy/absent entries
/// are dropped before this point).
#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str {
        "anonymous"
    }

    fn enabled(&self) -> bool {
        true
    }

    /// The `options` hook: may return a replacement input configuration.
    /// Unlike the other hooks this one is dispatched specially - sequential,
    /// chained across the plugin list - rather than through one of the
    /// three named dispatch modes.
    async fn options(&self, input: &InputOptions) -> Result<Option<InputOptions>> {
        let _ = input;
        Ok(None)
    }

    async fn build_start(&self, input: &InputOptions) -> Result<()> {
        let _ = input;
        Ok(())
    }

    async fn build_end(&self, error: Option<&str>) -> Result<()> {
        let _ = error;
        Ok(())
    }

    async fn render_start(&self, output: &OutputOptions) -> Result<()> {
        let _ = output;
        Ok(())
    }

    /// Deprecated per-chunk hook; the driver itself is responsible for
    /// emitting the `ONGENERATE_HOOK_DEPRECATED` warning when a plugin
    /// overrides this, naming the plugin's declaration position.
    async fn ongenerate(&self, output: &OutputOptions, chunk_file_name: &str) -> Result<()> {
        let _ = (output, chunk_file_name);
        Ok(())
    }

    /// Whether this plugin implements the deprecated `ongenerate` hook, so
    /// the driver can warn without invoking a no-op default. Overridden
    /// alongside `ongenerate` itself.
    fn has_ongenerate(&self) -> bool {
        false
    }

    async fn render_error(&self, error: &str) -> Result<()> {
        let _ = error;
        Ok(())
    }

    async fn generate_bundle(
        &self,
        output: &OutputOptions,
        bundle: &mut OutputBundle,
        is_write: bool,
        emit: &dyn EmitAssetContext,
    ) -> Result<()> {
        let _ = (output, bundle, is_write, emit);
        Ok(())
    }

    async fn onwrite(&self, output: &OutputOptions, file_name: &str) -> Result<()> {
        let _ = (output, file_name);
        Ok(())
    }

    /// Addons contributed by this plugin, collected once per generate call
    /// after `renderStart`.
    async fn addons(&self, output: &OutputOptions) -> Result<Addons> {
        let _ = output;
        Ok(Addons::default())
    }
}

pub type SharedPlugin = Arc<dyn Plugin>;
