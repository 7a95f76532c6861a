//! Warnings: non-fatal diagnostics routed through a caller-supplied sink.

use std::fmt;
use std::sync::Arc;

/// A single warning, with an optional machine code and, for plugin-sourced
/// warnings, the offending plugin's declaration position.
#[derive(Debug, Clone)]
pub struct Warning {
    pub code: Option<&'static str>,
    pub message: String,
    pub plugin_code: Option<&'static str>,
    pub plugin_position: Option<usize>,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self { code: None, message: message.into(), plugin_code: None, plugin_position: None }
    }

    pub fn with_code(code: &'static str, message: impl Into<String>) -> Self {
        Self { code: Some(code), message: message.into(), plugin_code: None, plugin_position: None }
    }

    /// `PLUGIN_WARNING`, e.g. the deprecated `ongenerate` hook.
    pub fn plugin(plugin_code: &'static str, position: usize, message: impl Into<String>) -> Self {
        Self {
            code: Some("PLUGIN_WARNING"),
            message: message.into(),
            plugin_code: Some(plugin_code),
            plugin_position: Some(position),
        }
    }

    pub fn unknown_option(key: &str) -> Self {
        Self::with_code("UNKNOWN_OPTION", format!("Unknown option found: {key}"))
    }

    pub fn missing_global_name(specifier: &str) -> Self {
        Self::with_code(
            "MISSING_GLOBAL_NAME",
            format!(
                "No name was provided for external module '{specifier}' in output.globals - guessing '{specifier}'"
            ),
        )
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Caller-supplied sink for warnings. The default handler is a no-op; a
/// caller that wants fallthrough behavior (e.g. printing to stderr) installs
/// its own `WarningHandler`.
pub trait WarningHandler: Send + Sync {
    fn handle(&self, warning: Warning);
}

/// `WarningHandler` that drops every warning - the default when a caller
/// supplies none.
#[derive(Default)]
pub struct SilentWarningHandler;

impl WarningHandler for SilentWarningHandler {
    fn handle(&self, _warning: Warning) {}
}

/// `WarningHandler` that accumulates every warning it receives, used by
/// tests asserting on the exact warnings a build produced.
#[derive(Default)]
pub struct CollectingWarningHandler {
    warnings: parking_lot::Mutex<Vec<Warning>>,
}

impl CollectingWarningHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings.lock())
    }
}

impl WarningHandler for CollectingWarningHandler {
    fn handle(&self, warning: Warning) {
        self.warnings.lock().push(warning);
    }
}

/// Wraps a caller's handler so every warning is also mirrored through
/// `tracing::warn!` before delegating, so `on_warn` stays the single path a
/// caller hooks while structured logs still see every warning.
pub struct TracingMirrorHandler {
    inner: SharedWarningHandler,
}

impl TracingMirrorHandler {
    pub fn new(inner: SharedWarningHandler) -> Self {
        Self { inner }
    }
}

impl WarningHandler for TracingMirrorHandler {
    fn handle(&self, warning: Warning) {
        tracing::warn!(code = warning.code.unwrap_or("UNKNOWN"), message = %warning.message, "bundler warning");
        self.inner.handle(warning);
    }
}

pub type SharedWarningHandler = Arc<dyn WarningHandler>;
