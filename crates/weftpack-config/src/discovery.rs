//! File-based config discovery for CLI use.
//!
//! Finds and loads a `weftpack` configuration from the filesystem, the way
//! a CLI invocation does before it ever touches `weftpack_core`. Library
//! callers that already have a `serde_json::Value` in hand should go
//! straight to `WeftpackConfig::from_value` instead.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::WeftpackConfig;
use crate::error::{ConfigError, Result};

/// Searches conventional locations under a root directory and loads
/// whichever configuration file it finds.
///
/// # Example
///
/// ```no_run
/// use weftpack_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// Looks for a config file in this order:
    /// 1. `weftpack.toml`
    /// 2. `package.json`'s `weftpack` field
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join("weftpack.toml");
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed.get("weftpack").is_some_and(|v| !v.is_null()) {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Loads the discovered config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<WeftpackConfig> {
        let path = self.find().ok_or_else(|| ConfigError::NotFound { root: self.root.clone() })?;
        self.load_from(&path)
    }

    fn load_from(&self, path: &Path) -> Result<WeftpackConfig> {
        if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            return self.load_from_package_json(path);
        }

        let content = fs::read_to_string(path)?;

        let toml_val: toml::Value = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_value("toml", format!("invalid TOML syntax: {e}")))?;

        let value = serde_json::to_value(toml_val)
            .map_err(|e| ConfigError::invalid_value("toml", format!("TOML to JSON conversion failed: {e}")))?;

        WeftpackConfig::from_value(value)
    }

    fn load_from_package_json(&self, path: &Path) -> Result<WeftpackConfig> {
        let content = fs::read_to_string(path)?;

        let parsed: Value = serde_json::from_str(&content)
            .map_err(|e| ConfigError::invalid_value("package.json", format!("invalid JSON: {e}")))?;

        let weftpack_value = parsed
            .get("weftpack")
            .ok_or_else(|| ConfigError::invalid_value("weftpack", "add a 'weftpack' field to your package.json"))?;

        if weftpack_value.is_null() {
            return Err(ConfigError::invalid_value("weftpack", "the 'weftpack' field cannot be null"));
        }

        WeftpackConfig::from_value(weftpack_value.clone())
    }
}

/// Discovers and loads config from the current directory.
///
/// # Example
///
/// ```no_run
/// use weftpack_config::discover;
///
/// let config = discover().unwrap();
/// ```
pub fn discover() -> Result<WeftpackConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn find_returns_none_when_no_config() {
        let dir = TempDir::new().unwrap();
        let discovery = ConfigDiscovery::new(dir.path());
        assert!(discovery.find().is_none());
    }

    #[test]
    fn find_discovers_toml_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("weftpack.toml");
        fs::write(&config_path, "entries = [\"index.js\"]\n").unwrap();

        let discovery = ConfigDiscovery::new(dir.path());
        assert_eq!(discovery.find().unwrap(), config_path);
    }

    #[test]
    fn load_returns_not_found_when_no_config() {
        let dir = TempDir::new().unwrap();
        let discovery = ConfigDiscovery::new(dir.path());
        let result = discovery.load();
        assert!(matches!(result.unwrap_err(), ConfigError::NotFound { .. }));
    }

    #[test]
    fn load_parses_toml_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("weftpack.toml"),
            "entries = [\"index.js\"]\noptimize_chunks = true\n",
        )
        .unwrap();

        let discovery = ConfigDiscovery::new(dir.path());
        let config = discovery.load().unwrap();
        assert_eq!(config.entries, vec![PathBuf::from("index.js")]);
        assert!(config.optimize_chunks);
    }

    #[test]
    fn load_from_package_json() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{
                "name": "test",
                "weftpack": {
                    "entries": ["index.js"]
                }
            }"#,
        )
        .unwrap();

        let discovery = ConfigDiscovery::new(dir.path());
        let config = discovery.load().unwrap();
        assert_eq!(config.entries, vec![PathBuf::from("index.js")]);
    }

    #[test]
    fn package_json_without_weftpack_field_is_invalid() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name": "test"}"#).unwrap();

        let discovery = ConfigDiscovery::new(dir.path());
        assert!(discovery.find().is_none());
    }
}
