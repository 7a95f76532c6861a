//! End-to-end: discover a `weftpack.toml` on disk, convert it into
//! `InputOptions`, and run a real build through `weftpack_core`.

use std::fs;

use tempfile::TempDir;
use weftpack_config::ConfigDiscovery;

#[tokio::test]
async fn discovered_toml_config_drives_a_real_build() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.js"), "export const x = 1;\n").unwrap();
    fs::write(
        dir.path().join("weftpack.toml"),
        "entries = [\"index.js\"]\n",
    )
    .unwrap();

    let config = ConfigDiscovery::new(dir.path()).load().unwrap();
    let mut input = config.into_input_options().unwrap();
    // `into_input_options` stores entries relative to the project root;
    // resolve them against the temp dir before handing off to the builder.
    let mut named = indexmap::IndexMap::new();
    named.insert("index".to_string(), weftpack_graph::graph::EntrySource::Path(dir.path().join("index.js")));
    input.input = weftpack_core::options::EntrySpec::Named(named);

    let build = weftpack_core::weftpack(input).await.unwrap();
    assert_eq!(build.chunk_count(), 1);
}

#[tokio::test]
async fn discovered_package_json_config_sets_optimize_chunks() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.js"), "export const x = 1;\n").unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{"name": "demo", "weftpack": {"entries": ["index.js"], "optimize_chunks": true}}"#,
    )
    .unwrap();

    let config = ConfigDiscovery::new(dir.path()).load().unwrap();
    assert!(config.optimize_chunks);

    let input = config.into_input_options().unwrap();
    assert!(input.optimize_chunks);
}

#[tokio::test]
async fn missing_config_surfaces_not_found() {
    let dir = TempDir::new().unwrap();
    let err = ConfigDiscovery::new(dir.path()).load().unwrap_err();
    assert!(matches!(err, weftpack_config::ConfigError::NotFound { .. }));
}
