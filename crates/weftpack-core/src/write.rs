//! Writer: persists a finalized bundle to disk.

use std::path::{Path, PathBuf};

use crate::bundle::{BundleEntry, OutputBundle};
use crate::driver::PluginDriver;
use crate::error::{Result, WeftpackError};
use crate::options::{OutputOptions, SourcemapMode};

/// Drives the writer over every bundle entry, in parallel (cooperative -
/// `join_all` over already-constructed futures, no spawning), then
/// returns the file names in the deterministic sort order (entries, then
/// secondary chunks, then assets).
pub async fn run_write(driver: &PluginDriver, output: &OutputOptions, bundle: &OutputBundle) -> Result<Vec<String>> {
    let base = base_dir(output)?;
    let entries = bundle.sorted();

    let futures = entries.into_iter().map(|entry| write_entry(driver, output, &base, entry));
    for result in futures::future::join_all(futures).await {
        result?;
    }

    Ok(bundle.file_names_sorted())
}

fn base_dir(output: &OutputOptions) -> Result<PathBuf> {
    if let Some(dir) = &output.dir {
        return Ok(dir.clone());
    }
    let file = output.file.as_ref().ok_or(WeftpackError::MissingOutputOptions)?;
    Ok(file.parent().unwrap_or_else(|| Path::new(".")).to_path_buf())
}

async fn write_entry(driver: &PluginDriver, output: &OutputOptions, base: &Path, entry: &BundleEntry) -> Result<()> {
    let path = base.join(entry.file_name());

    match entry {
        BundleEntry::Asset(asset) => {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, &asset.source).await?;
        }
        BundleEntry::Chunk(chunk) => {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let mut code = chunk.code.clone().unwrap_or_default();
            if !code.ends_with('\n') {
                code.push('\n');
            }

            match output.sourcemap {
                SourcemapMode::Off => {
                    tokio::fs::write(&path, code.as_bytes()).await?;
                }
                SourcemapMode::External => {
                    let map_file_name = format!("{}.map", entry.file_name());
                    let map_basename = Path::new(entry.file_name())
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| entry.file_name().to_string());
                    code.push_str(&format!("//# sourceMappingURL={map_basename}.map\n"));
                    tokio::fs::write(&path, code.as_bytes()).await?;
                    if let Some(map) = &chunk.map {
                        let map_path = base.join(&map_file_name);
                        tokio::fs::write(&map_path, map.to_json_string()).await?;
                    }
                }
                SourcemapMode::Inline => {
                    if let Some(map) = &chunk.map {
                        code.push_str(&format!("//# sourceMappingURL={}\n", map.to_data_url()));
                    }
                    tokio::fs::write(&path, code.as_bytes()).await?;
                }
            }
        }
    }

    driver.onwrite(output, entry.file_name()).await
}
