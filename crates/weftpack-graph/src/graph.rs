//! The module graph walker and chunk partitioner.
//!
//! This is the collaborator the build/generate orchestrators treat as
//! external: it resolves entries, walks static imports to build the
//! reachable module set, and partitions that set into chunks that preserve
//! dynamic-import boundaries. What it deliberately does *not* do is
//! tree-shake (every reachable declaration is kept) or resolve a real
//! module-resolution algorithm (node_modules, package.json `exports`,
//! extension-less specifiers beyond a `.js` default) - both would be a
//! second bundler-resolver project in their own right and are out of scope
//! here.
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use oxc_span::SourceType;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::asset::Asset;
use crate::chunk::Chunk;
use crate::error::{GraphError, Result};
use crate::module::Module;
use crate::module_id::ModuleId;
use crate::parse;

/// Where a module's source text comes from. Real entry resolution
/// (node_modules walking, package.json `exports` maps, loader plugins) is
/// out of scope; callers (the CLI, or a test) decide up front whether a
/// specifier names a file on disk or supplies literal source directly, the
/// latter covering plugin-provided virtual modules in a form this crate can
/// execute without hosting a script engine.
#[derive(Debug, Clone)]
pub enum EntrySource {
    Path(PathBuf),
    Inline { virtual_path: PathBuf, source: String },
}

impl EntrySource {
    fn virtual_path(&self) -> &Path {
        match self {
            Self::Path(p) => p,
            Self::Inline { virtual_path, .. } => virtual_path,
        }
    }
}

/// Caller-specified hint grouping modules into named chunks. Rather than an
/// opaque grouping callback (this workspace has no script host to invoke a
/// caller-supplied function), it is represented as a direct mapping from
/// chunk name to the module specifiers assigned to it - the same
/// information a grouping function would ultimately produce.
pub type ManualChunks = FxHashMap<String, Vec<String>>;

/// Opaque cache snapshot handed back to callers that did not pass
/// `cache: false`. Real cross-build reuse (the `cache`/`cache-reuse flag`
/// recognized by `InputConfig`) is out of scope; this snapshot exists so the
/// contract (`cache` present on the public handle) is honest rather than
/// faked with `()`.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct GraphCache {
    pub module_count: usize,
    pub module_paths: Vec<PathBuf>,
}

#[derive(Default)]
pub struct ModuleGraph {
    modules: Vec<Module>,
    path_to_id: FxHashMap<PathBuf, ModuleId>,
    assets: IndexMap<String, Asset>,
    watch_files: Vec<PathBuf>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves entries, walks the graph, and returns an ordered chunk list
    /// that preserves dynamic-import boundaries.
    pub fn build(
        &mut self,
        entries: &IndexMap<String, EntrySource>,
        manual_chunks: Option<&ManualChunks>,
        inline_dynamic_imports: bool,
        preserve_modules: bool,
    ) -> Result<Vec<Chunk>> {
        if inline_dynamic_imports && entries.len() != 1 {
            return Err(GraphError::InlineDynamicImportsMultipleEntries { count: entries.len() });
        }

        let mut dynamic_targets: Vec<ModuleId> = Vec::new();
        let mut entry_roots: IndexMap<String, ModuleId> = IndexMap::new();

        for (name, source) in entries {
            let id = self.load_module(source, true, Some(name.clone()))?;
            entry_roots.insert(name.clone(), id);
        }

        // Walk static imports breadth-first from every entry, discovering
        // dynamic-import targets as we go; those become additional roots
        // unless inlineDynamicImports folds them into the sole entry chunk.
        let mut frontier: Vec<ModuleId> = entry_roots.values().copied().collect();
        let mut visited: FxHashSet<ModuleId> = frontier.iter().copied().collect();
        let mut dynamic_roots: IndexMap<String, ModuleId> = IndexMap::new();

        while let Some(id) = frontier.pop() {
            let module = self.modules[id.index()].clone();
            let dir = module.directory().to_path_buf();

            for specifier in module.import_specifiers() {
                if is_external_specifier(specifier) {
                    continue;
                }
                let resolved = resolve_specifier(&dir, specifier);
                let child_id = self.load_module(&EntrySource::Path(resolved), false, None)?;
                if visited.insert(child_id) {
                    frontier.push(child_id);
                }
            }

            if !inline_dynamic_imports {
                for specifier in module.dynamic_import_specifiers() {
                    if is_external_specifier(specifier) {
                        continue;
                    }
                    let resolved = resolve_specifier(&dir, specifier);
                    let child_id = self.load_module(&EntrySource::Path(resolved.clone()), false, None)?;
                    if !dynamic_targets.contains(&child_id) {
                        dynamic_targets.push(child_id);
                        // Named after the resolved file, not the raw specifier
                        // text, so a dynamic import chunk gets a clean file
                        // name (`dyndep.js`) rather than `./dyndep.js`.
                        dynamic_roots.insert(stem(&resolved), child_id);
                    }
                    if visited.insert(child_id) {
                        frontier.push(child_id);
                    }
                }
            }
        }

        let all_roots: IndexMap<String, ModuleId> =
            entry_roots.iter().chain(dynamic_roots.iter()).map(|(k, v)| (k.clone(), *v)).collect();

        if preserve_modules {
            return Ok(self.build_preserve_modules_chunks(&visited));
        }

        if let Some(manual) = manual_chunks {
            return Ok(self.build_manual_chunks(manual, &all_roots, &visited));
        }

        Ok(self.build_default_chunks(&all_roots, &visited))
    }

    /// `preserveModules`: every reachable module becomes its own chunk,
    /// named after its own path rather than folded into a shared root.
    fn build_preserve_modules_chunks(&self, visited: &FxHashSet<ModuleId>) -> Vec<Chunk> {
        let mut ids: Vec<ModuleId> = visited.iter().copied().collect();
        ids.sort_by_key(|id| id.index());
        ids.into_iter()
            .map(|id| {
                let module = self.modules[id.index()].clone();
                let name = module.entry_name.clone().unwrap_or_else(|| stem(&module.path));
                Chunk::new_entry(module, name)
            })
            .collect()
    }

    fn build_manual_chunks(
        &self,
        manual: &ManualChunks,
        roots: &IndexMap<String, ModuleId>,
        visited: &FxHashSet<ModuleId>,
    ) -> Vec<Chunk> {
        let mut assigned: FxHashMap<ModuleId, String> = FxHashMap::default();
        for (group_name, specifiers) in manual {
            for specifier in specifiers {
                if let Some(id) = self.path_to_id.get(&PathBuf::from(specifier)) {
                    assigned.insert(*id, group_name.clone());
                }
            }
        }
        self.build_default_chunks_with_overrides(roots, visited, &assigned)
    }

    fn build_default_chunks(&self, roots: &IndexMap<String, ModuleId>, visited: &FxHashSet<ModuleId>) -> Vec<Chunk> {
        self.build_default_chunks_with_overrides(roots, visited, &FxHashMap::default())
    }

    /// The default, no-hint partitioning: a module reachable (via static
    /// imports only) from exactly one root keeps that root's chunk; a
    /// module reachable from more than one root is hoisted into a shared,
    /// nameless secondary chunk named via its content hash.
    fn build_default_chunks_with_overrides(
        &self,
        roots: &IndexMap<String, ModuleId>,
        visited: &FxHashSet<ModuleId>,
        manual_overrides: &FxHashMap<ModuleId, String>,
    ) -> Vec<Chunk> {
        let owners = self.compute_owning_roots(roots, visited);

        let mut chunks: Vec<Chunk> = Vec::new();
        let mut root_chunk_index: FxHashMap<String, usize> = FxHashMap::default();
        let mut shared_chunk_index: FxHashMap<Vec<String>, usize> = FxHashMap::default();
        let mut manual_chunk_index: FxHashMap<String, usize> = FxHashMap::default();

        for (root_name, root_id) in roots {
            let module = self.modules[root_id.index()].clone();
            let chunk = Chunk::new_entry(module, root_name.clone());
            root_chunk_index.insert(root_name.clone(), chunks.len());
            chunks.push(chunk);
        }

        let root_ids: FxHashSet<ModuleId> = roots.values().copied().collect();
        let mut ids: Vec<ModuleId> = visited.iter().copied().collect();
        ids.sort_by_key(|id| id.index());

        for id in ids {
            if root_ids.contains(&id) {
                continue; // root modules already seeded their own chunk above
            }

            if let Some(group_name) = manual_overrides.get(&id) {
                let idx = *manual_chunk_index.entry(group_name.clone()).or_insert_with(|| {
                    chunks.push(Chunk::new_secondary(Vec::new(), group_name.clone()));
                    chunks.len() - 1
                });
                chunks[idx].push_module(self.modules[id.index()].clone());
                continue;
            }

            let module_owners = owners.get(&id).cloned().unwrap_or_default();
            match module_owners.as_slice() {
                [only] => {
                    let idx = *root_chunk_index.get(only).expect("owner root has a chunk");
                    chunks[idx].push_module(self.modules[id.index()].clone());
                }
                _ => {
                    let mut sorted = module_owners.clone();
                    sorted.sort();
                    let idx = *shared_chunk_index.entry(sorted).or_insert_with(|| {
                        chunks.push(Chunk::new_secondary(Vec::new(), "chunk".to_string()));
                        chunks.len() - 1
                    });
                    chunks[idx].push_module(self.modules[id.index()].clone());
                }
            }
        }

        chunks
    }

    /// For each visited, non-root module, the set of root names (entry or
    /// dynamic-import target) it is reachable from by following only
    /// static import edges.
    fn compute_owning_roots(
        &self,
        roots: &IndexMap<String, ModuleId>,
        visited: &FxHashSet<ModuleId>,
    ) -> FxHashMap<ModuleId, Vec<String>> {
        let mut owners: FxHashMap<ModuleId, Vec<String>> = FxHashMap::default();

        for (root_name, root_id) in roots {
            let mut stack = vec![*root_id];
            let mut seen_from_this_root: FxHashSet<ModuleId> = FxHashSet::default();
            seen_from_this_root.insert(*root_id);
            while let Some(id) = stack.pop() {
                let module = &self.modules[id.index()];
                for specifier in module.import_specifiers() {
                    let resolved = resolve_specifier(module.directory(), specifier);
                    if let Some(child_id) = self.path_to_id.get(&resolved).copied() {
                        if visited.contains(&child_id) && seen_from_this_root.insert(child_id) {
                            owners.entry(child_id).or_default().push(root_name.clone());
                            stack.push(child_id);
                        }
                    }
                }
            }
        }

        owners
    }

    fn load_module(&mut self, source: &EntrySource, is_entry: bool, entry_name: Option<String>) -> Result<ModuleId> {
        let path = source.virtual_path().to_path_buf();
        if let Some(existing) = self.path_to_id.get(&path) {
            return Ok(*existing);
        }

        let text = match source {
            EntrySource::Path(p) => std::fs::read_to_string(p).map_err(|e| GraphError::ParseFailure {
                path: p.clone(),
                message: e.to_string(),
            })?,
            EntrySource::Inline { source, .. } => source.clone(),
        };

        parse::check_parses(&text, SourceType::mjs())?;
        let extracted = parse::extract(&text);

        let id = ModuleId(self.modules.len() as u32);
        let mut builder = Module::builder(id, path.clone(), text.as_str())
            .static_imports(extracted.static_imports)
            .dynamic_imports(extracted.dynamic_imports)
            .exports(extracted.exports)
            .has_star_export(extracted.has_star_export);
        if is_entry {
            builder = builder.entry(entry_name);
        }
        let module = builder.build();

        self.modules.push(module);
        self.path_to_id.insert(path.clone(), id);
        self.watch_files.push(path);
        Ok(id)
    }

    /// Returns the finalized `(fileName, Asset)` pairs for every asset that
    /// already has source bytes. The core merges these into its own
    /// `OutputBundle` at the start of generate.
    pub fn finalise_assets(&mut self, asset_pattern: &str) -> Result<Vec<(String, Asset)>> {
        let mut out = Vec::new();
        for asset in self.assets.values_mut() {
            if asset.source.is_some() && !asset.is_finalized() {
                asset.finalize(asset_pattern)?;
            }
            if let Some(file_name) = asset.file_name.clone() {
                out.push((file_name, asset.clone()));
            }
        }
        Ok(out)
    }

    pub fn emit_asset(&mut self, name: impl Into<String>, source: Option<Vec<u8>>) -> String {
        let name = name.into();
        self.assets.insert(name.clone(), Asset::new(name.clone(), source));
        name
    }

    pub fn get_cache(&self) -> GraphCache {
        GraphCache { module_count: self.modules.len(), module_paths: self.watch_files.clone() }
    }

    pub fn watch_files(&self) -> &[PathBuf] {
        &self.watch_files
    }

    pub fn assets_by_id(&self) -> &IndexMap<String, Asset> {
        &self.assets
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    /// Longest common directory prefix of every entry module's resolved
    /// path - the *inputBase* used for `preserveModules` naming and
    /// relative module-path reporting.
    pub fn input_base(&self, entries: &IndexMap<String, EntrySource>) -> PathBuf {
        let dirs: Vec<PathBuf> = entries.values().map(|s| s.virtual_path().parent().unwrap_or(Path::new("")).to_path_buf()).collect();
        longest_common_prefix(&dirs)
    }
}

/// Specifiers this crate does not attempt to resolve at all: anything that
/// isn't relative (`./foo`, `../foo`) or absolute is a bare package-style
/// specifier (`lodash`) with no node_modules resolution to fall back on (see
/// module-level docs), so it is left as an external import rather than
/// erroring or being folded into the graph.
pub(crate) fn is_external_specifier(specifier: &str) -> bool {
    !(specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/'))
}

pub(crate) fn resolve_specifier(base_dir: &Path, specifier: &str) -> PathBuf {
    let mut path = if specifier.starts_with('.') {
        base_dir.join(specifier)
    } else {
        PathBuf::from(specifier)
    };
    if path.extension().is_none() {
        path.set_extension("js");
    }
    path_clean::clean(path.to_string_lossy().as_ref())
}

fn stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "chunk".to_string())
}

fn longest_common_prefix(paths: &[PathBuf]) -> PathBuf {
    let Some(first) = paths.first() else {
        return PathBuf::new();
    };
    let mut prefix: Vec<std::ffi::OsString> = first.components().map(|c| c.as_os_str().to_os_string()).collect();

    for path in &paths[1..] {
        let components: Vec<std::ffi::OsString> = path.components().map(|c| c.as_os_str().to_os_string()).collect();
        let common_len = prefix.iter().zip(components.iter()).take_while(|(a, b)| a == b).count();
        prefix.truncate(common_len);
    }

    prefix.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(name: &str, source: &str) -> EntrySource {
        EntrySource::Inline { virtual_path: PathBuf::from(name), source: source.to_string() }
    }

    #[test]
    fn single_entry_no_imports_yields_one_chunk() {
        let mut graph = ModuleGraph::new();
        let mut entries = IndexMap::new();
        entries.insert("x".to_string(), inline("x.js", "export const x = function () {};\n"));
        let chunks = graph.build(&entries, None, false, false).unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_entry_module_facade());
    }

    #[test]
    fn shared_dependency_is_hoisted_into_its_own_chunk() {
        let mut graph = ModuleGraph::new();
        let mut entries = IndexMap::new();
        entries.insert("main1".to_string(), inline("main1.js", "import { dep } from './dep';\nexport const a = dep;\n"));
        entries.insert("main2".to_string(), inline("main2.js", "import { dep } from './dep';\nexport const b = dep;\n"));

        // Pre-register the shared dependency as an inline module reachable
        // by relative path resolution.
        graph.load_module(&inline("dep.js", "export const dep = 1;\n"), false, None).unwrap();

        let chunks = graph.build(&entries, None, false, false).unwrap();
        // main1, main2 entry facades + one shared secondary chunk for dep.
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().any(|c| !c.is_entry_module_facade()));
    }

    #[test]
    fn preserve_modules_creates_one_chunk_per_module() {
        let mut graph = ModuleGraph::new();
        let mut entries = IndexMap::new();
        entries.insert("x".to_string(), inline("x.js", "export const x = 1;\n"));
        let chunks = graph.build(&entries, None, false, true).unwrap();
        assert_eq!(chunks.len(), 1);
    }
}
