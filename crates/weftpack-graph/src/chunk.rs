use std::collections::BTreeSet;
use std::path::Path;

use rustc_hash::FxHashSet;

use crate::dialect::Dialect;
use crate::export_mode::{self, ExportMode};
use crate::module::Module;
use crate::module_id::ModuleId;
use crate::naming;
use crate::render;
use crate::sourcemap::SourceMap;

/// {code, map} produced by `Chunk::render`.
#[derive(Debug, Clone)]
pub struct RenderedChunk {
    pub code: String,
    pub map: Option<SourceMap>,
}

/// A renderable unit produced by the graph build: either an entry facade or
/// a shared secondary chunk. Owned by the graph; the core only reads its
/// public attributes and writes `id`.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Modules folded into this chunk, in the order the Graph placed them.
    modules: Vec<Module>,
    is_entry_facade: bool,
    entry_module_id: Option<ModuleId>,
    /// Logical name used for `[name]` substitution: the caller-supplied
    /// entry key for entry facades, a derived stem otherwise.
    name_hint: String,
    export_names: Vec<String>,
    export_mode: Option<ExportMode>,
    /// Mutable string id assigned by the core during the naming step.
    pub id: Option<String>,
}

impl Chunk {
    pub(crate) fn new_entry(module: Module, entry_name: String) -> Self {
        let export_names = module.export_names();
        Self {
            modules: vec![module.clone()],
            is_entry_facade: true,
            entry_module_id: Some(module.id),
            name_hint: entry_name,
            export_names,
            export_mode: None,
            id: None,
        }
    }

    pub(crate) fn new_secondary(modules: Vec<Module>, name_hint: String) -> Self {
        Self {
            modules,
            is_entry_facade: false,
            entry_module_id: None,
            name_hint,
            export_names: Vec::new(),
            export_mode: None,
            id: None,
        }
    }

    pub(crate) fn push_module(&mut self, module: Module) {
        self.modules.push(module);
    }

    /// Folds another secondary chunk's modules into this one, for the
    /// post-build chunk optimizer's size-threshold grouping pass. Entry
    /// facades are never absorption targets or sources; callers enforce that.
    pub fn absorb(&mut self, other: Chunk) {
        self.modules.extend(other.modules);
    }

    /// Approximate rendered size in bytes, used only to decide whether a
    /// chunk is small enough to fold into a neighbour. Sums source length
    /// rather than re-rendering, since the optimizer runs before ids exist.
    pub fn approx_size(&self) -> usize {
        self.modules.iter().map(|m| m.source.len()).sum()
    }

    pub fn is_entry_module_facade(&self) -> bool {
        self.is_entry_facade
    }

    pub fn entry_module(&self) -> Option<&Module> {
        self.entry_module_id.and_then(|id| self.modules.iter().find(|m| m.id == id))
    }

    pub fn rendered_modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn name_hint(&self) -> &str {
        &self.name_hint
    }

    /// Specifiers this chunk imports from modules it does not itself
    /// contain - i.e. cross-chunk and external edges a dialect wrapper
    /// (AMD/SYSTEM) must declare as dependencies, and what the UMD/IIFE
    /// `output.globals` check treats as "external" imports needing a name.
    ///
    /// Relative specifiers are resolved against their importing module's own
    /// directory before the own-chunk check, since two modules in different
    /// directories can use different relative spellings (`./dep` vs
    /// `../sibling/dep`) for the same file.
    pub fn import_ids(&self) -> Vec<String> {
        let own_paths: FxHashSet<&Path> = self.modules.iter().map(|m| m.path.as_path()).collect();
        let mut out = BTreeSet::new();
        for module in &self.modules {
            for import in module.import_specifiers() {
                if crate::graph::is_external_specifier(import) {
                    out.insert(import.to_string());
                    continue;
                }
                let resolved = crate::graph::resolve_specifier(module.directory(), import);
                if !own_paths.contains(resolved.as_path()) {
                    out.insert(import.to_string());
                }
            }
        }
        out.into_iter().collect()
    }

    pub fn export_names(&self) -> &[String] {
        &self.export_names
    }

    pub fn export_mode(&self) -> Option<ExportMode> {
        self.export_mode
    }

    /// Generates internal export bindings against the output dialect. At
    /// this crate's fidelity that means deciding the chunk's public export
    /// list; non-entry-facade chunks never re-export publicly at this
    /// level - from the core's vantage a chunk is a leaf for anything
    /// downstream of linking.
    pub fn generate_internal_exports(&mut self, _dialect: Dialect) {
        if !self.is_entry_facade {
            self.export_names.clear();
        }
    }

    /// Entry facades only: resolve export mode via the export-mode
    /// collaborator.
    pub fn pre_render(&mut self, _dialect: Dialect, _input_base: &Path) {
        if self.is_entry_facade {
            self.export_mode = Some(export_mode::resolve(&self.export_names));
        }
    }

    /// `preserveModules` naming: mirrors the input file's relative path
    /// under `inputBase`, with a `.js` extension.
    pub fn generate_id_preserve_modules(&self, input_base: &Path) -> String {
        let module = self.entry_module().or_else(|| self.modules.first()).expect("chunk has at least one module");
        let relative = module.path.strip_prefix(input_base).unwrap_or(&module.path);
        relative.with_extension("js").to_string_lossy().replace('\\', "/")
    }

    /// Delegated id generation for non-preserveModules chunks: renders the
    /// chunk body first (deterministic, independent of final file name) to
    /// use as the `[hash]` source, then substitutes the pattern and
    /// resolves collisions against `used_ids`.
    pub fn generate_id(&self, pattern: &str, dialect: Dialect, used_ids: &FxHashSet<String>) -> String {
        let refs: Vec<&Module> = self.modules.iter().collect();
        let body = render::render_body(&refs);
        let manifest = if self.is_entry_facade {
            render::render_export_manifest(dialect, &self.export_names)
        } else {
            String::new()
        };
        let content = format!("{body}{manifest}");
        naming::generate_id(pattern, &self.name_hint, content.as_bytes(), ".js", used_ids)
    }

    /// Renders this chunk's final code (and, when requested, a source map)
    /// against the output dialect.
    pub fn render(
        &self,
        dialect: Dialect,
        globals: &[(String, String)],
        bundle_name: Option<&str>,
        want_map: bool,
    ) -> RenderedChunk {
        let refs: Vec<&Module> = self.modules.iter().collect();
        let body = render::render_body(&refs);
        let manifest = if self.is_entry_facade {
            render::render_export_manifest(dialect, &self.export_names)
        } else {
            String::new()
        };
        let combined = format!("{body}{manifest}");
        let code = render::wrap_for_dialect(dialect, bundle_name, globals, combined);

        let map = if want_map { Some(build_source_map(&refs)) } else { None };

        RenderedChunk { code, map }
    }
}

/// Builds a one-segment-per-module source map mapping generated line 0 of
/// each module's contribution back to line 0 of its original source - exact
/// for single-statement modules, a simplification for anything with
/// internal newlines restructured by a real code generator, which is out
/// of scope here.
fn build_source_map(modules: &[&Module]) -> SourceMap {
    let sources = modules.iter().map(|m| m.path.to_string_lossy().into_owned()).collect();
    let sources_content = modules.iter().map(|m| m.source.to_string()).collect();
    let segments = modules
        .iter()
        .enumerate()
        .map(|(i, _)| (i as u32, 0u32, i as u32))
        .collect();
    SourceMap::new(sources, sources_content, segments)
}
