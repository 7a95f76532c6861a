use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::import_export::{DynamicImport, ExportBinding, StaticImport};
use crate::module_id::ModuleId;

/// One resolved source file in the dependency graph.
///
/// Arena id, path, and import/export lists behind `Arc` so chunks can share
/// read access without cloning, trimmed to what the orchestrator and
/// renderer actually consult: no symbol table, no package.json
/// classification, no bundled-size bookkeeping, since tree-shaking
/// precision is explicitly out of scope here.
#[derive(Debug, Clone)]
pub struct Module {
    pub id: ModuleId,
    pub path: PathBuf,
    pub source: Arc<str>,
    pub static_imports: Arc<Vec<StaticImport>>,
    pub dynamic_imports: Arc<Vec<DynamicImport>>,
    pub exports: Arc<Vec<ExportBinding>>,
    pub has_star_export: bool,
    pub is_entry: bool,
    pub entry_name: Option<String>,
    pub is_external: bool,
}

impl Module {
    pub fn builder(id: ModuleId, path: impl Into<PathBuf>, source: impl Into<Arc<str>>) -> ModuleBuilder {
        ModuleBuilder::new(id, path, source)
    }

    pub fn import_specifiers(&self) -> impl Iterator<Item = &str> {
        self.static_imports.iter().map(|i| i.specifier.as_str())
    }

    pub fn dynamic_import_specifiers(&self) -> impl Iterator<Item = &str> {
        self.dynamic_imports.iter().map(|i| i.specifier.as_str())
    }

    pub fn export_names(&self) -> Vec<String> {
        self.exports.iter().map(|e| e.exported_name.clone()).collect()
    }

    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

pub struct ModuleBuilder {
    id: ModuleId,
    path: PathBuf,
    source: Arc<str>,
    static_imports: Vec<StaticImport>,
    dynamic_imports: Vec<DynamicImport>,
    exports: Vec<ExportBinding>,
    has_star_export: bool,
    is_entry: bool,
    entry_name: Option<String>,
    is_external: bool,
}

impl ModuleBuilder {
    fn new(id: ModuleId, path: impl Into<PathBuf>, source: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            path: path.into(),
            source: source.into(),
            static_imports: Vec::new(),
            dynamic_imports: Vec::new(),
            exports: Vec::new(),
            has_star_export: false,
            is_entry: false,
            entry_name: None,
            is_external: false,
        }
    }

    pub fn static_imports(mut self, imports: Vec<StaticImport>) -> Self {
        self.static_imports = imports;
        self
    }

    pub fn dynamic_imports(mut self, imports: Vec<DynamicImport>) -> Self {
        self.dynamic_imports = imports;
        self
    }

    pub fn exports(mut self, exports: Vec<ExportBinding>) -> Self {
        self.exports = exports;
        self
    }

    pub fn has_star_export(mut self, value: bool) -> Self {
        self.has_star_export = value;
        self
    }

    pub fn entry(mut self, name: Option<String>) -> Self {
        self.is_entry = true;
        self.entry_name = name;
        self
    }

    pub fn external(mut self, value: bool) -> Self {
        self.is_external = value;
        self
    }

    pub fn build(self) -> Module {
        Module {
            id: self.id,
            path: self.path,
            source: self.source,
            static_imports: Arc::new(self.static_imports),
            dynamic_imports: Arc::new(self.dynamic_imports),
            exports: Arc::new(self.exports),
            has_star_export: self.has_star_export,
            is_entry: self.is_entry,
            entry_name: self.entry_name,
            is_external: self.is_external,
        }
    }
}
