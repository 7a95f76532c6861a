/// A single `import { a, b as c } from 'x'` / `import d from 'x'` /
/// `import * as ns from 'x'` statement, as seen by one module.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StaticImport {
    pub specifier: String,
    pub bindings: Vec<ImportBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ImportBinding {
    Named { imported: String, local: String },
    Default { local: String },
    Namespace { local: String },
}

/// A `import('x')` expression found anywhere in the module body. Each
/// distinct specifier becomes a dynamic-import chunk boundary unless
/// `inlineDynamicImports` is set.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DynamicImport {
    pub specifier: String,
}

/// A single named (or default) export declared by a module.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExportBinding {
    pub exported_name: String,
    pub local_name: String,
}
