//! Source extraction.
//!
//! The parser is treated as an out-of-scope collaborator from the
//! orchestrator's point of view - this module gives it a real, working
//! implementation rather than a deep one. Import/export/dynamic-import
//! discovery is done with targeted regular expressions over the
//! already-decoded source text rather than a full AST walk; a full
//! `oxc_ast` traversal is reserved for a real module graph walker, not for
//! the orchestrator this crate exercises. `oxc_parser` is still used for
//! what it is good at: a cheap, authoritative "does this even parse" gate
//! before we trust the regex extraction at all.
use std::sync::OnceLock;

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use regex::Regex;

use crate::error::{GraphError, Result};
use crate::import_export::{DynamicImport, ExportBinding, ImportBinding, StaticImport};

fn static_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^\s*import\s+(?:(?P<clause>[^;'"]+?)\s+from\s+)?['"](?P<spec>[^'"]+)['"]\s*;?"#,
        )
        .expect("static import regex is valid")
    })
}

fn dynamic_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"import\s*\(\s*['"](?P<spec>[^'"]+)['"]\s*\)"#).expect("dynamic import regex is valid")
    })
}

fn export_named_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*export\s+\{(?P<list>[^}]*)\}\s*;?").expect("export-named regex is valid")
    })
}

fn export_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?m)^\s*export\s+(?:default\s+)?(?:const|let|var|function\*?|class)\s+(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)",
        )
        .expect("export-decl regex is valid")
    })
}

fn export_default_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*export\s+default\b").expect("export-default regex is valid"))
}

fn export_star_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^\s*export\s+\*\s+from\s+['"]"#).expect("export-star regex is valid"))
}

/// Runs `oxc_parser` over `source` purely to reject inputs that are not
/// syntactically valid JavaScript/TypeScript-flavored ESM/CJS; discards the
/// produced AST.
pub fn check_parses(source: &str, source_type: SourceType) -> Result<()> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "parser panicked".to_string());
        return Err(GraphError::ParseFailure {
            path: Default::default(),
            message,
        });
    }
    Ok(())
}

pub struct Extracted {
    pub static_imports: Vec<StaticImport>,
    pub dynamic_imports: Vec<DynamicImport>,
    pub exports: Vec<ExportBinding>,
    pub has_star_export: bool,
}

/// Extracts static imports, dynamic `import()` targets and export bindings
/// from already-valid module source via regex scanning.
pub fn extract(source: &str) -> Extracted {
    let mut static_imports = Vec::new();
    for caps in static_import_re().captures_iter(source) {
        let spec = caps["spec"].to_string();
        let bindings = caps
            .name("clause")
            .map(|m| parse_import_clause(m.as_str()))
            .unwrap_or_default();
        static_imports.push(StaticImport { specifier: spec, bindings });
    }

    let mut dynamic_imports = Vec::new();
    for caps in dynamic_import_re().captures_iter(source) {
        dynamic_imports.push(DynamicImport { specifier: caps["spec"].to_string() });
    }

    let mut exports = Vec::new();
    for caps in export_named_re().captures_iter(source) {
        for item in caps["list"].split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            if let Some((local, exported)) = item.split_once(" as ") {
                exports.push(ExportBinding {
                    exported_name: exported.trim().to_string(),
                    local_name: local.trim().to_string(),
                });
            } else {
                exports.push(ExportBinding {
                    exported_name: item.to_string(),
                    local_name: item.to_string(),
                });
            }
        }
    }
    for caps in export_decl_re().captures_iter(source) {
        let name = caps["name"].to_string();
        exports.push(ExportBinding { exported_name: name.clone(), local_name: name });
    }
    if export_default_re().is_match(source) && !exports.iter().any(|e| e.exported_name == "default") {
        exports.push(ExportBinding {
            exported_name: "default".to_string(),
            local_name: "default".to_string(),
        });
    }

    let has_star_export = export_star_re().is_match(source);

    Extracted { static_imports, dynamic_imports, exports, has_star_export }
}

fn parse_import_clause(clause: &str) -> Vec<ImportBinding> {
    let mut bindings = Vec::new();
    let clause = clause.trim();

    let (default_part, rest) = match clause.split_once(',') {
        Some((d, r)) => (Some(d.trim()), Some(r.trim())),
        None => (Some(clause), None),
    };

    let mut named_part = rest;
    if let Some(default_ident) = default_part {
        if default_ident.starts_with('{') {
            named_part = Some(default_ident);
        } else if default_ident.starts_with("* as ") {
            let local = default_ident.trim_start_matches("* as ").trim().to_string();
            bindings.push(ImportBinding::Namespace { local });
        } else if !default_ident.is_empty() {
            bindings.push(ImportBinding::Default { local: default_ident.to_string() });
        }
    }

    if let Some(named) = named_part {
        let named = named.trim();
        if let Some(inner) = named.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            for item in inner.split(',') {
                let item = item.trim();
                if item.is_empty() {
                    continue;
                }
                if let Some((imported, local)) = item.split_once(" as ") {
                    bindings.push(ImportBinding::Named {
                        imported: imported.trim().to_string(),
                        local: local.trim().to_string(),
                    });
                } else {
                    bindings.push(ImportBinding::Named {
                        imported: item.to_string(),
                        local: item.to_string(),
                    });
                }
            }
        } else if let Some(local) = named.strip_prefix("* as ") {
            bindings.push(ImportBinding::Namespace { local: local.trim().to_string() });
        }
    }

    bindings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_named_default_and_namespace_imports() {
        let src = "import def, { a, b as c } from 'x';\nimport * as ns from 'y';\n";
        let extracted = extract(src);
        assert_eq!(extracted.static_imports.len(), 2);
        assert_eq!(extracted.static_imports[0].specifier, "x");
        assert!(extracted.static_imports[0]
            .bindings
            .contains(&ImportBinding::Default { local: "def".to_string() }));
        assert!(extracted.static_imports[0]
            .bindings
            .contains(&ImportBinding::Named { imported: "a".to_string(), local: "a".to_string() }));
        assert!(extracted.static_imports[0].bindings.contains(&ImportBinding::Named {
            imported: "b".to_string(),
            local: "c".to_string()
        }));
        assert_eq!(extracted.static_imports[1].specifier, "y");
    }

    #[test]
    fn extracts_dynamic_imports() {
        let src = "export default function () { return import('dyndep'); }";
        let extracted = extract(src);
        assert_eq!(extracted.dynamic_imports.len(), 1);
        assert_eq!(extracted.dynamic_imports[0].specifier, "dyndep");
    }

    #[test]
    fn extracts_named_export_declaration() {
        let src = "export const x = function () {};\n";
        let extracted = extract(src);
        assert_eq!(extracted.exports.len(), 1);
        assert_eq!(extracted.exports[0].exported_name, "x");
    }

    #[test]
    fn rejects_unparseable_source() {
        let result = check_parses("function ( {", SourceType::mjs());
        assert!(result.is_err());
    }

    #[test]
    fn accepts_valid_source() {
        let result = check_parses("console.log(42);\n", SourceType::mjs());
        assert!(result.is_ok());
    }
}
