//! Per-chunk code text production.
//!
//! Like `parse`, this is a deliberately modest stand-in for the per-chunk
//! renderer the orchestrator treats as an external collaborator: it
//! produces syntactically plausible, dialect-tagged code from already
//! regex-extracted import/export metadata, but it does not re-indent,
//! re-print, or otherwise normalize the original source text the way a real
//! `oxc_codegen`-backed renderer would. Byte-for-byte parity with a
//! production bundler's pretty-printer is out of scope; structural
//! correctness (one statement per exported module, a trailing export
//! manifest matching the dialect) is what the orchestrator actually reads.
use crate::dialect::Dialect;
use crate::module::Module;

fn strip_static_import_lines(source: &str) -> String {
    source
        .lines()
        .filter(|line| !line.trim_start().starts_with("import "))
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_leading_export_keyword(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for line in source.lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix("export default ") {
            out.push_str(rest);
        } else if let Some(rest) = trimmed.strip_prefix("export ") {
            out.push_str(rest);
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Concatenates a chunk's modules into one body, in the order the Graph
/// placed them, stripping statements this stand-in treats as pure wiring
/// (static imports, the `export` keyword itself - names are re-surfaced in
/// the trailing manifest instead).
pub fn render_body(modules: &[&Module]) -> String {
    let mut body = String::new();
    for module in modules {
        let without_imports = strip_static_import_lines(&module.source);
        let without_export_kw = strip_leading_export_keyword(&without_imports);
        body.push_str(without_export_kw.trim_end());
        body.push('\n');
    }
    body
}

/// Appends the dialect-appropriate export manifest for a chunk's resolved
/// export names. An empty `names` list produces no manifest.
pub fn render_export_manifest(dialect: Dialect, names: &[String]) -> String {
    if names.is_empty() {
        return String::new();
    }
    match dialect {
        Dialect::Esm => {
            format!("\nexport {{ {} }};\n", names.join(", "))
        }
        Dialect::Cjs => {
            let mut out = String::new();
            for name in names {
                out.push_str(&format!("exports.{name} = {name};\n"));
            }
            out
        }
        Dialect::Amd | Dialect::System => {
            let mut out = String::from("\nreturn {\n");
            for name in names {
                out.push_str(&format!("  {name}: {name},\n"));
            }
            out.push_str("};\n");
            out
        }
        Dialect::Iife | Dialect::Umd => {
            // IIFE/UMD entries are single-chunk and expose their export via
            // the wrapper's return value, built by `render_chunk`.
            String::new()
        }
    }
}

/// Wraps a chunk body for dialects that require a module wrapper function.
pub fn wrap_for_dialect(dialect: Dialect, name: Option<&str>, globals: &[(String, String)], body: String) -> String {
    match dialect {
        Dialect::Esm | Dialect::Cjs => body,
        Dialect::Amd => {
            let deps = globals.iter().map(|(specifier, _)| format!("'{specifier}'")).collect::<Vec<_>>().join(", ");
            let params = globals.iter().map(|(_, ident)| ident.clone()).collect::<Vec<_>>().join(", ");
            format!("define([{deps}], function ({params}) {{\n{body}}});\n")
        }
        Dialect::System => {
            format!("System.register([], function (exports) {{\n  return {{\n    execute: function () {{\n{body}    }}\n  }};\n}});\n")
        }
        Dialect::Iife => {
            let bundle_name = name.unwrap_or("bundle");
            let params = globals.iter().map(|(_, ident)| ident.clone()).collect::<Vec<_>>().join(", ");
            let args = globals.iter().map(|(specifier, _)| format!("global.{specifier}")).collect::<Vec<_>>().join(", ");
            format!(
                "var {bundle_name} = (function ({params}) {{\n{body}}})({args});\n"
            )
        }
        Dialect::Umd => {
            let bundle_name = name.unwrap_or("bundle");
            format!(
                "(function (global, factory) {{\n  typeof exports === 'object' && typeof module !== 'undefined' ? factory(exports) :\n  typeof define === 'function' && define.amd ? define(['exports'], factory) :\n  (global = typeof globalThis !== 'undefined' ? globalThis : global || self, factory(global.{bundle_name} = {{}}));\n}})(this, (function (exports) {{\n{body}}}));\n"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Module;
    use crate::module_id::ModuleId;

    #[test]
    fn render_body_strips_imports_and_export_keyword() {
        let m = Module::builder(ModuleId(0), "x.js", "import { a } from 'a';\nexport const x = function () {};\n")
            .build();
        let body = render_body(&[&m]);
        assert_eq!(body, "const x = function () {};\n");
    }

    #[test]
    fn esm_manifest_matches_named_export_shape() {
        let manifest = render_export_manifest(Dialect::Esm, &["x".to_string()]);
        assert_eq!(manifest, "\nexport { x };\n");
    }

    #[test]
    fn cjs_manifest_assigns_exports_object() {
        let manifest = render_export_manifest(Dialect::Cjs, &["x".to_string(), "y".to_string()]);
        assert_eq!(manifest, "exports.x = x;\nexports.y = y;\n");
    }
}
