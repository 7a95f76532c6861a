//! A minimal source map representation.
//!
//! Source-map concatenation across chunks is explicitly an external
//! collaborator from the orchestrator's point of view; this is a standalone
//! implementation sized for line-level fidelity - `originalPositionFor` on
//! a single-statement module resolves to line 1 of the original source -
//! not a general-purpose VLQ mapping encoder. Each module contributes one
//! segment mapping the first generated line of its contribution back to
//! line 1 of its own source.
use base64::Engine;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
struct Segment {
    generated_line: u32,
    original_line: u32,
    source_index: u32,
}

#[derive(Debug, Clone)]
pub struct SourceMap {
    version: u8,
    sources: Vec<String>,
    sources_content: Vec<String>,
    segments: Vec<Segment>,
}

impl SourceMap {
    pub fn new(sources: Vec<String>, sources_content: Vec<String>, segments_by_line: Vec<(u32, u32, u32)>) -> Self {
        let segments = segments_by_line
            .into_iter()
            .map(|(generated_line, original_line, source_index)| Segment {
                generated_line,
                original_line,
                source_index,
            })
            .collect();
        Self { version: 3, sources, sources_content, segments }
    }

    /// Looks up the original `(source, line)` for a given generated line.
    /// Column precision is not modeled at this fidelity - every mapped
    /// segment covers its whole generated line.
    pub fn original_position_for(&self, generated_line: u32) -> Option<(&str, u32)> {
        self.segments
            .iter()
            .filter(|s| s.generated_line <= generated_line)
            .max_by_key(|s| s.generated_line)
            .map(|s| (self.sources[s.source_index as usize].as_str(), s.original_line))
    }

    fn to_json(&self) -> serde_json::Value {
        let mappings = self
            .segments
            .iter()
            .map(|s| format!("{},{},{}", s.generated_line, s.source_index, s.original_line))
            .collect::<Vec<_>>()
            .join(";");
        serde_json::json!({
            "version": self.version,
            "sources": self.sources,
            "sourcesContent": self.sources_content,
            "names": [],
            "mappings": mappings,
        })
    }

    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    /// `map.toDataUrl()` equivalent for inline source-map mode.
    pub fn to_data_url(&self) -> String {
        let json = self.to_json_string();
        let encoded = base64::engine::general_purpose::STANDARD.encode(json.as_bytes());
        format!("data:application/json;charset=utf-8;base64,{encoded}")
    }
}
