use std::fmt;

/// Output dialect tag, drawn from the fixed closed set the core validates
/// against in `OutputOptions` normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Amd,
    Cjs,
    System,
    Esm,
    Iife,
    Umd,
}

impl Dialect {
    /// Parses the caller-facing `format` string, including the rejected
    /// legacy alias. Returns `None` for anything unrecognized; callers
    /// distinguish the `es6` case to produce the deprecation diagnostic
    /// rather than `InvalidOption`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "amd" => Some(Self::Amd),
            "cjs" | "commonjs" => Some(Self::Cjs),
            "system" | "systemjs" => Some(Self::System),
            "esm" | "es" | "module" => Some(Self::Esm),
            "iife" => Some(Self::Iife),
            "umd" => Some(Self::Umd),
            _ => None,
        }
    }

    pub fn is_single_chunk_only(self) -> bool {
        matches!(self, Self::Iife | Self::Umd)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Amd => "amd",
            Self::Cjs => "cjs",
            Self::System => "system",
            Self::Esm => "esm",
            Self::Iife => "iife",
            Self::Umd => "umd",
        };
        f.write_str(s)
    }
}
