/// {logical name, optional source bytes, optional finalized file name}.
#[derive(Debug, Clone)]
pub struct Asset {
    pub name: String,
    pub source: Option<Vec<u8>>,
    pub file_name: Option<String>,
}

impl Asset {
    pub fn new(name: impl Into<String>, source: Option<Vec<u8>>) -> Self {
        Self { name: name.into(), source, file_name: None }
    }

    pub fn is_finalized(&self) -> bool {
        self.file_name.is_some()
    }

    /// Finalizes this asset's file name against an asset-file-name pattern,
    /// hashing its source bytes for the `[hash]` placeholder. Fails if
    /// there is no source to hash.
    pub fn finalize(&mut self, pattern: &str) -> crate::error::Result<()> {
        let Some(source) = self.source.as_ref() else {
            return Err(crate::error::GraphError::UnfinalizedAsset { name: self.name.clone() });
        };
        let extname = std::path::Path::new(&self.name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        self.file_name = Some(crate::naming::content_hash_name(pattern, &self.name, source, &extname));
        Ok(())
    }
}
