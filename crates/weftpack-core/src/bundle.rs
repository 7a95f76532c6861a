//! OutputBundle: a mapping from final file name to a rendered-chunk or
//! asset entry, constructed fresh per generate call.

use indexmap::IndexMap;
use weftpack_graph::SourceMap;

#[derive(Debug, Clone)]
pub struct ChunkEntry {
    pub file_name: String,
    pub is_entry: bool,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub modules: Vec<String>,
    pub code: Option<String>,
    pub map: Option<SourceMap>,
}

#[derive(Debug, Clone)]
pub struct AssetEntry {
    pub file_name: String,
    pub source: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum BundleEntry {
    Chunk(ChunkEntry),
    Asset(AssetEntry),
}

impl BundleEntry {
    pub fn file_name(&self) -> &str {
        match self {
            Self::Chunk(c) => &c.file_name,
            Self::Asset(a) => &a.file_name,
        }
    }

    fn sort_rank(&self) -> u8 {
        match self {
            Self::Chunk(c) if c.is_entry => 0,
            Self::Chunk(_) => 1,
            Self::Asset(_) => 2,
        }
    }
}

/// Fresh per generate call; insertion order is preserved by [`IndexMap`] so
/// the final sort (entries, then secondaries, then assets; stable within
/// each class) only has to reorder across classes.
#[derive(Debug, Clone, Default)]
pub struct OutputBundle {
    entries: IndexMap<String, BundleEntry>,
}

impl OutputBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: BundleEntry) {
        self.entries.insert(entry.file_name().to_string(), entry);
    }

    pub fn get(&self, file_name: &str) -> Option<&BundleEntry> {
        self.entries.get(file_name)
    }

    pub fn get_mut(&mut self, file_name: &str) -> Option<&mut BundleEntry> {
        self.entries.get_mut(file_name)
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.entries.contains_key(file_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BundleEntry> {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BundleEntry> {
        self.entries.values_mut()
    }

    /// The deterministic output ordering: entry chunks first, secondary
    /// chunks next, assets last; a stable sort preserves insertion order
    /// within each class.
    pub fn sorted(&self) -> Vec<&BundleEntry> {
        let mut all: Vec<&BundleEntry> = self.entries.values().collect();
        all.sort_by_key(|entry| entry.sort_rank());
        all
    }

    pub fn file_names_sorted(&self) -> Vec<String> {
        self.sorted().into_iter().map(|e| e.file_name().to_string()).collect()
    }
}
