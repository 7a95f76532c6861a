use std::fmt;

/// Arena index into `ModuleGraph`'s module table. Modules never move once
/// inserted, so a bare index is stable for the life of one build - arena +
/// index ownership sidesteps cyclic-reference bookkeeping for import
/// cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct ModuleId(pub(crate) u32);

impl ModuleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
