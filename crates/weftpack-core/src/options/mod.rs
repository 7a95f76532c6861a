//! The option normalizer: InputConfig/OutputConfig data model and the two
//! normalization operations.

mod input;
mod output;

pub use input::{normalize_input, EntrySpec, InputOptions};
pub use output::{normalize_output, OutputOptions, SourcemapMode};
