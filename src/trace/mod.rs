//! Encoder trace tables
//!
//! Reading leaf CU rows, expanding them into ancestor records and writing the
//! deduplicated result.

pub mod dedup;
pub mod reader;
pub mod record;
pub mod writer;

pub use dedup::AncestorSet;
pub use reader::{read_ancestor_records_from, read_leaf_records, read_leaf_records_from, TraceRow};
pub use record::{AncestorRecord, LeafRecord};
pub use writer::{write_ancestors, write_ancestors_to_path};
