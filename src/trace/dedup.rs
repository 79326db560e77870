//! Insertion-ordered deduplication of ancestor records
//!
//! Sibling leaves share most of their ancestors, so a trace expands into many
//! repeated records. Only the first occurrence of each record is kept.

use super::record::AncestorRecord;
use indexmap::IndexSet;

/// Ordered set of ancestor records for one trace file
#[derive(Debug, Clone, Default)]
pub struct AncestorSet {
    records: IndexSet<AncestorRecord>,
}

impl AncestorSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning `false` if it was already present
    pub fn insert(&mut self, record: AncestorRecord) -> bool {
        self.records.insert(record)
    }

    /// Number of distinct records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether `record` has been seen
    pub fn contains(&self, record: &AncestorRecord) -> bool {
        self.records.contains(record)
    }

    /// Records in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &AncestorRecord> {
        self.records.iter()
    }

    /// Consume the set, keeping first-seen order
    pub fn into_vec(self) -> Vec<AncestorRecord> {
        self.records.into_iter().collect()
    }
}

impl Extend<AncestorRecord> for AncestorSet {
    fn extend<I: IntoIterator<Item = AncestorRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl FromIterator<AncestorRecord> for AncestorSet {
    fn from_iter<I: IntoIterator<Item = AncestorRecord>>(iter: I) -> Self {
        AncestorSet {
            records: iter.into_iter().collect(),
        }
    }
}
