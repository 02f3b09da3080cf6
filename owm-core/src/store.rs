use crate::model::NormalizedRecord;

/// Ordered, append-only collection of normalized records, reset by `clear`.
///
/// Not synchronized. Callers sharing a store across threads wrap the whole
/// store in their own lock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    records: Vec<NormalizedRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: NormalizedRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = NormalizedRecord>) {
        self.records.extend(records);
    }

    /// All records since the last clear, oldest first.
    pub fn all(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn to_vec(&self) -> Vec<NormalizedRecord> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records = Vec::new();
    }
}
