//! Record store abstraction.
//!
//! The engine never owns the full place attributes; it resolves matched
//! identifiers through this trait. Any keyed storage technology can back it
//! as long as point lookups and a full-snapshot scan hold their semantics.
//! The scan is consumed exactly once, at index-build time.

use crate::error::{GazetteerError, Result};
use crate::types::{Record, RecordId};
use rustc_hash::FxHashMap;

/// Trait for record store implementations.
///
/// Implementations must be `Send + Sync`; the engine issues concurrent
/// read-only lookups after build. How a handle achieves that (internal
/// locking, one handle per worker) is the implementation's concern.
pub trait RecordStore: Send + Sync {
    /// Look up a record by id. `Ok(None)` means the id is unknown.
    fn get(&self, id: RecordId) -> Result<Option<Record>>;

    /// Iterate over a full snapshot of records, stable for the duration of
    /// one build pass.
    fn iter(&self) -> Result<Box<dyn Iterator<Item = Record> + '_>>;

    /// Total number of records.
    fn len(&self) -> Result<usize>;

    /// Whether the store holds no records.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// In-memory record store backed by a hash map.
///
/// Read-only after construction, so it is trivially safe to share across
/// query threads.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: FxHashMap<RecordId, Record>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: FxHashMap::default(),
        }
    }

    /// Build a store from a collection of records, rejecting duplicate ids.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Result<Self> {
        let mut store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Insert a record, rejecting a duplicate id.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        let id = record.id;
        if self.records.insert(id, record).is_some() {
            return Err(GazetteerError::DuplicateId(id));
        }
        Ok(())
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, id: RecordId) -> Result<Option<Record>> {
        Ok(self.records.get(&id).cloned())
    }

    fn iter(&self) -> Result<Box<dyn Iterator<Item = Record> + '_>> {
        Ok(Box::new(self.records.values().cloned()))
    }

    fn len(&self) -> Result<usize> {
        Ok(self.records.len())
    }
}
