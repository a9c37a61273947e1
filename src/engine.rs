//! The query engine: immutable indices plus a record store handle.
//!
//! One engine instance serves one loaded dataset. Both indices are built in
//! a single batch pass (or handed in pre-built) and never mutated, so any
//! number of threads may run queries concurrently without synchronization;
//! the store handle is the only shared resource with its own concurrency
//! contract.

use crate::error::{GazetteerError, Result};
use crate::index::InvertedIndex;
use crate::projection::project;
use crate::spatial_index::SpatialIndex;
use crate::storage::RecordStore;
use crate::types::{Record, RecordId};
use crate::validation::validate_record;
use rustc_hash::FxHashSet;

/// Lexical and nearest-neighbor query engine over a static place dataset.
///
/// # Examples
///
/// ```rust
/// use gazetteer::{MemoryRecordStore, QueryEngine, Record};
///
/// let store = MemoryRecordStore::from_records([
///     Record::new(1, "Paris", 2.3522, 48.8566),
///     Record::new(2, "London", -0.1278, 51.5074),
///     Record::new(3, "Berlin", 13.4050, 52.5200),
/// ])?;
///
/// let engine = QueryEngine::build(store)?;
///
/// let matches = engine.lexical_search("paris")?;
/// assert_eq!(matches.len(), 1);
///
/// // London is closer to Paris than Berlin is.
/// let nearest = engine.nearest_neighbors(1, 1)?;
/// assert_eq!(nearest[0].id, 2);
/// # Ok::<(), gazetteer::GazetteerError>(())
/// ```
pub struct QueryEngine<S: RecordStore> {
    inverted: InvertedIndex,
    spatial: SpatialIndex,
    store: S,
}

impl<S: RecordStore> QueryEngine<S> {
    /// Build both indices from a full snapshot of the store's records.
    ///
    /// One batch pass: every coordinate is validated and duplicate
    /// identifiers are rejected before anything is indexed, so a malformed
    /// record aborts the build rather than silently dropping out of the
    /// indices.
    pub fn build(store: S) -> Result<Self> {
        let records: Vec<Record> = store.iter()?.collect();

        let mut seen: FxHashSet<RecordId> = FxHashSet::default();
        for record in &records {
            validate_record(record)?;
            if !seen.insert(record.id) {
                return Err(GazetteerError::DuplicateId(record.id));
            }
        }

        let inverted = InvertedIndex::build(&records);
        let spatial = SpatialIndex::build(&records);
        log::debug!("built query engine over {} records", records.len());

        Ok(Self {
            inverted,
            spatial,
            store,
        })
    }

    /// Assemble an engine from pre-built (typically deserialized) indices.
    ///
    /// The caller is responsible for handing in indices built from the same
    /// dataset the store holds; mismatches surface later as
    /// [`GazetteerError::IndexInconsistency`].
    pub fn from_parts(inverted: InvertedIndex, spatial: SpatialIndex, store: S) -> Self {
        Self {
            inverted,
            spatial,
            store,
        }
    }

    /// Records whose names contain every whitespace-delimited token of
    /// `query`, somewhere across their name fields (not necessarily the
    /// same field).
    ///
    /// Matching is case-insensitive and exact per token; there is no fuzzy
    /// matching or relevance ranking. Results are ascending by id, and an
    /// empty query returns an empty result.
    pub fn lexical_search(&self, query: &str) -> Result<Vec<Record>> {
        let tokens: Vec<String> = query.split_whitespace().map(|w| w.to_lowercase()).collect();
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let token_refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
        let ids = self.inverted.matching_ids(&token_refs);

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            let record = self.store.get(id)?.ok_or_else(|| {
                GazetteerError::IndexInconsistency(format!(
                    "lexical match {id} has no record in the store"
                ))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// The k records geographically closest to the record with the given
    /// id, by chord distance on the projection sphere, ascending. The query
    /// record itself is never part of the result.
    ///
    /// # Errors
    ///
    /// [`GazetteerError::InvalidInput`] when k is 0,
    /// [`GazetteerError::NotFound`] when the id is unknown, and
    /// [`GazetteerError::IndexInconsistency`] when the indices and the
    /// store disagree.
    pub fn nearest_neighbors(&self, id: RecordId, k: usize) -> Result<Vec<Record>> {
        Ok(self
            .nearest_neighbors_with_distance(id, k)?
            .into_iter()
            .map(|(record, _)| record)
            .collect())
    }

    /// Like [`Self::nearest_neighbors`], with each record's chord distance
    /// from the query record attached, in kilometers.
    pub fn nearest_neighbors_with_distance(
        &self,
        id: RecordId,
        k: usize,
    ) -> Result<Vec<(Record, f64)>> {
        if k == 0 {
            return Err(GazetteerError::InvalidInput(
                "k must be at least 1".to_string(),
            ));
        }

        let record = self.store.get(id)?.ok_or(GazetteerError::NotFound(id))?;
        let origin = project(&record.coordinate);

        // The query record maps to itself at distance 0, so it occupies one
        // of the slots; ask for one extra and drop it.
        let mut neighbors = self.spatial.nearest(&origin, k.saturating_add(1));
        let Some(self_pos) = neighbors.iter().position(|n| n.id == id) else {
            return Err(GazetteerError::IndexInconsistency(format!(
                "record {id} is missing from its own nearest-neighbor set"
            )));
        };
        neighbors.remove(self_pos);
        neighbors.truncate(k);

        let mut results = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            let record = self.store.get(neighbor.id)?.ok_or_else(|| {
                GazetteerError::IndexInconsistency(format!(
                    "spatial entry {} has no record in the store",
                    neighbor.id
                ))
            })?;
            results.push((record, neighbor.distance));
        }
        Ok(results)
    }

    /// The engine's inverted index, e.g. for interchange serialization.
    pub fn inverted_index(&self) -> &InvertedIndex {
        &self.inverted
    }

    /// The engine's spatial index, e.g. for interchange serialization.
    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.spatial
    }

    /// The underlying record store handle.
    pub fn store(&self) -> &S {
        &self.store
    }
}
