//! Bulk-loaded 3-D k-d tree over projected record positions.
//!
//! The tree is built once from a full snapshot and never mutated: each
//! subslice of the node array stores its median element (by the split axis,
//! cycling x/y/z with depth) at the midpoint, with the left and right
//! subtrees laid out implicitly around it. Median splits keep the tree
//! balanced, so k-nearest-neighbor queries descend in O(log n) expected
//! time instead of scanning every entry.
//!
//! Tie handling is deterministic end to end: construction orders equal
//! coordinates by id, and queries rank candidates by (distance, id), so a
//! repeated query returns bit-identical results regardless of traversal
//! order.

use crate::projection::{ProjectedPoint, project};
use crate::types::{Record, RecordId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One indexed entry: a record identifier positioned at its projected point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialEntry {
    pub id: RecordId,
    pub point: ProjectedPoint,
}

/// A k-nearest-neighbor result: the entry's id and its Euclidean chord
/// distance from the query point, in kilometers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: RecordId,
    pub distance: f64,
}

/// Immutable spatial index supporting k-nearest-neighbor queries in the
/// projected 3-D space.
///
/// The serde form is the flat entry list (id plus three floats), enough to
/// rebuild the structure without re-reading source records; deserialization
/// re-runs [`SpatialIndex::bulk_load`], so entries in any order reconstruct
/// a valid tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SpatialEntry>", into = "Vec<SpatialEntry>")]
pub struct SpatialIndex {
    // Implicit k-d tree: the node of any subslice is its median element,
    // and the split axis is depth % 3.
    nodes: Vec<SpatialEntry>,
}

impl SpatialIndex {
    /// Project every record and bulk-load the tree.
    pub fn build(records: &[Record]) -> Self {
        let entries = records
            .iter()
            .map(|record| SpatialEntry {
                id: record.id,
                point: project(&record.coordinate),
            })
            .collect();

        Self::bulk_load(entries)
    }

    /// Build a balanced tree from pre-projected entries by recursive median
    /// partition.
    ///
    /// Equal coordinates are ordered by id, so construction is deterministic
    /// for a fixed entry set regardless of input order.
    pub fn bulk_load(mut entries: Vec<SpatialEntry>) -> Self {
        build_subtree(&mut entries, 0);
        log::debug!("bulk-loaded spatial index with {} entries", entries.len());
        Self { nodes: entries }
    }

    /// The k entries nearest to `point`, ascending by (distance, id).
    ///
    /// Returns fewer than k neighbors only when the index holds fewer than k
    /// entries. Equal distances break ties by ascending record identifier.
    pub fn nearest(&self, point: &ProjectedPoint, k: usize) -> Vec<Neighbor> {
        if k == 0 || self.nodes.is_empty() {
            return Vec::new();
        }

        // The heap never holds more than min(k, n) candidates, so a huge k
        // must not drive the allocation.
        let mut heap: BinaryHeap<Candidate> =
            BinaryHeap::with_capacity(k.min(self.nodes.len()) + 1);
        knn_search(&self.nodes, 0, point, k, &mut heap);

        heap.into_sorted_vec()
            .into_iter()
            .map(|candidate| Neighbor {
                id: candidate.id,
                distance: candidate.dist_sq.sqrt(),
            })
            .collect()
    }

    /// Serialize to the JSON interchange form: a flat list of
    /// (id, {x, y, z}) entries.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load from the JSON interchange form, rebuilding the tree.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// All indexed entries, in tree layout order.
    pub fn entries(&self) -> &[SpatialEntry] {
        &self.nodes
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl From<Vec<SpatialEntry>> for SpatialIndex {
    fn from(entries: Vec<SpatialEntry>) -> Self {
        Self::bulk_load(entries)
    }
}

impl From<SpatialIndex> for Vec<SpatialEntry> {
    fn from(index: SpatialIndex) -> Self {
        index.nodes
    }
}

/// Candidate during search, ranked worst-first in the bounded max-heap.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    dist_sq: f64,
    id: RecordId,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Distances are squares of finite coordinates, so total_cmp agrees
        // with the numeric order; id breaks ties.
        self.dist_sq
            .total_cmp(&other.dist_sq)
            .then_with(|| self.id.cmp(&other.id))
    }
}

fn build_subtree(entries: &mut [SpatialEntry], depth: usize) {
    if entries.len() <= 1 {
        return;
    }

    let axis = depth % 3;
    let mid = entries.len() / 2;
    entries.select_nth_unstable_by(mid, |a, b| {
        a.point
            .axis(axis)
            .total_cmp(&b.point.axis(axis))
            .then_with(|| a.id.cmp(&b.id))
    });

    let (left, rest) = entries.split_at_mut(mid);
    build_subtree(left, depth + 1);
    build_subtree(&mut rest[1..], depth + 1);
}

fn knn_search(
    nodes: &[SpatialEntry],
    depth: usize,
    query: &ProjectedPoint,
    k: usize,
    heap: &mut BinaryHeap<Candidate>,
) {
    if nodes.is_empty() {
        return;
    }

    let mid = nodes.len() / 2;
    let node = &nodes[mid];
    offer(
        heap,
        k,
        Candidate {
            dist_sq: query.distance_sq(&node.point),
            id: node.id,
        },
    );

    let axis = depth % 3;
    let delta = query.axis(axis) - node.point.axis(axis);
    let (near, far) = if delta < 0.0 {
        (&nodes[..mid], &nodes[mid + 1..])
    } else {
        (&nodes[mid + 1..], &nodes[..mid])
    };

    knn_search(near, depth + 1, query, k, heap);

    // The far side is visited unless the splitting plane alone already beats
    // the current worst candidate. Equality must not prune: a point at
    // exactly the worst distance could still win its tie on id.
    let plane_sq = delta * delta;
    let worst = heap.peek().map_or(f64::INFINITY, |c| c.dist_sq);
    if heap.len() < k || plane_sq <= worst {
        knn_search(far, depth + 1, query, k, heap);
    }
}

fn offer(heap: &mut BinaryHeap<Candidate>, k: usize, candidate: Candidate) {
    if heap.len() < k {
        heap.push(candidate);
        return;
    }

    if heap.peek().is_some_and(|worst| candidate < *worst) {
        heap.pop();
        heap.push(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    fn entry(id: RecordId, lon: f64, lat: f64) -> SpatialEntry {
        SpatialEntry {
            id,
            point: project(&Point::new(lon, lat)),
        }
    }

    /// Reference oracle: full scan ranked by (distance, id).
    fn brute_force(entries: &[SpatialEntry], query: &ProjectedPoint, k: usize) -> Vec<Neighbor> {
        let mut all: Vec<Candidate> = entries
            .iter()
            .map(|e| Candidate {
                dist_sq: query.distance_sq(&e.point),
                id: e.id,
            })
            .collect();
        all.sort();
        all.into_iter()
            .take(k)
            .map(|c| Neighbor {
                id: c.id,
                distance: c.dist_sq.sqrt(),
            })
            .collect()
    }

    fn fixture_entries() -> Vec<SpatialEntry> {
        // A spread of real-world cities plus a couple of co-located points.
        vec![
            entry(1, -74.0060, 40.7128),  // New York
            entry(2, -0.1278, 51.5074),   // London
            entry(3, 2.3522, 48.8566),    // Paris
            entry(4, 13.4050, 52.5200),   // Berlin
            entry(5, 139.6917, 35.6895),  // Tokyo
            entry(6, 151.2093, -33.8688), // Sydney
            entry(7, -43.1729, -22.9068), // Rio de Janeiro
            entry(8, 37.6173, 55.7558),   // Moscow
            entry(9, 2.3522, 48.8566),    // co-located with Paris
            entry(10, 2.3522, 48.8566),   // co-located with Paris
        ]
    }

    #[test]
    fn test_nearest_matches_brute_force_oracle() {
        let entries = fixture_entries();
        let index = SpatialIndex::bulk_load(entries.clone());

        for query_entry in &entries {
            for k in 1..=entries.len() + 2 {
                let fast = index.nearest(&query_entry.point, k);
                let slow = brute_force(&entries, &query_entry.point, k);
                assert_eq!(fast, slow, "mismatch for query {} k={k}", query_entry.id);
            }
        }
    }

    #[test]
    fn test_nearest_is_ordered_and_bounded() {
        let index = SpatialIndex::bulk_load(fixture_entries());
        let query = project(&Point::new(2.0, 48.0));

        let neighbors = index.nearest(&query, 4);
        assert_eq!(neighbors.len(), 4);
        for pair in neighbors.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_equal_distance_ties_break_by_id() {
        let index = SpatialIndex::bulk_load(fixture_entries());
        let query = project(&Point::new(2.3522, 48.8566));

        // Three entries sit at exactly the query point; ids decide order.
        let neighbors = index.nearest(&query, 3);
        assert_eq!(
            neighbors.iter().map(|n| n.id).collect::<Vec<_>>(),
            vec![3, 9, 10]
        );
        assert!(neighbors.iter().all(|n| n.distance == 0.0));
    }

    #[test]
    fn test_k_larger_than_index_returns_everything() {
        let entries = fixture_entries();
        let index = SpatialIndex::bulk_load(entries.clone());
        let query = project(&Point::new(0.0, 0.0));

        let neighbors = index.nearest(&query, 100);
        assert_eq!(neighbors.len(), entries.len());

        let neighbors = index.nearest(&query, usize::MAX);
        assert_eq!(neighbors.len(), entries.len());
    }

    #[test]
    fn test_k_zero_and_empty_index() {
        let index = SpatialIndex::bulk_load(fixture_entries());
        let query = project(&Point::new(0.0, 0.0));
        assert!(index.nearest(&query, 0).is_empty());

        let empty = SpatialIndex::default();
        assert!(empty.is_empty());
        assert!(empty.nearest(&query, 5).is_empty());
    }

    #[test]
    fn test_bulk_load_is_order_independent() {
        let entries = fixture_entries();
        let mut reversed = entries.clone();
        reversed.reverse();

        let a = SpatialIndex::bulk_load(entries);
        let b = SpatialIndex::bulk_load(reversed);
        assert_eq!(a, b);
    }

    #[test]
    fn test_dense_grid_against_oracle() {
        // A regular grid stresses the splitting planes: many candidates sit
        // at identical axis offsets from the query.
        let mut entries = Vec::new();
        let mut id = 0;
        for i in 0..12 {
            for j in 0..12 {
                id += 1;
                entries.push(entry(id, -5.0 + i as f64, 45.0 + j as f64 * 0.5));
            }
        }

        let index = SpatialIndex::bulk_load(entries.clone());
        let query = project(&Point::new(0.3, 47.7));

        for k in [1, 5, 17, 60, 144] {
            assert_eq!(
                index.nearest(&query, k),
                brute_force(&entries, &query, k),
                "grid mismatch at k={k}"
            );
        }
    }

    #[test]
    fn test_serde_round_trip_preserves_queries() {
        let index = SpatialIndex::bulk_load(fixture_entries());
        let json = serde_json::to_string(&index).unwrap();
        let restored: SpatialIndex = serde_json::from_str(&json).unwrap();

        let query = project(&Point::new(10.0, 50.0));
        assert_eq!(index.nearest(&query, 5), restored.nearest(&query, 5));
    }

    #[test]
    fn test_deserialize_from_arbitrary_entry_order() {
        // Hand-assembled interchange data in no particular order must still
        // become a queryable tree.
        let mut entries = fixture_entries();
        entries.swap(0, 7);
        entries.swap(2, 5);
        let json = serde_json::to_string(&entries).unwrap();

        let index: SpatialIndex = serde_json::from_str(&json).unwrap();
        let query = project(&Point::new(2.3522, 48.8566));
        assert_eq!(index.nearest(&query, 1)[0].id, 3);
    }
}
