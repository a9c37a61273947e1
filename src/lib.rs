//! Embedded lexical and nearest-neighbor query engine for geographic place
//! records.
//!
//! Two query types over a static dataset: find records whose names contain
//! every token of a query string, and find the k geographically closest
//! records to a given record by chord distance on a spherical Earth.
//!
//! ```rust
//! use gazetteer::{MemoryRecordStore, QueryEngine, Record};
//!
//! let store = MemoryRecordStore::from_records([
//!     Record::new(1, "Paris", 2.3522, 48.8566),
//!     Record::new(2, "London", -0.1278, 51.5074),
//!     Record::new(3, "Berlin", 13.4050, 52.5200),
//! ])?;
//!
//! let engine = QueryEngine::build(store)?;
//!
//! let matches = engine.lexical_search("paris")?;
//! assert_eq!(matches[0].id, 1);
//!
//! let nearest = engine.nearest_neighbors(1, 2)?;
//! assert_eq!(nearest[0].id, 2); // London first, Berlin second
//! # Ok::<(), gazetteer::GazetteerError>(())
//! ```
//!
//! Indices are built once from a full snapshot and immutable thereafter;
//! rebuild means discarding and reconstructing from the record store.

pub mod engine;
pub mod error;
pub mod index;
pub mod projection;
pub mod spatial_index;
pub mod storage;
pub mod tokenizer;
pub mod types;
pub mod validation;

pub use engine::QueryEngine;
pub use error::{GazetteerError, Result};

pub use index::InvertedIndex;
pub use projection::{EARTH_RADIUS_KM, ProjectedPoint, project};
pub use spatial_index::{Neighbor, SpatialEntry, SpatialIndex};
pub use storage::{MemoryRecordStore, RecordStore};
pub use tokenizer::{tokenize, tokenize_record};
pub use types::{Record, RecordId};

pub use geo::Point;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GazetteerError, QueryEngine, Result};

    pub use crate::{MemoryRecordStore, RecordStore};

    pub use crate::{Record, RecordId};

    pub use crate::{InvertedIndex, SpatialIndex};

    pub use geo::Point;
}
