//! Error types for the gazetteer crate.

use crate::types::RecordId;
use thiserror::Error;

/// Convenience alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, GazetteerError>;

/// Errors produced while building indices or answering queries.
#[derive(Debug, Error)]
pub enum GazetteerError {
    /// The requested record id is not known to the record store.
    ///
    /// This is a normal, recoverable outcome for queries against ids the
    /// caller obtained elsewhere; it is not a sign of engine corruption.
    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// A caller- or data-supplied value was rejected (k == 0, coordinates
    /// outside valid latitude/longitude ranges, non-finite coordinates).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Two records with the same identifier were encountered during a build
    /// pass. Identifiers must be unique for the lifetime of the dataset.
    #[error("duplicate record id: {0}")]
    DuplicateId(RecordId),

    /// The indices disagree with the record store: an indexed id has no
    /// backing record, or a record is missing from its own neighborhood.
    /// Signals corrupted or out-of-sync indices, never a normal runtime
    /// condition.
    #[error("index inconsistency: {0}")]
    IndexInconsistency(String),
}
