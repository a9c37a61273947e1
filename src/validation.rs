//! Coordinate checks run on every record before it enters the indices.
//!
//! A broken coordinate has to be caught before projection: once a NaN or an
//! out-of-range degree value reaches the spatial index it would skew
//! nearest-neighbor results silently instead of failing the build.

use crate::error::{GazetteerError, Result};
use crate::types::Record;

/// Checks that a record carries a usable geodetic position.
///
/// Both components must be finite degrees, longitude within ±180 and
/// latitude within ±90. The failing record's id is part of the error so a
/// bad row can be traced through a large dataset.
///
/// # Examples
///
/// ```
/// use gazetteer::Record;
/// use gazetteer::validation::validate_record;
///
/// assert!(validate_record(&Record::new(1, "Quito", -78.4678, -0.1807)).is_ok());
///
/// // Latitude beyond the pole.
/// assert!(validate_record(&Record::new(2, "Nowhere", 10.0, 95.0)).is_err());
/// ```
pub fn validate_record(record: &Record) -> Result<()> {
    check_degrees("longitude", record.longitude(), 180.0)
        .and_then(|()| check_degrees("latitude", record.latitude(), 90.0))
        .map_err(|detail| GazetteerError::InvalidInput(format!("record {}: {detail}", record.id)))
}

/// One geodetic component: finite and within `±limit` degrees.
fn check_degrees(component: &str, value: f64, limit: f64) -> std::result::Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{component} is not a finite number: {value}"));
    }
    if value.abs() > limit {
        return Err(format!(
            "{component} {value} is outside [-{limit}, {limit}] degrees"
        ));
    }
    Ok(())
}
