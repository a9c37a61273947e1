//! Core record types shared across the crate.

use geo::Point;

/// Unique, stable identifier of a place record.
pub type RecordId = u64;

/// A single place entity: identifier, names, coordinate, and pass-through
/// attributes.
///
/// The engine only interprets the identifier, the name fields, and the
/// coordinate. Everything else (country code, administrative codes,
/// population, timezone) is carried opaquely so callers get full records
/// back from queries.
///
/// The coordinate follows the `geo` convention: x is longitude, y is
/// latitude, both in degrees.
///
/// # Examples
///
/// ```rust
/// use gazetteer::Record;
///
/// let paris = Record::new(2988507, "Paris", 2.3522, 48.8566)
///     .with_ascii_name("Paris")
///     .with_alternate_names(["Lutetia", "Ville Lumière"])
///     .with_country_code("FR")
///     .with_population(2_138_551);
///
/// assert_eq!(paris.latitude(), 48.8566);
/// assert_eq!(paris.longitude(), 2.3522);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Unique identifier, stable for the lifetime of the dataset.
    pub id: RecordId,
    /// Primary name.
    pub name: String,
    /// ASCII-normalized variant of the primary name, if available.
    pub ascii_name: Option<String>,
    /// Free-form alternate names (already split from the source's
    /// comma-separated field).
    pub alternate_names: Vec<String>,
    /// Position in degrees: x = longitude [-180, 180], y = latitude [-90, 90].
    pub coordinate: Point,
    /// ISO country code.
    pub country_code: Option<String>,
    /// First-level administrative code.
    pub admin1_code: Option<String>,
    /// Second-level administrative code.
    pub admin2_code: Option<String>,
    /// Population count.
    pub population: Option<i64>,
    /// IANA timezone name.
    pub timezone: Option<String>,
}

impl Record {
    /// Create a record with the mandatory fields; everything else defaults
    /// to empty and can be filled in with the `with_*` methods.
    pub fn new(id: RecordId, name: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            ascii_name: None,
            alternate_names: Vec::new(),
            coordinate: Point::new(longitude, latitude),
            country_code: None,
            admin1_code: None,
            admin2_code: None,
            population: None,
            timezone: None,
        }
    }

    /// Set the ASCII-normalized name.
    pub fn with_ascii_name(mut self, ascii_name: impl Into<String>) -> Self {
        self.ascii_name = Some(ascii_name.into());
        self
    }

    /// Set the alternate names.
    pub fn with_alternate_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternate_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the ISO country code.
    pub fn with_country_code(mut self, code: impl Into<String>) -> Self {
        self.country_code = Some(code.into());
        self
    }

    /// Set the administrative codes.
    pub fn with_admin_codes(
        mut self,
        admin1: impl Into<String>,
        admin2: impl Into<String>,
    ) -> Self {
        self.admin1_code = Some(admin1.into());
        self.admin2_code = Some(admin2.into());
        self
    }

    /// Set the population count.
    pub fn with_population(mut self, population: i64) -> Self {
        self.population = Some(population);
        self
    }

    /// Set the IANA timezone name.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.coordinate.y()
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.coordinate.x()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder_chain() {
        let record = Record::new(42, "Springfield", -89.6437, 39.8017)
            .with_ascii_name("Springfield")
            .with_alternate_names(["Flower City"])
            .with_country_code("US")
            .with_admin_codes("IL", "167")
            .with_population(114_394)
            .with_timezone("America/Chicago");

        assert_eq!(record.id, 42);
        assert_eq!(record.name, "Springfield");
        assert_eq!(record.alternate_names, vec!["Flower City"]);
        assert_eq!(record.country_code.as_deref(), Some("US"));
        assert_eq!(record.admin1_code.as_deref(), Some("IL"));
        assert_eq!(record.population, Some(114_394));
    }

    #[test]
    fn test_coordinate_accessors() {
        let record = Record::new(1, "Null Island", 0.0, 0.0);
        assert_eq!(record.longitude(), 0.0);
        assert_eq!(record.latitude(), 0.0);

        let record = Record::new(2, "Sydney", 151.2093, -33.8688);
        assert_eq!(record.longitude(), 151.2093);
        assert_eq!(record.latitude(), -33.8688);
    }
}
