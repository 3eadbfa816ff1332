//! Geographic points stored as PostGIS `geography(Point, 4326)`.
//!
//! Points travel to and from the database as (E)WKT text. Coordinates are
//! written with Rust's shortest round-trip float formatting, so a value read
//! back from the store matches what was written up to the store's own
//! resolution.

use std::fmt;

/// WGS 84, the SRID of every stored point.
pub const SRID_WGS84: i32 = 4326;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeoError {
    #[error("malformed point '{0}'")]
    Malformed(String),

    #[error("unsupported SRID {0}; expected {SRID_WGS84}")]
    UnsupportedSrid(i32),
}

/// A WGS 84 coordinate pair. `x` is longitude, `y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    /// Build a point from (longitude, latitude), the axis order of WKT.
    ///
    /// Range checks belong to the DTO validation; this only stores the pair.
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// EWKT for `ST_GeogFromText`, e.g. `SRID=4326;POINT(-99.1 19.4)`.
    pub fn to_ewkt(&self) -> String {
        format!("SRID={SRID_WGS84};{self}")
    }

    /// Parse `POINT(x y)` with an optional `SRID=n;` prefix, as produced by
    /// `ST_AsText` / `ST_AsEWKT`.
    pub fn parse(text: &str) -> Result<Self, GeoError> {
        let malformed = || GeoError::Malformed(text.to_string());
        let trimmed = text.trim();

        let body = match trimmed.split_once(';') {
            Some((srid, rest)) => {
                let srid: i32 = srid
                    .trim()
                    .strip_prefix("SRID=")
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(malformed)?;
                if srid != SRID_WGS84 {
                    return Err(GeoError::UnsupportedSrid(srid));
                }
                rest.trim()
            }
            None => trimmed,
        };

        let upper = body.to_ascii_uppercase();
        let coords = upper
            .strip_prefix("POINT")
            .map(str::trim_start)
            .and_then(|s| s.strip_prefix('('))
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(malformed)?;

        let mut parts = coords.split_whitespace();
        let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        let longitude: f64 = x.parse().map_err(|_| malformed())?;
        let latitude: f64 = y.parse().map_err(|_| malformed())?;
        Ok(Self::new(longitude, latitude))
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POINT({} {})", self.longitude, self.latitude)
    }
}

/// Lets `sqlx` decode a `ST_AsText(...)` column straight into a point.
impl TryFrom<String> for GeoPoint {
    type Error = GeoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn round_trips_through_store_text() {
        let point = GeoPoint::new(-99.1, 19.4);
        let stored = point.to_ewkt();
        assert_eq!(stored, "SRID=4326;POINT(-99.1 19.4)");

        let back = GeoPoint::parse(&stored).unwrap();
        assert_eq!(back.latitude(), 19.4);
        assert_eq!(back.longitude(), -99.1);
    }

    #[test]
    fn parses_plain_wkt_from_st_astext() {
        let point = GeoPoint::try_from("POINT(2.2945 48.8584)".to_string()).unwrap();
        assert_eq!(point.longitude(), 2.2945);
        assert_eq!(point.latitude(), 48.8584);
    }

    #[test]
    fn parse_is_lenient_about_case_and_spacing() {
        let point = GeoPoint::parse(" point ( -0.5  51.25 ) ").unwrap();
        assert_eq!(point, GeoPoint::new(-0.5, 51.25));
    }

    #[test]
    fn rejects_other_srids() {
        assert_matches!(
            GeoPoint::parse("SRID=3857;POINT(1 2)"),
            Err(GeoError::UnsupportedSrid(3857))
        );
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["", "POINT()", "POINT(1)", "POINT(1 2 3)", "LINESTRING(1 2, 3 4)", "POINT(a b)"] {
            assert_matches!(GeoPoint::parse(text), Err(GeoError::Malformed(_)), "{text}");
        }
    }

    #[test]
    fn extreme_precision_survives_round_trip() {
        let point = GeoPoint::new(-179.99999999999997, 89.12345678901234);
        assert_eq!(GeoPoint::parse(&point.to_ewkt()).unwrap(), point);
    }
}
