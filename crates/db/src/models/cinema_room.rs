//! Cinema room entity model and DTOs.
//!
//! The entity holds a single [`GeoPoint`]; the wire format splits it into
//! `latitude` and `longitude`.

use cinecat_core::geo::GeoPoint;
use cinecat_core::sorting::SortKey;
use cinecat_core::types::DbId;
use cinecat_core::validation::finite;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::mapping::EntityMapping;

/// Default radius for nearby searches.
pub const DEFAULT_NEARBY_KM: f64 = 10.0;
/// Largest radius a nearby search may ask for.
pub const MAX_NEARBY_KM: f64 = 50.0;

/// A row from the `cinema_rooms` table. `location` is selected through
/// `ST_AsText`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CinemaRoom {
    pub id: DbId,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub location: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CinemaRoomDto {
    pub id: DbId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// DTO for creating, replacing or patching a cinema room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateCinemaRoom {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl CreateCinemaRoom {
    fn location(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }
}

#[derive(Debug, Clone)]
pub struct NewCinemaRoom {
    pub name: String,
    pub location: GeoPoint,
}

impl NewCinemaRoom {
    pub fn into_entity(self, id: DbId) -> CinemaRoom {
        CinemaRoom {
            id,
            name: self.name,
            location: self.location,
        }
    }
}

/// Query-string criteria for `GET /cinema-rooms`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CinemaRoomFilter {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CinemaRoomSort {
    Name,
    Id,
}

impl SortKey for CinemaRoomSort {
    const DEFAULT: Self = CinemaRoomSort::Name;

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(CinemaRoomSort::Name),
            "id" => Some(CinemaRoomSort::Id),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            CinemaRoomSort::Name => "t.name",
            CinemaRoomSort::Id => "t.id",
        }
    }

    fn is_unique(self) -> bool {
        matches!(self, CinemaRoomSort::Id)
    }
}

// ---------------------------------------------------------------------------
// Nearby search
// ---------------------------------------------------------------------------

/// Query string of `GET /cinema-rooms/nearby`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NearbyQuery {
    #[validate(range(min = -90.0, max = 90.0), custom(function = "finite"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0), custom(function = "finite"))]
    pub longitude: f64,
    #[validate(range(exclusive_min = 0.0, max = 50.0), custom(function = "finite"))]
    pub distance_km: Option<f64>,
}

impl NearbyQuery {
    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_km.unwrap_or(DEFAULT_NEARBY_KM).min(MAX_NEARBY_KM) * 1000.0
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct NearbyCinemaRoom {
    pub id: DbId,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub location: GeoPoint,
    pub distance_meters: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyCinemaRoomDto {
    pub id: DbId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: f64,
}

impl From<NearbyCinemaRoom> for NearbyCinemaRoomDto {
    fn from(row: NearbyCinemaRoom) -> Self {
        Self {
            id: row.id,
            name: row.name,
            latitude: row.location.latitude(),
            longitude: row.location.longitude(),
            distance_meters: row.distance_meters,
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

impl EntityMapping for CinemaRoom {
    type Draft = NewCinemaRoom;
    type Read = CinemaRoomDto;
    type Create = CreateCinemaRoom;
    type Patch = CreateCinemaRoom;

    fn id(&self) -> DbId {
        self.id
    }

    fn to_read(self) -> CinemaRoomDto {
        CinemaRoomDto {
            id: self.id,
            name: self.name,
            latitude: self.location.latitude(),
            longitude: self.location.longitude(),
        }
    }

    fn to_draft(input: &CreateCinemaRoom) -> NewCinemaRoom {
        NewCinemaRoom {
            name: input.name.clone(),
            location: input.location(),
        }
    }

    fn apply_update(&mut self, input: &CreateCinemaRoom) {
        self.name = input.name.clone();
        self.location = input.location();
    }

    fn to_patch(&self) -> CreateCinemaRoom {
        CreateCinemaRoom {
            name: self.name.clone(),
            latitude: self.location.latitude(),
            longitude: self.location.longitude(),
        }
    }

    fn merge_patch(&mut self, patch: CreateCinemaRoom) {
        self.location = patch.location();
        self.name = patch.name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CreateCinemaRoom {
        CreateCinemaRoom {
            name: "Cinepolis Centro".into(),
            latitude: 19.4,
            longitude: -99.1,
        }
    }

    #[test]
    fn coordinates_survive_the_geo_point() {
        let dto = CinemaRoom::to_draft(&input()).into_entity(4).to_read();
        assert_eq!(dto.latitude, 19.4);
        assert_eq!(dto.longitude, -99.1);
    }

    #[test]
    fn draft_point_uses_longitude_as_x() {
        let draft = CinemaRoom::to_draft(&input());
        assert_eq!(draft.location.to_ewkt(), "SRID=4326;POINT(-99.1 19.4)");
    }

    #[test]
    fn out_of_range_latitude_fails_validation() {
        let mut dto = input();
        dto.latitude = 91.0;
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("latitude"));
    }

    #[test]
    fn nearby_radius_defaults_and_caps() {
        let mut query = NearbyQuery {
            latitude: 19.4,
            longitude: -99.1,
            distance_km: None,
        };
        assert_eq!(query.distance_meters(), 10_000.0);
        assert!(query.validate().is_ok());

        query.distance_km = Some(80.0);
        assert!(query.validate().is_err());
        assert_eq!(query.distance_meters(), 50_000.0);
    }

    #[test]
    fn nearby_rejects_nan_coordinates() {
        let query = NearbyQuery {
            latitude: f64::NAN,
            longitude: -99.1,
            distance_km: Some(f64::NAN),
        };
        let errors = query.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("latitude"));
        assert!(fields.contains_key("distance_km"));
        assert!(!fields.contains_key("longitude"));
    }
}
