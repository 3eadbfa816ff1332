//! Repository for the `cinema_rooms` table.
//!
//! Locations are written as EWKT through `ST_GeogFromText` and read back as
//! WKT through `ST_AsText`.

use cinecat_core::filtering::{contains_pattern, non_blank};
use cinecat_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::mapping::EntityMapping;
use crate::models::cinema_room::{
    CinemaRoom, CinemaRoomDto, CinemaRoomFilter, CinemaRoomSort, NearbyCinemaRoom, NearbyQuery,
    NewCinemaRoom,
};
use crate::resource::{find_by_id, Resource};

const COLUMNS: &str = "t.id, t.name, ST_AsText(t.location) AS location";

pub struct CinemaRoomRepo;

impl Resource for CinemaRoomRepo {
    const NAME: &'static str = "CinemaRoom";
    const TABLE: &'static str = "cinema_rooms";
    const COLUMNS: &'static str = COLUMNS;

    type Entity = CinemaRoom;
    type Filter = CinemaRoomFilter;
    type SortKey = CinemaRoomSort;
    type Detail = CinemaRoomDto;

    fn push_filters(filter: &CinemaRoomFilter, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(name) = non_blank(filter.name.as_deref()) {
            qb.push(" AND t.name ILIKE ").push_bind(contains_pattern(name));
        }
    }

    async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<CinemaRoomDto>, sqlx::Error> {
        Ok(find_by_id::<Self>(pool, id).await?.map(CinemaRoom::to_read))
    }

    async fn insert(pool: &PgPool, draft: NewCinemaRoom) -> Result<CinemaRoom, sqlx::Error> {
        let query = format!(
            "INSERT INTO cinema_rooms AS t (name, location)
             VALUES ($1, ST_GeogFromText($2))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CinemaRoom>(&query)
            .bind(&draft.name)
            .bind(draft.location.to_ewkt())
            .fetch_one(pool)
            .await
    }

    async fn save(pool: &PgPool, room: &CinemaRoom) -> Result<(), sqlx::Error> {
        let result = sqlx::query(
            "UPDATE cinema_rooms SET name = $2, location = ST_GeogFromText($3) WHERE id = $1",
        )
        .bind(room.id)
        .bind(&room.name)
        .bind(room.location.to_ewkt())
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }
}

impl CinemaRoomRepo {
    /// Rooms within the query's radius of its origin, nearest first.
    pub async fn nearby(
        pool: &PgPool,
        query: &NearbyQuery,
    ) -> Result<Vec<NearbyCinemaRoom>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS}, ST_Distance(t.location, o.point) AS distance_meters
             FROM cinema_rooms t, (SELECT ST_GeogFromText($1) AS point) o
             WHERE ST_DWithin(t.location, o.point, $2)
             ORDER BY distance_meters ASC, t.id ASC"
        );
        sqlx::query_as::<_, NearbyCinemaRoom>(&sql)
            .bind(query.origin().to_ewkt())
            .bind(query.distance_meters())
            .fetch_all(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use cinecat_core::pagination::PageRequest;
    use cinecat_core::sorting::Ordering;

    use super::*;
    use crate::resource::page_query;

    #[test]
    fn page_selects_location_as_text() {
        let qb = page_query::<CinemaRoomRepo>(
            &CinemaRoomFilter::default(),
            &Ordering::default(),
            &PageRequest::default(),
        );
        assert!(qb
            .sql()
            .starts_with("SELECT t.id, t.name, ST_AsText(t.location) AS location FROM cinema_rooms t"));
    }
}
