//! Repository for the `genres` table.

use cinecat_core::filtering::{contains_pattern, non_blank};
use cinecat_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::mapping::EntityMapping;
use crate::models::genre::{Genre, GenreDto, GenreFilter, GenreSort, NewGenre};
use crate::resource::{find_by_id, Resource};

const COLUMNS: &str = "t.id, t.name";

pub struct GenreRepo;

impl Resource for GenreRepo {
    const NAME: &'static str = "Genre";
    const TABLE: &'static str = "genres";
    const COLUMNS: &'static str = COLUMNS;

    type Entity = Genre;
    type Filter = GenreFilter;
    type SortKey = GenreSort;
    type Detail = GenreDto;

    fn push_filters(filter: &GenreFilter, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(name) = non_blank(filter.name.as_deref()) {
            qb.push(" AND t.name ILIKE ").push_bind(contains_pattern(name));
        }
    }

    async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<GenreDto>, sqlx::Error> {
        Ok(find_by_id::<Self>(pool, id).await?.map(Genre::to_read))
    }

    async fn insert(pool: &PgPool, draft: NewGenre) -> Result<Genre, sqlx::Error> {
        let query = format!("INSERT INTO genres AS t (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Genre>(&query)
            .bind(&draft.name)
            .fetch_one(pool)
            .await
    }

    async fn save(pool: &PgPool, genre: &Genre) -> Result<(), sqlx::Error> {
        let result = sqlx::query("UPDATE genres SET name = $2 WHERE id = $1")
            .bind(genre.id)
            .bind(&genre.name)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }
}
