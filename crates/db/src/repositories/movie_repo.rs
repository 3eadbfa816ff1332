//! Repository for the `movies` table and its owned `movie_genres` and
//! `movie_actors` rows.

use cinecat_core::filtering::{contains_pattern, non_blank};
use cinecat_core::types::DbId;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::models::genre::GenreDto;
use crate::models::movie::{
    Movie, MovieActor, MovieActorDto, MovieDetailDto, MovieDto, MovieFilter, MovieGenre,
    MovieSort, NewMovie,
};
use crate::resource::{find_by_id, Resource};

const COLUMNS: &str = "t.id, t.title, t.in_theaters, t.release_date, t.poster";

pub struct MovieRepo;

impl Resource for MovieRepo {
    const NAME: &'static str = "Movie";
    const TABLE: &'static str = "movies";
    const COLUMNS: &'static str = COLUMNS;

    type Entity = Movie;
    type Filter = MovieFilter;
    type SortKey = MovieSort;
    type Detail = MovieDetailDto;

    fn push_filters(filter: &MovieFilter, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(title) = non_blank(filter.title.as_deref()) {
            qb.push(" AND t.title ILIKE ").push_bind(contains_pattern(title));
        }
        if filter.in_theaters == Some(true) {
            qb.push(" AND t.in_theaters");
        }
        if filter.upcoming_releases == Some(true) {
            qb.push(" AND t.release_date > CURRENT_DATE");
        }
        if !filter.genre_ids.is_empty() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM movie_genres mg \
                 WHERE mg.movie_id = t.id AND mg.genre_id = ANY(",
            )
            .push_bind(filter.genre_ids.clone())
            .push("))");
        }
    }

    async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<MovieDetailDto>, sqlx::Error> {
        let Some(movie) = find_by_id::<Self>(pool, id).await? else {
            return Ok(None);
        };

        let genres = sqlx::query_as::<_, GenreDto>(
            "SELECT g.id, g.name
             FROM movie_genres mg
             JOIN genres g ON g.id = mg.genre_id
             WHERE mg.movie_id = $1
             ORDER BY g.name, g.id",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        let actors = sqlx::query_as::<_, MovieActorDto>(
            "SELECT ma.actor_id, ma.role AS \"character\", a.name AS actor_name
             FROM movie_actors ma
             JOIN actors a ON a.id = ma.actor_id
             WHERE ma.movie_id = $1
             ORDER BY ma.display_order",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(Some(MovieDetailDto {
            id: movie.id,
            title: movie.title,
            in_theaters: movie.in_theaters,
            release_date: movie.release_date,
            poster: movie.poster,
            genres,
            actors,
        }))
    }

    async fn insert(pool: &PgPool, draft: NewMovie) -> Result<Movie, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO movies (title, in_theaters, release_date, poster)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&draft.title)
        .bind(draft.in_theaters)
        .bind(draft.release_date)
        .bind(&draft.poster)
        .fetch_one(&mut *tx)
        .await?;
        insert_relations(&mut tx, id, &draft.genres, &draft.actors).await?;
        tx.commit().await?;

        tracing::debug!(
            movie_id = id,
            genres = draft.genres.len(),
            actors = draft.actors.len(),
            "Movie inserted with relations"
        );
        Ok(draft.into_entity(id))
    }

    async fn save(pool: &PgPool, movie: &Movie) -> Result<(), sqlx::Error> {
        update_scalars(pool, movie).await
    }

    /// Rewrite the scalar columns and swap the relation rows for the
    /// entity's lists in one transaction.
    async fn replace(pool: &PgPool, movie: &Movie) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        update_scalars(&mut *tx, movie).await?;
        sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
            .bind(movie.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM movie_actors WHERE movie_id = $1")
            .bind(movie.id)
            .execute(&mut *tx)
            .await?;
        insert_relations(&mut tx, movie.id, &movie.genres, &movie.actors).await?;
        tx.commit().await
    }
}

impl MovieRepo {
    /// Next releases after today, soonest first.
    pub async fn upcoming(pool: &PgPool, limit: i64) -> Result<Vec<MovieDto>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies t
             WHERE t.release_date > CURRENT_DATE
             ORDER BY t.release_date ASC, t.id ASC
             LIMIT $1"
        );
        sqlx::query_as::<_, MovieDto>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn in_theaters(pool: &PgPool, limit: i64) -> Result<Vec<MovieDto>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies t
             WHERE t.in_theaters
             ORDER BY t.id ASC
             LIMIT $1"
        );
        sqlx::query_as::<_, MovieDto>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

async fn update_scalars<'e, E>(executor: E, movie: &Movie) -> Result<(), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE movies
         SET title = $2, in_theaters = $3, release_date = $4, poster = $5
         WHERE id = $1",
    )
    .bind(movie.id)
    .bind(&movie.title)
    .bind(movie.in_theaters)
    .bind(movie.release_date)
    .bind(&movie.poster)
    .execute(executor)
    .await?;
    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}

async fn insert_relations(
    conn: &mut PgConnection,
    movie_id: DbId,
    genres: &[MovieGenre],
    actors: &[MovieActor],
) -> Result<(), sqlx::Error> {
    if !genres.is_empty() {
        let genre_ids: Vec<DbId> = genres.iter().map(|g| g.genre_id).collect();
        sqlx::query(
            "INSERT INTO movie_genres (movie_id, genre_id)
             SELECT $1, UNNEST($2::BIGINT[])",
        )
        .bind(movie_id)
        .bind(genre_ids)
        .execute(&mut *conn)
        .await?;
    }

    if !actors.is_empty() {
        let actor_ids: Vec<DbId> = actors.iter().map(|a| a.actor_id).collect();
        let roles: Vec<String> = actors.iter().map(|a| a.role.clone()).collect();
        let orders: Vec<i32> = actors.iter().map(|a| a.display_order).collect();
        sqlx::query(
            "INSERT INTO movie_actors (movie_id, actor_id, role, display_order)
             SELECT $1, u.actor_id, u.role, u.display_order
             FROM UNNEST($2::BIGINT[], $3::TEXT[], $4::INT[]) AS u(actor_id, role, display_order)",
        )
        .bind(movie_id)
        .bind(actor_ids)
        .bind(roles)
        .bind(orders)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
