//! Repository for the `actors` table.

use cinecat_core::filtering::{contains_pattern, non_blank};
use cinecat_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::mapping::EntityMapping;
use crate::models::actor::{Actor, ActorDto, ActorFilter, ActorSort, NewActor};
use crate::resource::{find_by_id, Resource};

const COLUMNS: &str = "t.id, t.name, t.birth_date, t.photo";

pub struct ActorRepo;

impl Resource for ActorRepo {
    const NAME: &'static str = "Actor";
    const TABLE: &'static str = "actors";
    const COLUMNS: &'static str = COLUMNS;

    type Entity = Actor;
    type Filter = ActorFilter;
    type SortKey = ActorSort;
    type Detail = ActorDto;

    fn push_filters(filter: &ActorFilter, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(name) = non_blank(filter.name.as_deref()) {
            qb.push(" AND t.name ILIKE ").push_bind(contains_pattern(name));
        }
    }

    async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<ActorDto>, sqlx::Error> {
        Ok(find_by_id::<Self>(pool, id).await?.map(Actor::to_read))
    }

    async fn insert(pool: &PgPool, draft: NewActor) -> Result<Actor, sqlx::Error> {
        let query = format!(
            "INSERT INTO actors AS t (name, birth_date, photo)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(&draft.name)
            .bind(draft.birth_date)
            .bind(&draft.photo)
            .fetch_one(pool)
            .await
    }

    async fn save(pool: &PgPool, actor: &Actor) -> Result<(), sqlx::Error> {
        let result = sqlx::query(
            "UPDATE actors SET name = $2, birth_date = $3, photo = $4 WHERE id = $1",
        )
        .bind(actor.id)
        .bind(&actor.name)
        .bind(actor.birth_date)
        .bind(&actor.photo)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }
}
