//! The store contract shared by every catalog resource.
//!
//! A [`Resource`] names its table, column list, filter criteria and sort
//! whitelist, and supplies the handful of statements that differ per entity
//! (inserts, updates, detail loads). Counting, paging, existence checks and
//! deletes are written once here against those declarations.

use std::future::Future;

use cinecat_core::pagination::PageRequest;
use cinecat_core::sorting::{Ordering, SortKey};
use cinecat_core::types::DbId;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::mapping::EntityMapping;

pub type DraftOf<R> = <<R as Resource>::Entity as EntityMapping>::Draft;
pub type ReadOf<R> = <<R as Resource>::Entity as EntityMapping>::Read;
pub type CreateOf<R> = <<R as Resource>::Entity as EntityMapping>::Create;
pub type PatchOf<R> = <<R as Resource>::Entity as EntityMapping>::Patch;

/// Tiebreaker appended to every ordering so pages are stable.
const TIEBREAKER: &str = "t.id";

pub trait Resource: Send + Sync + 'static {
    /// Entity label used in errors and logs.
    const NAME: &'static str;
    /// Table name; queries alias it as `t`.
    const TABLE: &'static str;
    /// Select list producing `Self::Entity`, qualified with `t.`.
    const COLUMNS: &'static str;

    type Entity: EntityMapping + Sync + for<'r> FromRow<'r, PgRow> + Unpin;
    type Filter: Send + Sync;
    type SortKey: SortKey;
    /// Shape returned by get-by-id; may inline owned relations.
    type Detail: Serialize + Send;

    /// Append one `AND ...` clause per requested predicate. Absent predicates
    /// add nothing.
    fn push_filters(filter: &Self::Filter, qb: &mut QueryBuilder<'_, Postgres>);

    fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> impl Future<Output = Result<Option<Self::Detail>, sqlx::Error>> + Send;

    /// Persist a draft with its owned relations and return the stored entity.
    fn insert(
        pool: &PgPool,
        draft: DraftOf<Self>,
    ) -> impl Future<Output = Result<Self::Entity, sqlx::Error>> + Send;

    /// Write the entity's scalar columns. Fails with `RowNotFound` if the row
    /// has disappeared since it was loaded.
    fn save(
        pool: &PgPool,
        entity: &Self::Entity,
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// Write the whole record, owned relations included.
    fn replace(
        pool: &PgPool,
        entity: &Self::Entity,
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send {
        Self::save(pool, entity)
    }
}

/// `SELECT COUNT(*)` over the filtered set, before any ordering or slicing.
pub fn count_query<R: Resource>(filter: &R::Filter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {} t WHERE TRUE", R::TABLE));
    R::push_filters(filter, &mut qb);
    qb
}

/// One ordered page of the filtered set.
pub fn page_query<R: Resource>(
    filter: &R::Filter,
    ordering: &Ordering<R::SortKey>,
    page: &PageRequest,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM {} t WHERE TRUE",
        R::COLUMNS,
        R::TABLE
    ));
    R::push_filters(filter, &mut qb);
    qb.push(" ORDER BY ")
        .push(ordering.to_sql(TIEBREAKER))
        .push(" LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
    qb
}

pub async fn count<R: Resource>(pool: &PgPool, filter: &R::Filter) -> Result<i64, sqlx::Error> {
    let mut qb = count_query::<R>(filter);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

pub async fn fetch_page<R: Resource>(
    pool: &PgPool,
    filter: &R::Filter,
    ordering: &Ordering<R::SortKey>,
    page: &PageRequest,
) -> Result<Vec<R::Entity>, sqlx::Error> {
    let mut qb = page_query::<R>(filter, ordering, page);
    qb.build_query_as::<R::Entity>().fetch_all(pool).await
}

pub async fn find_by_id<R: Resource>(
    pool: &PgPool,
    id: DbId,
) -> Result<Option<R::Entity>, sqlx::Error> {
    let query = format!("SELECT {} FROM {} t WHERE t.id = $1", R::COLUMNS, R::TABLE);
    sqlx::query_as::<_, R::Entity>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn exists<R: Resource>(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
    let query = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", R::TABLE);
    sqlx::query_scalar::<_, bool>(&query)
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Delete by id. Owned relation rows go with it via `ON DELETE CASCADE`.
/// Returns `true` if a row was removed.
pub async fn delete<R: Resource>(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
    let query = format!("DELETE FROM {} WHERE id = $1", R::TABLE);
    let result = sqlx::query(&query).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
