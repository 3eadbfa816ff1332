//! Handlers for the `/movies` resource.
//!
//! `GET /movies` is the landing index (upcoming releases and what is
//! showing); the filtered, paginated list lives at `GET /movies/filter`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cinecat_core::patch::PatchDocument;
use cinecat_core::types::DbId;
use cinecat_db::models::movie::{CreateMovie, MovieDetailDto, MovieDto, MovieFilter, MovieIndexDto};
use cinecat_db::repositories::MovieRepo;

use crate::error::AppResult;
use crate::extract::{require_patch, JsonBody, Payload, QueryParams};
use crate::handlers::resource;
use crate::query::ListParams;
use crate::response::{Created, Paginated};
use crate::state::AppState;

/// Entries per index section.
const INDEX_SIZE: i64 = 5;

/// GET /api/v1/movies
pub async fn index(State(state): State<AppState>) -> AppResult<Json<MovieIndexDto>> {
    let upcoming_releases = MovieRepo::upcoming(&state.pool, INDEX_SIZE).await?;
    let in_theaters = MovieRepo::in_theaters(&state.pool, INDEX_SIZE).await?;
    Ok(Json(MovieIndexDto {
        upcoming_releases,
        in_theaters,
    }))
}

/// GET /api/v1/movies/filter
///
/// `?title=&in_theaters=&upcoming_releases=&genre_ids=1,2` plus the shared
/// paging and ordering parameters.
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
    QueryParams(filter): QueryParams<MovieFilter>,
) -> AppResult<Paginated<MovieDto>> {
    resource::list::<MovieRepo>(&state, &filter, &params).await
}

/// GET /api/v1/movies/{id}
///
/// Genres and cast are inlined; the cast is in display order.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MovieDetailDto>> {
    resource::get::<MovieRepo>(&state, id).await
}

/// POST /api/v1/movies
pub async fn create(
    State(state): State<AppState>,
    payload: Payload<CreateMovie>,
) -> AppResult<Created<MovieDto>> {
    resource::create_with_asset::<MovieRepo>(&state, "movies", payload.data, payload.upload).await
}

/// PUT /api/v1/movies/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: Payload<CreateMovie>,
) -> AppResult<StatusCode> {
    resource::update_with_asset::<MovieRepo>(&state, id, payload.data, payload.upload).await
}

/// PATCH /api/v1/movies/{id}
///
/// Addresses `{title, in_theaters, release_date}`.
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    JsonBody(document): JsonBody<Option<PatchDocument>>,
) -> AppResult<StatusCode> {
    resource::patch::<MovieRepo>(&state, id, require_patch(document)?).await
}

/// DELETE /api/v1/movies/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    resource::delete::<MovieRepo>(&state, id).await
}
