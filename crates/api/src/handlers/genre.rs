//! Handlers for the `/genres` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cinecat_core::patch::PatchDocument;
use cinecat_core::types::DbId;
use cinecat_db::models::genre::{CreateGenre, GenreDto, GenreFilter};
use cinecat_db::repositories::GenreRepo;

use crate::error::AppResult;
use crate::extract::{require_patch, JsonBody, QueryParams};
use crate::handlers::resource;
use crate::query::ListParams;
use crate::response::{Created, Paginated};
use crate::state::AppState;

/// GET /api/v1/genres
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
    QueryParams(filter): QueryParams<GenreFilter>,
) -> AppResult<Paginated<GenreDto>> {
    resource::list::<GenreRepo>(&state, &filter, &params).await
}

/// GET /api/v1/genres/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<GenreDto>> {
    resource::get::<GenreRepo>(&state, id).await
}

/// POST /api/v1/genres
pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateGenre>,
) -> AppResult<Created<GenreDto>> {
    resource::create::<GenreRepo>(&state, "genres", input).await
}

/// PUT /api/v1/genres/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<CreateGenre>,
) -> AppResult<StatusCode> {
    resource::update::<GenreRepo>(&state, id, input).await
}

/// PATCH /api/v1/genres/{id}
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    JsonBody(document): JsonBody<Option<PatchDocument>>,
) -> AppResult<StatusCode> {
    resource::patch::<GenreRepo>(&state, id, require_patch(document)?).await
}

/// DELETE /api/v1/genres/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    resource::delete::<GenreRepo>(&state, id).await
}
