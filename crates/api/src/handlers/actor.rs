//! Handlers for the `/actors` resource.
//!
//! Create and replace accept multipart bodies carrying a photo.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cinecat_core::patch::PatchDocument;
use cinecat_core::types::DbId;
use cinecat_db::models::actor::{ActorDto, ActorFilter, CreateActor};
use cinecat_db::repositories::ActorRepo;

use crate::error::AppResult;
use crate::extract::{require_patch, JsonBody, Payload, QueryParams};
use crate::handlers::resource;
use crate::query::ListParams;
use crate::response::{Created, Paginated};
use crate::state::AppState;

/// GET /api/v1/actors
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
    QueryParams(filter): QueryParams<ActorFilter>,
) -> AppResult<Paginated<ActorDto>> {
    resource::list::<ActorRepo>(&state, &filter, &params).await
}

/// GET /api/v1/actors/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ActorDto>> {
    resource::get::<ActorRepo>(&state, id).await
}

/// POST /api/v1/actors
pub async fn create(
    State(state): State<AppState>,
    payload: Payload<CreateActor>,
) -> AppResult<Created<ActorDto>> {
    resource::create_with_asset::<ActorRepo>(&state, "actors", payload.data, payload.upload).await
}

/// PUT /api/v1/actors/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: Payload<CreateActor>,
) -> AppResult<StatusCode> {
    resource::update_with_asset::<ActorRepo>(&state, id, payload.data, payload.upload).await
}

/// PATCH /api/v1/actors/{id}
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    JsonBody(document): JsonBody<Option<PatchDocument>>,
) -> AppResult<StatusCode> {
    resource::patch::<ActorRepo>(&state, id, require_patch(document)?).await
}

/// DELETE /api/v1/actors/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    resource::delete::<ActorRepo>(&state, id).await
}
