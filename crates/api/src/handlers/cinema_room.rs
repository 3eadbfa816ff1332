//! Handlers for the `/cinema-rooms` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cinecat_core::error::CoreError;
use cinecat_core::patch::PatchDocument;
use cinecat_core::types::DbId;
use cinecat_db::models::cinema_room::{
    CinemaRoomDto, CinemaRoomFilter, CreateCinemaRoom, NearbyCinemaRoomDto, NearbyQuery,
};
use cinecat_db::repositories::CinemaRoomRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{require_patch, JsonBody, QueryParams};
use crate::handlers::resource;
use crate::query::ListParams;
use crate::response::{Created, Paginated};
use crate::state::AppState;

/// GET /api/v1/cinema-rooms
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
    QueryParams(filter): QueryParams<CinemaRoomFilter>,
) -> AppResult<Paginated<CinemaRoomDto>> {
    resource::list::<CinemaRoomRepo>(&state, &filter, &params).await
}

/// GET /api/v1/cinema-rooms/nearby?latitude=&longitude=&distance_km=
///
/// Rooms within `distance_km` (default 10, max 50), nearest first.
pub async fn nearby(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<NearbyQuery>,
) -> AppResult<Json<Vec<NearbyCinemaRoomDto>>> {
    query.validate().map_err(CoreError::from)?;
    let rooms = CinemaRoomRepo::nearby(&state.pool, &query).await?;
    tracing::debug!(found = rooms.len(), radius_m = query.distance_meters(), "Nearby search");
    Ok(Json(rooms.into_iter().map(NearbyCinemaRoomDto::from).collect()))
}

/// GET /api/v1/cinema-rooms/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<CinemaRoomDto>> {
    resource::get::<CinemaRoomRepo>(&state, id).await
}

/// POST /api/v1/cinema-rooms
pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateCinemaRoom>,
) -> AppResult<Created<CinemaRoomDto>> {
    resource::create::<CinemaRoomRepo>(&state, "cinema-rooms", input).await
}

/// PUT /api/v1/cinema-rooms/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<CreateCinemaRoom>,
) -> AppResult<StatusCode> {
    resource::update::<CinemaRoomRepo>(&state, id, input).await
}

/// PATCH /api/v1/cinema-rooms/{id}
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    JsonBody(document): JsonBody<Option<PatchDocument>>,
) -> AppResult<StatusCode> {
    resource::patch::<CinemaRoomRepo>(&state, id, require_patch(document)?).await
}

/// DELETE /api/v1/cinema-rooms/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    resource::delete::<CinemaRoomRepo>(&state, id).await
}
