//! Route definitions for the `/cinema-rooms` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::cinema_room;
use crate::state::AppState;

/// Routes mounted at `/cinema-rooms`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// GET    /nearby    -> nearby
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update
/// PATCH  /{id}      -> patch
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cinema_room::list).post(cinema_room::create))
        .route("/nearby", get(cinema_room::nearby))
        .route(
            "/{id}",
            get(cinema_room::get_by_id)
                .put(cinema_room::update)
                .patch(cinema_room::patch)
                .delete(cinema_room::delete),
        )
}
