//! Route definitions for the `/movies` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::movie;
use crate::state::AppState;

/// Routes mounted at `/movies`.
///
/// ```text
/// GET    /          -> index
/// POST   /          -> create
/// GET    /filter    -> list
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update
/// PATCH  /{id}      -> patch
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(movie::index).post(movie::create))
        .route("/filter", get(movie::list))
        .route(
            "/{id}",
            get(movie::get_by_id)
                .put(movie::update)
                .patch(movie::patch)
                .delete(movie::delete),
        )
}
