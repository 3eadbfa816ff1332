pub mod actor;
pub mod cinema_room;
pub mod genre;
pub mod health;
pub mod movie;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /genres                     list, create
/// /genres/{id}                get, replace, patch, delete
///
/// /actors                     list, create (JSON or multipart with photo)
/// /actors/{id}                get, replace, patch, delete
///
/// /movies                     index (upcoming + in theaters), create
/// /movies/filter              filtered, paginated list
/// /movies/{id}                get (with genres and cast), replace, patch, delete
///
/// /cinema-rooms               list, create
/// /cinema-rooms/nearby        rooms within a radius of a point
/// /cinema-rooms/{id}          get, replace, patch, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/genres", genre::router())
        .nest("/actors", actor::router())
        .nest("/movies", movie::router())
        .nest("/cinema-rooms", cinema_room::router())
}
