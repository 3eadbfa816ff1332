//! Response shapes that carry metadata in headers.

use axum::http::header::LOCATION;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Header carrying the filtered total of a paginated list.
pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// One page of a list. The body is the bare JSON array; the total number of
/// rows matching the filter goes in `x-total-count`.
#[derive(Debug)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T: Serialize> IntoResponse for Paginated<T> {
    fn into_response(self) -> Response {
        (
            [(TOTAL_COUNT_HEADER, HeaderValue::from(self.total))],
            Json(self.items),
        )
            .into_response()
    }
}

/// `201 Created` with a `Location` header pointing at the new resource.
#[derive(Debug)]
pub struct Created<T> {
    pub location: String,
    pub body: T,
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        match HeaderValue::try_from(self.location) {
            Ok(location) => {
                (StatusCode::CREATED, [(LOCATION, location)], Json(self.body)).into_response()
            }
            Err(_) => (StatusCode::CREATED, Json(self.body)).into_response(),
        }
    }
}
