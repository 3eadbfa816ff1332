//! Shared query parameter types for list handlers.

use cinecat_core::pagination::PageRequest;
use cinecat_core::sorting::{Ordering, SortDirection, SortKey};
use serde::Deserialize;

/// Paging and ordering parameters accepted by every list endpoint
/// (`?page=&page_size=&sort_field=&sort_direction=`).
///
/// Resource-specific predicates are extracted separately from the same query
/// string.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<SortDirection>,
}

impl ListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    /// Resolve the requested ordering against `K`'s whitelist, falling back to
    /// the default ordering when the field is unknown.
    pub fn ordering<K: SortKey>(&self, resource: &'static str) -> Ordering<K> {
        Ordering::resolve(self.sort_field.as_deref(), self.sort_direction).unwrap_or_else(|err| {
            tracing::warn!(resource, error = %err, "Falling back to default ordering");
            Ordering::default()
        })
    }
}
