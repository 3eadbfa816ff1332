//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Read, create and patch DTOs plus the insertable draft
//! - The [`EntityMapping`](crate::mapping::EntityMapping) between them
//! - The resource's filter criteria and sort whitelist

pub mod actor;
pub mod cinema_room;
pub mod genre;
pub mod movie;
