//! Catalog domain logic shared by the persistence and HTTP layers.
//!
//! Nothing in this crate touches the database: callers hand in rows or
//! snapshots and get back pure results.

pub mod assets;
pub mod error;
pub mod filtering;
pub mod geo;
pub mod pagination;
pub mod patch;
pub mod sorting;
pub mod types;
pub mod validation;
