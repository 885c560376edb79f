//! Todo domain module.
//!
//! # Module Structure
//!
//! - `model`: The `Todo` entity and its GraphQL input payloads
//! - `gateway`: `TodoGateway` trait for remote persistence
//! - `filter`: Search and visibility derivation over cached todos

pub mod filter;
pub mod gateway;
mod model;

// Re-export public API
pub use filter::{TodoFilter, Visibility, search_filter, visibility_filter};
pub use gateway::{DEFAULT_LIST_LIMIT, TodoGateway};
pub use model::{
    BULLET, DRAFT_ID, DRAFT_TITLE, Priority, SortBy, Todo, TodoFields, TodoPatch, TodoQuery,
};
