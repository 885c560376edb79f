//! Remote todo gateway trait.
//!
//! Defines the five operations the client performs against the backend.

use super::model::{SortBy, Todo, TodoFields, TodoPatch, TodoQuery};
use crate::error::Result;
use async_trait::async_trait;

/// Default page size of the list operation.
pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// An abstract gateway to the remote todo collection.
///
/// This trait decouples the client's cache synchronization from the concrete
/// transport (GraphQL over HTTP in production, in-memory fakes in tests).
///
/// # Implementation Notes
///
/// Implementations should:
/// - Attach credentials to every request
/// - Replay a request at most once after an authentication failure
/// - Surface every other failure immediately
#[async_trait]
pub trait TodoGateway: Send + Sync {
    /// Lists todos matching `query` (all todos when `None`).
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Todo>)`: Up to `limit` todos in `sort_by` order
    /// - `Err(_)`: Authentication or request failure
    async fn list(&self, query: Option<&TodoQuery>, sort_by: SortBy, limit: u32)
    -> Result<Vec<Todo>>;

    /// Inserts a todo and returns the server-issued id.
    async fn insert(&self, fields: &TodoFields) -> Result<String>;

    /// Updates the todo matching `query` and returns its id.
    async fn update(&self, query: &TodoQuery, patch: &TodoPatch) -> Result<String>;

    /// Deletes the todo matching `query` and returns its id.
    async fn delete_one(&self, query: &TodoQuery) -> Result<String>;

    /// Deletes every todo matching `query` and returns how many were removed.
    async fn delete_many(&self, query: &TodoQuery) -> Result<u64>;
}
