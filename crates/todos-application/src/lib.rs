//! Application layer for the todos client.
//!
//! Coordinates the remote gateway with the in-memory list cache and the
//! selection state a front end renders.

pub mod list_cache;
pub mod selection;
pub mod todo_store;

pub use list_cache::ListCache;
pub use selection::{MultiSelect, Selection};
pub use todo_store::{DraftToggle, TodoStore};
