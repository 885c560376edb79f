pub mod config;
pub mod error;
pub mod todo;

// Re-export common error type
pub use error::{Result, TodosError};
