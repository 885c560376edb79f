pub mod todo;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use todos_application::TodoStore;
use todos_infrastructure::{ConfigService, TodosPaths};
use todos_interaction::GraphQlTodoGateway;

/// Resolves configuration, wires the GraphQL gateway and loads the list.
pub async fn open_store(config_dir: Option<&Path>) -> Result<TodoStore> {
    let config = ConfigService::new(TodosPaths::new(config_dir))
        .load()
        .context("Failed to load configuration")?;
    tracing::debug!(
        "[CLI] Using app '{}' at {}",
        config.app_id,
        config.graphql_url
    );

    let gateway = Arc::new(GraphQlTodoGateway::from_config(&config));
    let mut store = TodoStore::new(gateway).with_list_limit(config.list_limit);
    store.load().await.context("Failed to load todos")?;

    Ok(store)
}
