//! `TodoGateway` implementation over the backend's GraphQL API.

use crate::credentials::CredentialManager;
use crate::graphql::GraphQlClient;
use crate::operations::{
    DELETE_MANY_TODOS, DELETE_ONE_TODO, INSERT_ONE_TODO, LIST_TODOS, UPDATE_ONE_TODO,
};
use crate::transport::{HttpTransport, ReqwestTransport};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use todos_core::config::TodosConfig;
use todos_core::todo::{SortBy, Todo, TodoFields, TodoGateway, TodoPatch, TodoQuery};
use todos_core::{Result, TodosError};

#[derive(Debug, Deserialize)]
struct IdPayload {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct DeleteManyPayload {
    #[serde(rename = "deletedCount")]
    deleted_count: u64,
}

/// Remote todo collection reached through [`GraphQlClient`].
#[derive(Clone)]
pub struct GraphQlTodoGateway {
    client: GraphQlClient,
}

impl GraphQlTodoGateway {
    pub fn new(client: GraphQlClient) -> Self {
        Self { client }
    }

    /// Wires the production stack: reqwest transport, anonymous credentials,
    /// GraphQL client.
    pub fn from_config(config: &TodosConfig) -> Self {
        let transport: Arc<dyn HttpTransport> =
            Arc::new(ReqwestTransport::new(config.request_timeout()));
        Self::with_transport(transport, config)
    }

    pub fn with_transport(transport: Arc<dyn HttpTransport>, config: &TodosConfig) -> Self {
        let credentials = Arc::new(CredentialManager::from_config(transport.clone(), config));
        Self::new(GraphQlClient::new(transport, credentials, &config.graphql_url))
    }

    pub fn client(&self) -> &GraphQlClient {
        &self.client
    }
}

fn describe(query: &TodoQuery) -> String {
    match (&query.id, &query.id_in) {
        (Some(id), _) => id.clone(),
        (None, Some(ids)) => ids.join(","),
        (None, None) => serde_json::to_string(query).unwrap_or_default(),
    }
}

#[async_trait]
impl TodoGateway for GraphQlTodoGateway {
    async fn list(
        &self,
        query: Option<&TodoQuery>,
        sort_by: SortBy,
        limit: u32,
    ) -> Result<Vec<Todo>> {
        let todos: Option<Vec<Todo>> = self
            .client
            .execute(
                &LIST_TODOS,
                serde_json::json!({
                    "query": query,
                    "sortBy": sort_by,
                    "limit": limit,
                }),
            )
            .await?;

        let todos = todos.unwrap_or_default();
        tracing::debug!("[TodoGateway] Listed {} todos", todos.len());
        Ok(todos)
    }

    async fn insert(&self, fields: &TodoFields) -> Result<String> {
        let inserted: Option<IdPayload> = self
            .client
            .execute(&INSERT_ONE_TODO, serde_json::json!({ "data": fields }))
            .await?;

        inserted.map(|payload| payload.id).ok_or_else(|| {
            TodosError::request(None, "InsertOneTodo returned no id for the new todo")
        })
    }

    async fn update(&self, query: &TodoQuery, patch: &TodoPatch) -> Result<String> {
        let updated: Option<IdPayload> = self
            .client
            .execute(
                &UPDATE_ONE_TODO,
                serde_json::json!({ "query": query, "set": patch }),
            )
            .await?;

        updated
            .map(|payload| payload.id)
            .ok_or_else(|| TodosError::not_found("todo", describe(query)))
    }

    async fn delete_one(&self, query: &TodoQuery) -> Result<String> {
        let deleted: Option<IdPayload> = self
            .client
            .execute(&DELETE_ONE_TODO, serde_json::json!({ "query": query }))
            .await?;

        deleted
            .map(|payload| payload.id)
            .ok_or_else(|| TodosError::not_found("todo", describe(query)))
    }

    async fn delete_many(&self, query: &TodoQuery) -> Result<u64> {
        let deleted: Option<DeleteManyPayload> = self
            .client
            .execute(&DELETE_MANY_TODOS, serde_json::json!({ "query": query }))
            .await?;

        Ok(deleted.map(|payload| payload.deleted_count).unwrap_or(0))
    }
}
