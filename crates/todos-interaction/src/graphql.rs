//! GraphQL-over-HTTP client with a single refresh-and-replay on 401.

use crate::credentials::CredentialManager;
use crate::operations::Operation;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use todos_core::{Result, TodosError};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Posts `{query, variables}` bodies to one GraphQL endpoint.
#[derive(Clone)]
pub struct GraphQlClient {
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<CredentialManager>,
    endpoint: String,
}

impl GraphQlClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<CredentialManager>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            credentials,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.credentials
    }

    /// Runs `operation` and deserializes `data.<field>` into `T`.
    ///
    /// A 401 triggers one credential refresh and one replay of the identical
    /// request. A second 401 is returned as [`TodosError::Auth`]; every other
    /// failure comes back as [`TodosError::Request`] without retry.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: serde_json::Value,
    ) -> Result<T> {
        let body = serde_json::json!({
            "query": operation.document,
            "variables": variables,
        });

        let token = self.credentials.get_token().await?;
        tracing::debug!("[GraphQL] {} -> {}", operation.name, self.endpoint);
        let mut response = self.send(&body, &token).await?;

        if response.is_unauthorized() {
            tracing::warn!(
                "[GraphQL] {} rejected with 401, refreshing token and replaying once",
                operation.name
            );
            let fresh = self.credentials.refresh(&token).await?;
            response = self.send(&body, &fresh).await?;

            if response.is_unauthorized() {
                return Err(TodosError::auth(format!(
                    "{} rejected again after token refresh",
                    operation.name
                )));
            }
        }

        Self::decode(operation, response)
    }

    async fn send(&self, body: &serde_json::Value, token: &str) -> Result<HttpResponse> {
        self.transport
            .post_json(HttpRequest::new(&self.endpoint, body.clone()).with_bearer(token))
            .await
    }

    fn decode<T: DeserializeOwned>(operation: &Operation, response: HttpResponse) -> Result<T> {
        if !response.is_success() {
            return Err(TodosError::request(
                Some(response.status),
                format!("{} failed: {}", operation.name, response.body_excerpt()),
            ));
        }

        let envelope: Envelope = response.json()?;

        if !envelope.errors.is_empty() {
            let messages: Vec<&str> = envelope.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(TodosError::request(
                Some(response.status),
                format!("{} returned errors: {}", operation.name, messages.join("; ")),
            ));
        }

        let payload = envelope
            .data
            .and_then(|mut data| data.remove(operation.field))
            .ok_or_else(|| {
                TodosError::request(
                    Some(response.status),
                    format!("{} response has no data.{}", operation.name, operation.field),
                )
            })?;

        serde_json::from_value(payload).map_err(|e| {
            TodosError::request(
                Some(response.status),
                format!("{} payload did not match: {}", operation.name, e),
            )
        })
    }
}
