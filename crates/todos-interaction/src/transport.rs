//! HTTP transport seam.
//!
//! Everything that leaves the process goes through [`HttpTransport`]: the
//! identity exchanges and the GraphQL requests. Status handling (401 replay,
//! error mapping) lives above this layer, so a transport only reports what the
//! server answered.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use todos_core::{Result, TodosError};

/// A JSON POST request.
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    /// Bearer credential sent as `Authorization: Bearer <token>`.
    pub bearer: Option<String>,
    pub body: serde_json::Value,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            bearer: None,
            body,
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

// Tokens stay out of logs.
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .field("body", &self.body)
            .finish()
    }
}

/// Status and raw body of a server answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Parses the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            TodosError::request(Some(self.status), format!("Failed to parse response: {}", e))
        })
    }

    /// Body shortened for error messages.
    pub fn body_excerpt(&self) -> &str {
        const MAX: usize = 200;
        match self.body.char_indices().nth(MAX) {
            Some((idx, _)) => &self.body[..idx],
            None => &self.body,
        }
    }
}

/// Sends JSON POST requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `request` and returns the response whatever its status.
    ///
    /// # Returns
    ///
    /// - `Ok(HttpResponse)`: The server answered (any status)
    /// - `Err(TodosError::Request)`: No answer (connection, timeout, body read)
    async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Production transport backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .post(&request.url)
            .header("content-type", "application/json")
            .json(&request.body)
            .timeout(self.timeout);

        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let response = builder.send().await.map_err(|e| {
            TodosError::request(None, format!("Failed to send request to {}: {}", request.url, e))
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            TodosError::request(Some(status), format!("Failed to read response body: {}", e))
        })?;

        tracing::debug!("[Transport] POST {} -> {}", request.url, status);
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_bearer() {
        let request = HttpRequest::new("https://example.test", serde_json::json!({}))
            .with_bearer("secret-token");
        let printed = format!("{:?}", request);

        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_status_helpers() {
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(401, "").is_success());
        assert!(HttpResponse::new(401, "").is_unauthorized());
    }

    #[test]
    fn test_body_excerpt_truncates_on_char_boundary() {
        let response = HttpResponse::new(500, "é".repeat(300));
        assert_eq!(response.body_excerpt().chars().count(), 200);
        assert_eq!(HttpResponse::new(500, "short").body_excerpt(), "short");
    }

    #[test]
    fn test_json_parse_error_is_request_error() {
        let err = HttpResponse::new(200, "<html>")
            .json::<serde_json::Value>()
            .unwrap_err();
        assert_eq!(err.status(), Some(200));
    }
}
