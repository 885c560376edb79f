//! Client configuration model.
//!
//! Resolution (environment and config file) lives in `todos-infrastructure`;
//! this module only defines the shape and its defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::todo::DEFAULT_LIST_LIMIT;

/// Public base URL of the identity service used for anonymous login.
pub const DEFAULT_AUTH_URL: &str = "https://realm.mongodb.com";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fully resolved configuration of the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodosConfig {
    /// Identity-service application identifier.
    pub app_id: String,
    /// GraphQL endpoint receiving every todo operation.
    pub graphql_url: String,
    /// Identity service base URL.
    pub auth_url: String,
    pub request_timeout_secs: u64,
    pub list_limit: u32,
}

impl TodosConfig {
    pub fn new(app_id: impl Into<String>, graphql_url: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            graphql_url: graphql_url.into(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Partially specified configuration, as read from one source.
///
/// Sources are layered with [`PartialTodosConfig::or`]; the first source that
/// sets a key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialTodosConfig {
    pub app_id: Option<String>,
    pub graphql_url: Option<String>,
    pub auth_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub list_limit: Option<u32>,
}

impl PartialTodosConfig {
    /// Fills keys unset in `self` from `fallback`.
    pub fn or(self, fallback: PartialTodosConfig) -> Self {
        Self {
            app_id: self.app_id.or(fallback.app_id),
            graphql_url: self.graphql_url.or(fallback.graphql_url),
            auth_url: self.auth_url.or(fallback.auth_url),
            request_timeout_secs: self.request_timeout_secs.or(fallback.request_timeout_secs),
            list_limit: self.list_limit.or(fallback.list_limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layering_prefers_first_source() {
        let env = PartialTodosConfig {
            app_id: Some("env-app".to_string()),
            ..Default::default()
        };
        let file = PartialTodosConfig {
            app_id: Some("file-app".to_string()),
            graphql_url: Some("https://example.test/graphql".to_string()),
            ..Default::default()
        };

        let merged = env.or(file);
        assert_eq!(merged.app_id.as_deref(), Some("env-app"));
        assert_eq!(merged.graphql_url.as_deref(), Some("https://example.test/graphql"));
        assert!(merged.auth_url.is_none());
    }

    #[test]
    fn test_new_applies_defaults() {
        let config = TodosConfig::new("app", "https://example.test/graphql");
        assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
        assert_eq!(config.list_limit, 100);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
