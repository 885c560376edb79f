//! Configuration service implementation.
//!
//! Resolves [`TodosConfig`] at startup from environment variables layered over
//! an optional `config.toml` (~/.config/todos/config.toml). The application id
//! and the GraphQL endpoint have no built-in fallback: if neither source
//! provides them, loading fails.

use crate::paths::TodosPaths;
use std::path::Path;
use todos_core::config::{
    DEFAULT_AUTH_URL, DEFAULT_REQUEST_TIMEOUT_SECS, PartialTodosConfig, TodosConfig,
};
use todos_core::todo::DEFAULT_LIST_LIMIT;
use todos_core::{Result, TodosError};

pub const ENV_APP_ID: &str = "TODOS_APP_ID";
pub const ENV_GRAPHQL_URL: &str = "TODOS_GRAPHQL_URL";
pub const ENV_AUTH_URL: &str = "TODOS_AUTH_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "TODOS_REQUEST_TIMEOUT_SECS";
pub const ENV_LIST_LIMIT: &str = "TODOS_LIST_LIMIT";

/// Loads the client configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigService {
    paths: TodosPaths,
}

impl ConfigService {
    pub fn new(paths: TodosPaths) -> Self {
        Self { paths }
    }

    /// Loads configuration from the process environment and the config file.
    pub fn load(&self) -> Result<TodosConfig> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Loads configuration using `lookup` in place of the process environment.
    pub fn load_with<F>(&self, lookup: F) -> Result<TodosConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = Self::from_env(lookup)?;

        let from_file = match self.paths.config_file() {
            Ok(path) => Self::from_file(&path)?,
            Err(e) => {
                tracing::debug!("[Config] Skipping config file: {}", e);
                PartialTodosConfig::default()
            }
        };

        Self::resolve(from_env.or(from_file))
    }

    fn from_env<F>(lookup: F) -> Result<PartialTodosConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(PartialTodosConfig {
            app_id: get(ENV_APP_ID),
            graphql_url: get(ENV_GRAPHQL_URL),
            auth_url: get(ENV_AUTH_URL),
            request_timeout_secs: get(ENV_REQUEST_TIMEOUT_SECS)
                .map(|raw| parse_number(ENV_REQUEST_TIMEOUT_SECS, &raw))
                .transpose()?,
            list_limit: get(ENV_LIST_LIMIT)
                .map(|raw| parse_number(ENV_LIST_LIMIT, &raw))
                .transpose()?,
        })
    }

    fn from_file(path: &Path) -> Result<PartialTodosConfig> {
        if !path.exists() {
            return Ok(PartialTodosConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        let partial: PartialTodosConfig = toml::from_str(&content)?;
        tracing::debug!("[Config] Loaded {}", path.display());
        Ok(partial)
    }

    fn resolve(partial: PartialTodosConfig) -> Result<TodosConfig> {
        let app_id = partial.app_id.ok_or_else(|| {
            TodosError::config(format!(
                "{ENV_APP_ID} is not set (environment or config.toml `app_id`)"
            ))
        })?;
        let graphql_url = partial.graphql_url.ok_or_else(|| {
            TodosError::config(format!(
                "{ENV_GRAPHQL_URL} is not set (environment or config.toml `graphql_url`)"
            ))
        })?;

        if !graphql_url.starts_with("http://") && !graphql_url.starts_with("https://") {
            return Err(TodosError::config(format!(
                "{ENV_GRAPHQL_URL} must be an http(s) URL, got '{graphql_url}'"
            )));
        }

        let auth_url = partial.auth_url.unwrap_or_else(|| {
            tracing::debug!("[Config] Using default identity service {}", DEFAULT_AUTH_URL);
            DEFAULT_AUTH_URL.to_string()
        });

        Ok(TodosConfig {
            app_id,
            graphql_url: graphql_url.trim_end_matches('/').to_string(),
            auth_url: auth_url.trim_end_matches('/').to_string(),
            request_timeout_secs: partial
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            list_limit: partial.list_limit.unwrap_or(DEFAULT_LIST_LIMIT),
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| TodosError::config(format!("{key} must be a positive integer, got '{raw}'")))
}
