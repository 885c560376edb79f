//! Anonymous session management.
//!
//! [`CredentialManager`] owns the one anonymous session of the process. It is
//! created without a session and logs in lazily on the first token request.
//!
//! The session sits behind an async mutex that stays locked for the whole
//! login or refresh exchange. Callers racing the first login therefore wait
//! for that single login instead of creating extra anonymous users, and
//! callers arriving during a refresh receive the renewed token.

use crate::transport::{HttpRequest, HttpTransport};
use serde::Deserialize;
use std::sync::Arc;
use todos_core::config::TodosConfig;
use todos_core::{Result, TodosError};
use tokio::sync::Mutex;

/// Observable lifecycle of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No login has succeeded yet (or the last refresh failed).
    Uninitialized,
    Authenticated,
}

#[derive(Clone)]
struct AnonymousSession {
    user_id: String,
    access_token: String,
    refresh_token: String,
}

enum SessionState {
    Uninitialized,
    Authenticated(AnonymousSession),
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
    user_id: String,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// Obtains and refreshes the anonymous access token.
pub struct CredentialManager {
    transport: Arc<dyn HttpTransport>,
    auth_url: String,
    app_id: String,
    state: Mutex<SessionState>,
}

impl CredentialManager {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth_url: impl Into<String>,
        app_id: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            auth_url: auth_url.into().trim_end_matches('/').to_string(),
            app_id: app_id.into(),
            state: Mutex::new(SessionState::Uninitialized),
        }
    }

    pub fn from_config(transport: Arc<dyn HttpTransport>, config: &TodosConfig) -> Self {
        Self::new(transport, &config.auth_url, &config.app_id)
    }

    /// Anonymous login endpoint of the configured application.
    pub fn login_url(&self) -> String {
        format!(
            "{}/api/client/v2.0/app/{}/auth/providers/anon-user/login",
            self.auth_url, self.app_id
        )
    }

    /// Session refresh endpoint.
    pub fn refresh_url(&self) -> String {
        format!("{}/api/client/v2.0/auth/session", self.auth_url)
    }

    /// Returns the current access token, logging in first if needed.
    pub async fn get_token(&self) -> Result<String> {
        let mut state = self.state.lock().await;

        if let SessionState::Authenticated(session) = &*state {
            return Ok(session.access_token.clone());
        }

        let session = self.login().await?;
        let token = session.access_token.clone();
        *state = SessionState::Authenticated(session);
        Ok(token)
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// `stale_token` is the token the server just rejected. If the session
    /// already carries a different token, another caller refreshed in the
    /// meantime and that token is returned without a network call.
    ///
    /// A failed refresh discards the session, so the next [`get_token`]
    /// starts over with a fresh login.
    ///
    /// [`get_token`]: CredentialManager::get_token
    pub async fn refresh(&self, stale_token: &str) -> Result<String> {
        let mut state = self.state.lock().await;

        let session = match &*state {
            SessionState::Authenticated(session) => session.clone(),
            SessionState::Uninitialized => {
                return Err(TodosError::auth("Cannot refresh: no active session"));
            }
        };

        if session.access_token != stale_token {
            tracing::debug!("[Credentials] Token already refreshed by another request");
            return Ok(session.access_token);
        }

        match self.exchange_refresh_token(&session.refresh_token).await {
            Ok(access_token) => {
                tracing::info!("[Credentials] Access token refreshed");
                *state = SessionState::Authenticated(AnonymousSession {
                    access_token: access_token.clone(),
                    ..session
                });
                Ok(access_token)
            }
            Err(e) => {
                tracing::warn!("[Credentials] Refresh failed, dropping session: {}", e);
                *state = SessionState::Uninitialized;
                Err(e)
            }
        }
    }

    pub async fn phase(&self) -> SessionPhase {
        match &*self.state.lock().await {
            SessionState::Uninitialized => SessionPhase::Uninitialized,
            SessionState::Authenticated(_) => SessionPhase::Authenticated,
        }
    }

    /// Id of the anonymous user, once logged in.
    pub async fn user_id(&self) -> Option<String> {
        match &*self.state.lock().await {
            SessionState::Authenticated(session) => Some(session.user_id.clone()),
            SessionState::Uninitialized => None,
        }
    }

    async fn login(&self) -> Result<AnonymousSession> {
        tracing::debug!("[Credentials] Logging in anonymously");

        let response = self
            .transport
            .post_json(HttpRequest::new(self.login_url(), serde_json::json!({})))
            .await
            .map_err(|e| TodosError::auth(format!("Anonymous login failed: {}", e)))?;

        if !response.is_success() {
            return Err(TodosError::auth(format!(
                "Anonymous login rejected ({}): {}",
                response.status,
                response.body_excerpt()
            )));
        }

        let login: LoginResponse = response
            .json()
            .map_err(|e| TodosError::auth(format!("Invalid login response: {}", e)))?;

        tracing::info!("[Credentials] Anonymous session established for user {}", login.user_id);
        Ok(AnonymousSession {
            user_id: login.user_id,
            access_token: login.access_token,
            refresh_token: login.refresh_token,
        })
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<String> {
        let response = self
            .transport
            .post_json(
                HttpRequest::new(self.refresh_url(), serde_json::json!({}))
                    .with_bearer(refresh_token),
            )
            .await
            .map_err(|e| TodosError::auth(format!("Token refresh failed: {}", e)))?;

        if !response.is_success() {
            return Err(TodosError::auth(format!(
                "Token refresh rejected ({}): {}",
                response.status,
                response.body_excerpt()
            )));
        }

        let refreshed: RefreshResponse = response
            .json()
            .map_err(|e| TodosError::auth(format!("Invalid refresh response: {}", e)))?;
        Ok(refreshed.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpResponse;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl HttpTransport for Unreachable {
        async fn post_json(&self, _request: HttpRequest) -> Result<HttpResponse> {
            Err(TodosError::request(None, "connection refused"))
        }
    }

    #[test]
    fn test_endpoint_urls() {
        let manager = CredentialManager::new(
            Arc::new(Unreachable),
            "https://realm.example.test/",
            "todo-app-xyz",
        );

        assert_eq!(
            manager.login_url(),
            "https://realm.example.test/api/client/v2.0/app/todo-app-xyz/auth/providers/anon-user/login"
        );
        assert_eq!(
            manager.refresh_url(),
            "https://realm.example.test/api/client/v2.0/auth/session"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_during_login_is_auth_error() {
        let manager = CredentialManager::new(Arc::new(Unreachable), "https://x.test", "app");

        let err = manager.get_token().await.unwrap_err();
        assert!(err.is_auth());
        assert_eq!(manager.phase().await, SessionPhase::Uninitialized);
    }

    #[tokio::test]
    async fn test_refresh_without_session_is_auth_error() {
        let manager = CredentialManager::new(Arc::new(Unreachable), "https://x.test", "app");

        let err = manager.refresh("anything").await.unwrap_err();
        assert!(err.is_auth());
    }
}
