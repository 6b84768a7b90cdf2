//! Authentication flows.

use serde::Deserialize;
use serde_json::json;

use crate::errors::AuthError;
use crate::gateway::ApiGateway;
use crate::routes::endpoints;
use crate::types::User;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: User,
    token: Option<String>,
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    user: User,
}

/// Login, logout, and session validation against the v2 account endpoints.
#[derive(Debug, Clone)]
pub struct AuthService {
    gateway: ApiGateway,
}

impl AuthService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Authenticate with email and password, persisting the returned token
    /// pair. Failures map to distinct conditions so the caller can tell
    /// invalid credentials from connectivity from server trouble.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let body = json!({ "email": email, "password": password });
        let response = self
            .gateway
            .post(endpoints::LOGIN, Some(body))
            .await
            .map_err(AuthError::from_login_failure)?;

        let value = response.ok_or(AuthError::InvalidCredentials)?;
        let login: LoginResponse = serde_json::from_value(value)
            .map_err(|err| AuthError::Other(crate::errors::ApiError::Decode(err)))?;

        if let Some(token) = &login.token {
            self.gateway.store().set_access_token(token).await;
            if let Some(refresh) = &login.refresh_token {
                self.gateway.store().set_refresh_token(refresh).await;
            }
        }

        tracing::debug!(user = %login.user.email, "Login succeeded");
        Ok(login.user)
    }

    /// End the session. Local credentials are cleared even when the server
    /// call fails; the upstream session simply outlives us in that case.
    pub async fn logout(&self) {
        if let Err(err) = self.gateway.post(endpoints::LOGOUT, None).await {
            tracing::warn!(%err, "Server logout failed, clearing local session anyway");
        }
        self.gateway.store().clear().await;
    }

    /// Check whether the stored session is still valid upstream. Any failure
    /// reads as "not authenticated".
    pub async fn validate_session(&self) -> Option<User> {
        let response = self.gateway.get(endpoints::ME).await.ok()??;
        let me: MeResponse = serde_json::from_value(response).ok()?;
        Some(me.user)
    }
}
