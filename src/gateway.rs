//! API gateway client.
//!
//! Single chokepoint for every upstream call: resolves the versioned base
//! URL, attaches auth/device headers from the credential store, enforces the
//! request timeout, and runs the bounded 401 protocol (attempt, refresh,
//! retry once, fail). Errors are normalized into [`ApiError`]; nothing is
//! swallowed.

use std::sync::Arc;

use reqwest::{Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::config::{ApiConfig, DEFAULT_EQUIPMENT_ID};
use crate::errors::ApiError;
use crate::routes::{self, endpoints};
use crate::session::CredentialStore;

/// Outcome of a single dispatch, before the 401 protocol is applied.
enum Dispatched {
    Done(Option<Value>),
    /// 401 received. Carries the token the request was sent with, so the
    /// refresh path can tell whether another task already replaced it.
    Unauthorized { stale_token: Option<String> },
}

/// HTTP client for the PCount factory-management API.
///
/// Cheap to clone; clones share the connection pool, the credential store,
/// and the refresh lock.
#[derive(Clone)]
pub struct ApiGateway {
    client: Client,
    config: Arc<ApiConfig>,
    store: Arc<dyn CredentialStore>,
    refresh_lock: Arc<Mutex<()>>,
}

impl ApiGateway {
    pub fn new(config: ApiConfig, store: Arc<dyn CredentialStore>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config: Arc::new(config),
            store,
            refresh_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub async fn get(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<Option<Value>, ApiError> {
        self.request(Method::POST, path, body).await
    }

    pub async fn put(&self, path: &str, body: Option<Value>) -> Result<Option<Value>, ApiError> {
        self.request(Method::PUT, path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.request(Method::DELETE, path, None).await
    }

    /// Issue a request against the version-resolved base URL.
    ///
    /// Returns `Ok(None)` for 204/empty responses, the parsed JSON body
    /// otherwise. Schema validation is the caller's responsibility. On 401
    /// the refresh protocol runs and the request is re-issued exactly once
    /// with the refreshed token.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<Value>, ApiError> {
        match self.dispatch(&method, path, body.as_ref()).await? {
            Dispatched::Done(value) => Ok(value),
            Dispatched::Unauthorized { stale_token } => {
                self.refresh_session(stale_token.as_deref()).await?;
                // Headers are rebuilt from the store, picking up the new token.
                match self.dispatch(&method, path, body.as_ref()).await? {
                    Dispatched::Done(value) => Ok(value),
                    Dispatched::Unauthorized { .. } => {
                        tracing::warn!(path, "Still unauthorized after refresh, clearing session");
                        self.store.clear().await;
                        Err(ApiError::SessionExpired)
                    }
                }
            }
        }
    }

    async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Dispatched, ApiError> {
        let url = routes::resolve_url(&self.config, path);
        let token = self.store.access_token().await;
        let equipment = self
            .store
            .device_id()
            .await
            .unwrap_or_else(|| DEFAULT_EQUIPMENT_ID.to_string());

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .header("equipamentoId", equipment)
            .timeout(self.config.timeout);
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, %url, "Dispatching request");
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Ok(Dispatched::Unauthorized { stale_token: token });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Dispatched::Done(None));
        }
        if !status.is_success() {
            let message = extract_error_message(response).await;
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await.map_err(map_transport_error)?;
        if text.is_empty() {
            return Ok(Dispatched::Done(None));
        }
        let value = serde_json::from_str(&text).map_err(ApiError::Decode)?;
        Ok(Dispatched::Done(Some(value)))
    }

    /// Refresh the session, coalescing concurrent attempts.
    ///
    /// The lock serializes refreshes; a waiter that finds the stale token it
    /// saw already replaced returns without a network call, so N concurrent
    /// 401s produce exactly one refresh request. An irrecoverable refresh
    /// clears all stored credentials.
    async fn refresh_session(&self, stale_token: Option<&str>) -> Result<(), ApiError> {
        let _guard = self.refresh_lock.lock().await;

        let current = self.store.access_token().await;
        if current.is_some() && current.as_deref() != stale_token {
            return Ok(());
        }

        match self.refresh_once().await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!(%err, "Token refresh failed, clearing session");
                self.store.clear().await;
                Err(ApiError::SessionExpired)
            }
        }
    }

    /// One refresh attempt against the v2 refresh endpoint. No stored
    /// refresh token fails immediately without touching the network.
    async fn refresh_once(&self) -> anyhow::Result<()> {
        #[derive(Deserialize)]
        struct RefreshResponse {
            token: Option<String>,
            #[serde(rename = "refreshToken")]
            refresh_token: Option<String>,
        }

        let Some(refresh_token) = self.store.refresh_token().await else {
            anyhow::bail!("No refresh token stored");
        };

        let url = routes::resolve_url(&self.config, endpoints::REFRESH);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.config.timeout)
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await?
            .error_for_status()?;

        let parsed: RefreshResponse = response.json().await?;
        let Some(token) = parsed.token else {
            anyhow::bail!("Refresh response carried no access token");
        };

        self.store.set_access_token(&token).await;
        if let Some(refresh) = parsed.refresh_token {
            self.store.set_refresh_token(&refresh).await;
        }
        tracing::debug!("Session token refreshed");
        Ok(())
    }
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("v1_base_url", &self.config.v1_base_url)
            .field("v2_base_url", &self.config.v2_base_url)
            .finish_non_exhaustive()
    }
}

fn map_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(err)
    }
}

/// Pull a human-readable message out of an error response body, if the
/// server provided one.
async fn extract_error_message(response: Response) -> Option<String> {
    let body: Value = response.json().await.ok()?;
    for key in ["message", "error"] {
        if let Some(text) = body.get(key).and_then(Value::as_str) {
            return Some(text.to_string());
        }
    }
    None
}
