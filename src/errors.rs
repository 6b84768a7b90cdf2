//! Typed error hierarchy for the PCount client.
//!
//! Three top-level enums cover the three layers:
//! - `ApiError` — gateway/transport failures
//! - `ServiceError` — domain-service failures (validation + gateway)
//! - `AuthError` — authentication failures with user-facing messages

use thiserror::Error;

/// Errors produced by the API gateway. Every failure path of a gateway call
/// maps to exactly one of these variants; nothing is swallowed.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: no response at all. Distinct from an HTTP
    /// error status so callers can offer "check your connection" messaging.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// No response within the configured timeout window.
    #[error("Request timed out")]
    Timeout,

    /// Non-2xx, non-401 response. Message is extracted from the response body
    /// when the server provided one.
    #[error("{}", http_display(.status, .message))]
    Http {
        status: u16,
        message: Option<String>,
    },

    /// A 401 that survived a refresh attempt (or had no refresh token to
    /// try). Stored credentials have already been cleared when this is
    /// returned; the caller must route the user back to authentication.
    #[error("Session expired")]
    SessionExpired,

    /// A 2xx response whose body was not valid JSON.
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Errors from the domain services layered over the gateway.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A caller-side precondition failed; the gateway was never invoked.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The response body did not carry the shape the service expected.
    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Authentication failures, mapped to distinct, actionable conditions rather
/// than one generic failure string.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Login timed out, try again")]
    Timeout,

    #[error("Could not reach the server, check your connection")]
    Network,

    #[error("Server error during login (status {status})")]
    Server { status: u16 },

    #[error(transparent)]
    Other(#[from] ApiError),
}

fn http_display(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("HTTP error, status {status}: {message}"),
        None => format!("HTTP error, status {status}"),
    }
}

impl AuthError {
    /// Map a gateway failure during login to its user-facing condition.
    pub fn from_login_failure(err: ApiError) -> Self {
        match err {
            ApiError::Http { status: 401, .. } | ApiError::SessionExpired => {
                AuthError::InvalidCredentials
            }
            ApiError::Timeout => AuthError::Timeout,
            ApiError::Network(_) => AuthError::Network,
            ApiError::Http { status, .. } if status >= 500 => AuthError::Server { status },
            other => AuthError::Other(other),
        }
    }
}
