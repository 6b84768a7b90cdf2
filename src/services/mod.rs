//! Domain services layered over the gateway.
//!
//! Each service owns a cloned [`ApiGateway`](crate::gateway::ApiGateway) and
//! translates between domain types and the upstream's wire shapes. Callers
//! handle gateway failures here; derivation never sees them.

pub mod auth;
pub mod contracts;
pub mod lines;
pub mod productions;
pub mod products;

pub use auth::AuthService;
pub use contracts::ContractService;
pub use lines::LineService;
pub use productions::ProductionService;
pub use products::ProductService;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ServiceError;

/// Decode a gateway response body into the shape a service expects.
pub(crate) fn decode<T: DeserializeOwned>(
    body: Option<Value>,
    what: &str,
) -> Result<T, ServiceError> {
    let value = body
        .ok_or_else(|| ServiceError::UnexpectedResponse(format!("Empty response from {what}")))?;
    serde_json::from_value(value)
        .map_err(|err| ServiceError::UnexpectedResponse(format!("{what}: {err}")))
}
