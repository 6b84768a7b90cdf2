//! Production-line listing.

use crate::errors::ServiceError;
use crate::fixtures;
use crate::gateway::ApiGateway;
use crate::routes::endpoints;
use crate::types::{FallbackPolicy, ProductionLine};

use super::decode;

#[derive(Debug, Clone)]
pub struct LineService {
    gateway: ApiGateway,
}

impl LineService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// List the production lines of a contract.
    ///
    /// With [`FallbackPolicy::FixtureOnError`] an upstream failure serves
    /// fixture data instead; the substitution is logged and never happens
    /// below this layer.
    pub async fn list(
        &self,
        contract_id: &str,
        policy: FallbackPolicy,
    ) -> Result<Vec<ProductionLine>, ServiceError> {
        let result = match self.gateway.get(&endpoints::lines(contract_id)).await {
            Ok(response) => decode(response, "line listing"),
            Err(err) => Err(err.into()),
        };

        match (result, policy) {
            (Ok(lines), _) => Ok(lines),
            (Err(err), FallbackPolicy::FixtureOnError) => {
                tracing::warn!(%err, contract_id, "Line listing failed, serving fixture data");
                Ok(fixtures::production_lines())
            }
            (Err(err), FallbackPolicy::Strict) => Err(err),
        }
    }
}
