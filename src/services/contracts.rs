//! Contract listing and selection.

use crate::errors::ServiceError;
use crate::gateway::ApiGateway;
use crate::routes::endpoints;
use crate::types::Contract;

use super::decode;

/// Contracts scope every other resource; one must be selected after login.
#[derive(Debug, Clone)]
pub struct ContractService {
    gateway: ApiGateway,
}

impl ContractService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// List the contracts the authenticated user may operate under.
    pub async fn list(&self) -> Result<Vec<Contract>, ServiceError> {
        let response = self.gateway.get(endpoints::CONTRACTS).await?;
        decode(response, "contract listing")
    }

    /// Make a contract the active scope for subsequent requests.
    pub async fn select(&self, contract: &Contract) {
        self.gateway.store().set_contract(contract).await;
        tracing::debug!(contract = %contract.id, "Contract selected");
    }

    /// The currently selected contract, if any.
    pub async fn selected(&self) -> Option<Contract> {
        self.gateway.store().contract().await
    }
}
