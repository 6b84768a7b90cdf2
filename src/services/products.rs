//! Product catalog lookups.

use crate::errors::ServiceError;
use crate::gateway::ApiGateway;
use crate::routes::endpoints;
use crate::types::{PalletFormation, Product};

use super::decode;

#[derive(Debug, Clone)]
pub struct ProductService {
    gateway: ApiGateway,
}

impl ProductService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// List the products registered under a contract.
    pub async fn list(&self, contract_id: &str) -> Result<Vec<Product>, ServiceError> {
        let response = self.gateway.get(&endpoints::products(contract_id)).await?;
        decode(response, "product listing")
    }

    /// List the pallet formations (units per pallet) of a contract.
    pub async fn pallet_formations(
        &self,
        contract_id: &str,
    ) -> Result<Vec<PalletFormation>, ServiceError> {
        let response = self
            .gateway
            .get(&endpoints::pallet_formations(contract_id))
            .await?;
        decode(response, "pallet formation listing")
    }

    /// Look a product up by its code. The upstream has no by-code endpoint,
    /// so this filters the contract's product listing client-side.
    pub async fn find_by_code(
        &self,
        contract_id: &str,
        code: &str,
    ) -> Result<Option<Product>, ServiceError> {
        let products = self.list(contract_id).await?;
        Ok(products.into_iter().find(|p| p.code == code))
    }
}
