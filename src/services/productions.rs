//! Production runs and dashboard statistics.

use serde_json::json;

use crate::errors::ServiceError;
use crate::fixtures;
use crate::gateway::ApiGateway;
use crate::routes::endpoints;
use crate::stats::derive_stats;
use crate::types::{
    DashboardResponse, DashboardSearch, FallbackPolicy, Production, ProductionDraft,
    ProductionFilters, ProductionStats,
};

use super::decode;

#[derive(Debug, Clone)]
pub struct ProductionService {
    gateway: ApiGateway,
}

impl ProductionService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// List production runs for a contract, optionally filtered.
    pub async fn list(
        &self,
        contract_id: &str,
        filters: &ProductionFilters,
        policy: FallbackPolicy,
    ) -> Result<Vec<Production>, ServiceError> {
        let path = with_query(endpoints::productions(contract_id), filters)?;
        let result = match self.gateway.get(&path).await {
            Ok(response) => decode(response, "production listing"),
            Err(err) => Err(err.into()),
        };

        match (result, policy) {
            (Ok(productions), _) => Ok(productions),
            (Err(err), FallbackPolicy::FixtureOnError) => {
                tracing::warn!(%err, contract_id, "Production listing failed, serving fixture data");
                Ok(fixtures::productions())
            }
            (Err(err), FallbackPolicy::Strict) => Err(err),
        }
    }

    /// Start a new production run.
    pub async fn create(
        &self,
        contract_id: &str,
        draft: &ProductionDraft,
    ) -> Result<Production, ServiceError> {
        let body = serde_json::to_value(draft)
            .map_err(|err| ServiceError::UnexpectedResponse(err.to_string()))?;
        let response = self
            .gateway
            .post(&endpoints::production_create(contract_id), Some(body))
            .await?;
        decode(response, "production create")
    }

    /// Update an in-progress production run.
    pub async fn update(
        &self,
        contract_id: &str,
        production: &Production,
    ) -> Result<Production, ServiceError> {
        let body = serde_json::to_value(production)
            .map_err(|err| ServiceError::UnexpectedResponse(err.to_string()))?;
        let response = self
            .gateway
            .put(&endpoints::production_update(contract_id), Some(body))
            .await?;
        decode(response, "production update")
    }

    /// Close a production run.
    pub async fn finish(
        &self,
        contract_id: &str,
        production_id: &str,
    ) -> Result<Production, ServiceError> {
        let response = self
            .gateway
            .put(
                &endpoints::production_finish(contract_id),
                Some(json!({ "id": production_id })),
            )
            .await?;
        decode(response, "production finish")
    }

    /// Fetch and normalize the dashboard statistics for a contract.
    ///
    /// Preconditions are checked before any network call: the search must
    /// carry a user id and at least one line id, since the upstream reads an
    /// empty line list as "no scope" rather than "all scope". Callers wanting
    /// "all lines" enumerate them explicitly first.
    pub async fn dashboard_stats(
        &self,
        contract_id: &str,
        search: &DashboardSearch,
        policy: FallbackPolicy,
    ) -> Result<ProductionStats, ServiceError> {
        if search.usuario_id.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Dashboard search requires a user id".to_string(),
            ));
        }
        if search.circuito_ids.is_empty() {
            return Err(ServiceError::Validation(
                "Dashboard search requires at least one line id".to_string(),
            ));
        }

        let body = serde_json::to_value(search)
            .map_err(|err| ServiceError::UnexpectedResponse(err.to_string()))?;
        let raw = match self
            .gateway
            .post(&endpoints::dashboard_search(contract_id), Some(body))
            .await
        {
            // An empty body is a valid "no data" answer; derivation turns it
            // into zeroed statistics.
            Ok(response) => match response {
                Some(value) => serde_json::from_value::<DashboardResponse>(value)
                    .map_err(|err| ServiceError::UnexpectedResponse(err.to_string()))?,
                None => DashboardResponse::default(),
            },
            Err(err) if policy == FallbackPolicy::FixtureOnError => {
                tracing::warn!(%err, contract_id, "Dashboard search failed, serving fixture data");
                return Ok(fixtures::production_stats());
            }
            Err(err) => return Err(err.into()),
        };

        Ok(derive_stats(&raw))
    }
}

/// Append the set filters as a form-urlencoded query string. Encoding goes
/// through serde so values with spaces or reserved characters survive intact.
fn with_query(path: String, filters: &ProductionFilters) -> Result<String, ServiceError> {
    let query = serde_urlencoded::to_string(filters)
        .map_err(|err| ServiceError::Validation(format!("Invalid listing filters: {err}")))?;
    if query.is_empty() {
        Ok(path)
    } else {
        Ok(format!("{}?{}", path, query))
    }
}
