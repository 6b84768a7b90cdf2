//! Endpoint-to-version routing.
//!
//! The upstream API split its capabilities across two generations of base
//! URLs. Which endpoints live where is a fixed property of the upstream
//! deployment, so the mapping is a static ordered table evaluated first match
//! wins, with an explicit V1 default for everything unmatched. Keeping it as
//! data (rather than conditionals) keeps the split auditable.

use crate::config::ApiConfig;

/// API generation a request is routed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V2,
}

/// Ordered (prefix, version) pairs. Only the account endpoints moved to the
/// v2 host; contract-scoped resources all stayed on v1.
const VERSION_TABLE: &[(&str, ApiVersion)] = &[("/Account/", ApiVersion::V2)];

/// Resolve the API generation for an endpoint path. Total: unmatched paths
/// default to V1.
pub fn resolve_version(path: &str) -> ApiVersion {
    VERSION_TABLE
        .iter()
        .find(|(prefix, _)| path.starts_with(prefix))
        .map(|(_, version)| *version)
        .unwrap_or(ApiVersion::V1)
}

/// Resolve the full URL for an endpoint path against the configured hosts.
pub fn resolve_url(config: &ApiConfig, path: &str) -> String {
    let base = match resolve_version(path) {
        ApiVersion::V1 => &config.v1_base_url,
        ApiVersion::V2 => &config.v2_base_url,
    };
    format!("{}{}", base, path)
}

pub mod endpoints {
    //! Endpoint path constructors. Contract-scoped v1 resources follow the
    //! upstream `/{ResourceType}/{contractId}/{Action}` convention.

    pub const LOGIN: &str = "/Account/Login";
    pub const LOGOUT: &str = "/Account/Logout";
    pub const ME: &str = "/Account/Me";
    pub const REFRESH: &str = "/Account/RefreshToken";

    pub const CONTRACTS: &str = "/Contrato/List";

    pub fn lines(contract_id: &str) -> String {
        format!("/Circuito/{}/List", contract_id)
    }

    pub fn productions(contract_id: &str) -> String {
        format!("/Producao/{}/List", contract_id)
    }

    pub fn production_create(contract_id: &str) -> String {
        format!("/Producao/{}/Create", contract_id)
    }

    pub fn production_update(contract_id: &str) -> String {
        format!("/Producao/{}/Update", contract_id)
    }

    pub fn production_finish(contract_id: &str) -> String {
        format!("/Producao/{}/Finish", contract_id)
    }

    pub fn dashboard_search(contract_id: &str) -> String {
        format!("/Dashboard/{}/Search", contract_id)
    }

    pub fn products(contract_id: &str) -> String {
        format!("/Produto/{}/List", contract_id)
    }

    pub fn pallet_formations(contract_id: &str) -> String {
        format!("/Produto/{}/FormacaoPalete", contract_id)
    }
}
