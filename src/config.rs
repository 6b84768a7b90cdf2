use std::time::Duration;

/// Default request timeout applied to every gateway call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Equipment header value used when no device id has been provisioned yet.
pub const DEFAULT_EQUIPMENT_ID: &str = "pcount-client";

const DEFAULT_V1_URL: &str = "https://api.pcount.io/api/v1";
const DEFAULT_V2_URL: &str = "https://api.pcount.io/api/v2";

/// Runtime configuration for the API gateway.
///
/// The upstream factory-management API is split across two generations of
/// base URLs; both are carried here so the routing table in [`crate::routes`]
/// can resolve each request against the right host. Values fall back from
/// environment variables to built-in defaults.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL for generation-1 endpoints (contract-scoped resources).
    pub v1_base_url: String,
    /// Base URL for generation-2 endpoints (account/authentication).
    pub v2_base_url: String,
    /// Per-request timeout. A request that exceeds this window is aborted.
    pub timeout: Duration,
}

impl ApiConfig {
    /// Build a config from `PCOUNT_API_V1_URL` / `PCOUNT_API_V2_URL` /
    /// `PCOUNT_API_TIMEOUT_MS`, falling back to the built-in defaults.
    pub fn from_env() -> Self {
        let v1_base_url =
            std::env::var("PCOUNT_API_V1_URL").unwrap_or_else(|_| DEFAULT_V1_URL.to_string());
        let v2_base_url =
            std::env::var("PCOUNT_API_V2_URL").unwrap_or_else(|_| DEFAULT_V2_URL.to_string());
        let timeout = std::env::var("PCOUNT_API_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT);

        // Same normalization as `new`, so an env value with a trailing slash
        // does not produce double-slash request URLs.
        Self::new(v1_base_url, v2_base_url).with_timeout(timeout)
    }

    /// Config pointing both generations at explicit base URLs.
    pub fn new(v1_base_url: impl Into<String>, v2_base_url: impl Into<String>) -> Self {
        Self {
            v1_base_url: trim_trailing_slash(v1_base_url.into()),
            v2_base_url: trim_trailing_slash(v2_base_url.into()),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_V1_URL, DEFAULT_V2_URL)
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
