pub mod config;
pub mod errors;
pub mod fixtures;
pub mod gateway;
pub mod routes;
pub mod services;
pub mod session;
pub mod stats;
pub mod types;

pub use config::ApiConfig;
pub use errors::{ApiError, AuthError, ServiceError};
pub use gateway::ApiGateway;
pub use session::{CredentialStore, FileStore, MemoryStore};
pub use stats::derive_stats;
pub use types::{FallbackPolicy, ProductionStats};
