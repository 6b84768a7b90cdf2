//! Session context storage.
//!
//! The active session (token pair, selected contract, device id) is
//! process-wide mutable state owned by a [`CredentialStore`]. The gateway
//! only reads it per request and writes the token pair back after a refresh;
//! login, logout and contract selection are the other writers. The trait is
//! injectable so tests can substitute [`MemoryStore`] and assert on exact
//! read/write sequences.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::types::Contract;

/// Read/write access to the active session context.
///
/// `clear` wipes the token pair and the selected contract but keeps the
/// device id: that identifier is stable per installation, generated once.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn access_token(&self) -> Option<String>;
    async fn set_access_token(&self, token: &str);
    async fn refresh_token(&self) -> Option<String>;
    async fn set_refresh_token(&self, token: &str);
    async fn contract_id(&self) -> Option<String>;
    async fn contract(&self) -> Option<Contract>;
    async fn set_contract(&self, contract: &Contract);
    async fn device_id(&self) -> Option<String>;
    async fn clear(&self);
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    contract: Option<Contract>,
    device_id: Option<String>,
}

/// In-memory credential store. The substitute used by tests and by hosts
/// that manage persistence themselves.
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<SessionState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SessionState {
                device_id: Some(uuid::Uuid::new_v4().to_string()),
                ..SessionState::default()
            }),
        }
    }

    /// Store primed with a token pair, for session-restore scenarios.
    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        Self {
            state: RwLock::new(SessionState {
                access_token: Some(access.to_string()),
                refresh_token: Some(refresh.to_string()),
                contract: None,
                device_id: Some(uuid::Uuid::new_v4().to_string()),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    async fn set_access_token(&self, token: &str) {
        self.state.write().await.access_token = Some(token.to_string());
    }

    async fn refresh_token(&self) -> Option<String> {
        self.state.read().await.refresh_token.clone()
    }

    async fn set_refresh_token(&self, token: &str) {
        self.state.write().await.refresh_token = Some(token.to_string());
    }

    async fn contract_id(&self) -> Option<String> {
        self.state.read().await.contract.as_ref().map(|c| c.id.clone())
    }

    async fn contract(&self) -> Option<Contract> {
        self.state.read().await.contract.clone()
    }

    async fn set_contract(&self, contract: &Contract) {
        self.state.write().await.contract = Some(contract.clone());
    }

    async fn device_id(&self) -> Option<String> {
        self.state.read().await.device_id.clone()
    }

    async fn clear(&self) {
        let mut state = self.state.write().await;
        let device_id = state.device_id.take();
        *state = SessionState {
            device_id,
            ..SessionState::default()
        };
    }
}

/// File-backed credential store.
///
/// Platforms without secure storage fall back to an ordinary persisted
/// key-value document, transparently to the gateway. The session lives in a
/// JSON file under the platform data directory; the device id is generated on
/// first load and persisted for the lifetime of the installation. Storage
/// failures are logged and degrade to in-memory behavior rather than failing
/// the request that triggered the write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: RwLock<SessionState>,
}

impl FileStore {
    /// Open (or create) the store at the default platform location.
    pub fn open_default() -> anyhow::Result<Self> {
        let dir = dirs::data_dir()
            .context("No platform data directory available")?
            .join("pcount");
        Self::open(dir.join("session.json"))
    }

    /// Open (or create) the store at an explicit path.
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let mut state = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "Corrupt session file, starting fresh");
                SessionState::default()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => SessionState::default(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read session file {}", path.display()));
            }
        };

        if state.device_id.is_none() {
            state.device_id = Some(uuid::Uuid::new_v4().to_string());
        }

        let snapshot = state.clone();
        let store = Self {
            path,
            state: RwLock::new(state),
        };
        // Write back immediately so a freshly generated device id survives
        // restarts. `open` may run before any runtime exists, so this one
        // write stays blocking.
        if let Err(err) = write_state_blocking(&store.path, &snapshot) {
            tracing::warn!(path = %store.path.display(), %err, "Failed to persist session");
        }
        Ok(store)
    }

    async fn persist(&self) {
        let state = self.state.read().await.clone();
        if let Err(err) = write_state(&self.path, &state).await {
            tracing::warn!(path = %self.path.display(), %err, "Failed to persist session");
        }
    }
}

async fn write_state(path: &Path, state: &SessionState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(state).context("Failed to encode session")?;
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn write_state_blocking(path: &Path, state: &SessionState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(state).context("Failed to encode session")?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[async_trait]
impl CredentialStore for FileStore {
    async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    async fn set_access_token(&self, token: &str) {
        self.state.write().await.access_token = Some(token.to_string());
        self.persist().await;
    }

    async fn refresh_token(&self) -> Option<String> {
        self.state.read().await.refresh_token.clone()
    }

    async fn set_refresh_token(&self, token: &str) {
        self.state.write().await.refresh_token = Some(token.to_string());
        self.persist().await;
    }

    async fn contract_id(&self) -> Option<String> {
        self.state.read().await.contract.as_ref().map(|c| c.id.clone())
    }

    async fn contract(&self) -> Option<Contract> {
        self.state.read().await.contract.clone()
    }

    async fn set_contract(&self, contract: &Contract) {
        self.state.write().await.contract = Some(contract.clone());
        self.persist().await;
    }

    async fn device_id(&self) -> Option<String> {
        self.state.read().await.device_id.clone()
    }

    async fn clear(&self) {
        {
            let mut state = self.state.write().await;
            let device_id = state.device_id.take();
            *state = SessionState {
                device_id,
                ..SessionState::default()
            };
        }
        self.persist().await;
    }
}
