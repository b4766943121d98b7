//! Client settings
//!
//! Deserialized from whatever hosts the engine (plugin settings,
//! config file). Credential issuance and session tokens are handled by
//! the host, not here.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use twinlens_core::{ConfigError, TwinResult};

const DEFAULT_CACHE_TTL_SECONDS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TwinSettings {
    /// Base URL of the remote twin service.
    pub endpoint: String,
    /// Default workspace queries are scoped to.
    pub workspace_id: String,
    /// Bearer token; omitted for anonymous/ambient auth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// TTL for the read cache. Sized to a UI refresh window.
    pub cache_ttl_seconds: u64,
}

impl Default for TwinSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            workspace_id: String::new(),
            auth_token: None,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}

impl TwinSettings {
    pub fn validate(&self) -> TwinResult<()> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "endpoint".to_string(),
            }
            .into());
        }
        if self.workspace_id.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "workspaceId".to_string(),
            }
            .into());
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "endpoint".to_string(),
                value: self.endpoint.clone(),
                reason: "must be an http(s) url".to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}
