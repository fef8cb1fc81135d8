//! Configuration
//!
//! Layered with the `config` crate: built-in defaults, then the global file,
//! then the workspace file, then `DESIGN_TREE__*` environment variables.

pub mod loader;
pub mod paths;
pub mod sources;
pub mod storage;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

pub use loader::ConfigLoader;
pub use storage::StorageConfig;

/// Edit session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum snapshots kept for undo/redo
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Delete replaced and removed assets after a successful commit
    #[serde(default = "default_true")]
    pub collect_garbage: bool,
}

fn default_history_limit() -> usize {
    100
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            collect_garbage: default_true(),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl DesignConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.session.history_limit == 0 {
            return Err(ApiError::ConfigError(
                "session.history_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to serialize config: {}", e)))
    }
}
