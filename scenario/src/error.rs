//! Error types for scenarios.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for scenario operations.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Errors that can occur while configuring or running a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Failed to read a configuration file.
    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse a configuration file.
    #[error("failed to parse config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Failed to serialize a configuration.
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A configuration value is out of range.
    #[error("invalid config value for '{field}': {message}")]
    InvalidConfig { field: &'static str, message: String },

    /// Unknown preset name.
    #[error("unknown preset '{0}' (expected one of: baseline, slippage, per-tx-cap, circuit-breaker, twap)")]
    UnknownPreset(String),

    /// A transaction was aborted by a check.
    #[error(transparent)]
    Transaction(#[from] flashlab_transaction::TransactionError),

    /// A step left balances or reserves in an impossible state.
    #[error("consistency check failed: {0}")]
    Inconsistent(flashlab_transaction::TransactionError),

    /// A collaborator rejected an operation.
    #[error(transparent)]
    Defi(#[from] flashlab_defi::DefiError),
}

impl ScenarioError {
    pub fn config_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigRead {
            path: path.into(),
            source,
        }
    }

    pub fn config_parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// The reason a defense stopped the attack, if this error is one.
    ///
    /// Check rejections and a tripped circuit breaker are defenses. A failed
    /// consistency check and every other collaborator error are faults in
    /// the scenario itself.
    pub fn defense_reason(&self) -> Option<String> {
        match self {
            Self::Transaction(e) => Some(e.reason().to_string()),
            Self::Defi(e @ flashlab_defi::DefiError::CircuitBreakerTripped { .. }) => {
                Some(e.to_string())
            }
            _ => None,
        }
    }
}
