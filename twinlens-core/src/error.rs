//! Error types for twinlens operations

use thiserror::Error;

/// Query validation errors. These abort the whole operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Missing workspace parameter")]
    MissingWorkspaceId,

    #[error("Missing entity parameter")]
    MissingEntityId,

    #[error("Missing component type parameter")]
    MissingComponentTypeId,

    #[error("Invalid query: {reason}")]
    Invalid { reason: String },
}

/// Remote client errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("Transport error during {operation}: {message}")]
    Transport { operation: String, message: String },

    #[error("Request {operation} failed with status {status}: {message}")]
    RequestFailed {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("Invalid response from {operation}: {reason}")]
    InvalidResponse { operation: String, reason: String },
}

impl ClientError {
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// History timestamp parse errors. Malformed time strings are reported,
/// never replaced with a zero-time fallback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Empty history timestamp")]
    Empty,

    #[error("Invalid history timestamp {input:?}: {reason}")]
    Malformed { input: String, reason: String },
}

/// Identity resolution errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("No entity found for external id {external_id:?}")]
    NoEntityForExternalId { external_id: String },

    #[error("Entity detail missing for {entity_id}")]
    EntityDetailMissing { entity_id: String },
}

/// Master error type for all twinlens errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TwinError {
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Time parse error: {0}")]
    Time(#[from] TimeParseError),

    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),
}

/// Result type alias for twinlens operations.
pub type TwinResult<T> = Result<T, TwinError>;
