//! Error types for Praxis operations

use crate::audit::AuditError;
use crate::parsing::ParseError;
use crate::tools::{RegistryError, ToolError};

/// Result type for Praxis operations
pub type Result<T> = std::result::Result<T, PraxisError>;

/// Error types for Praxis
#[derive(Debug, thiserror::Error)]
pub enum PraxisError {
    /// Completion did not follow the ReAct format
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Tool registration failed
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Tool execution failed
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Audit sink failed
    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for PraxisError {
    fn from(s: String) -> Self {
        PraxisError::Other(s)
    }
}

impl From<&str> for PraxisError {
    fn from(s: &str) -> Self {
        PraxisError::Other(s.to_string())
    }
}

impl From<figment::Error> for PraxisError {
    fn from(err: figment::Error) -> Self {
        PraxisError::Configuration(err.to_string())
    }
}
