//! Tool handler trait and metadata definitions
//!
//! Tools are registered Rust handlers. A model can only name a tool; it
//! never supplies code to run.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tool metadata shown to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMetadata {
    /// Tool name as the model should write it after `Action:`
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// When should the model use this tool?
    pub usage_hints: Vec<String>,
}

impl ToolMetadata {
    /// Create new metadata with required fields
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            usage_hints: Vec::new(),
        }
    }

    /// Add a usage hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.usage_hints.push(hint.into());
        self
    }
}

/// Error returned when a tool cannot produce an observation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The model named a tool that is not registered
    #[error("Action '{name}' doesn't exist, these are the only available Actions: {}", available.join(", "))]
    NotFound {
        /// Name the model asked for
        name: String,
        /// Registered tool names
        available: Vec<String>,
    },

    /// The tool rejected its input
    #[error("Invalid input for tool '{tool}': {message}")]
    InvalidInput {
        /// Tool name
        tool: String,
        /// What was wrong
        message: String,
    },

    /// The tool failed while running
    #[error("Tool '{tool}' failed: {message}")]
    Execution {
        /// Tool name
        tool: String,
        /// Failure description
        message: String,
    },
}

impl ToolError {
    /// Create an invalid-input error
    pub fn invalid_input(tool: impl Into<String>, message: impl Into<String>) -> Self {
        ToolError::InvalidInput {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create an execution error
    pub fn execution(tool: impl Into<String>, message: impl Into<String>) -> Self {
        ToolError::Execution {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Core tool handler trait
///
/// `input` is the tool input exactly as the parser produced it. It is
/// usually JSON after repair, but tools must cope with plain text.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Get tool metadata
    fn metadata(&self) -> &ToolMetadata;

    /// Get tool name (convenience method)
    fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Get tool description (convenience method)
    fn description(&self) -> &str {
        &self.metadata().description
    }

    /// Run the tool and return its observation
    async fn call(&self, input: &str) -> Result<String, ToolError>;
}

/// Wrapper to turn a synchronous function into a [`ToolHandler`]
pub struct FnTool<F> {
    metadata: ToolMetadata,
    handler: F,
}

impl<F> FnTool<F>
where
    F: Fn(&str) -> Result<String, ToolError> + Send + Sync,
{
    /// Create a new function tool
    pub fn new(metadata: ToolMetadata, handler: F) -> Self {
        Self { metadata, handler }
    }
}

#[async_trait]
impl<F> ToolHandler for FnTool<F>
where
    F: Fn(&str) -> Result<String, ToolError> + Send + Sync,
{
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn call(&self, input: &str) -> Result<String, ToolError> {
        (self.handler)(input)
    }
}
