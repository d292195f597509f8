//! Tool handlers for parsed invocations
//!
//! Tools are looked up by name in a [`ToolRegistry`] populated only from a
//! vetted allow-list. A parsed [`ToolInvocation`](crate::parsing::ToolInvocation)
//! can name a tool but can never introduce one.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use praxis_core::tools::{FnTool, ToolMetadata, ToolRegistry};
//!
//! let mut registry = ToolRegistry::with_allowed(["echo"]);
//! registry
//!     .register(Arc::new(FnTool::new(
//!         ToolMetadata::new("echo", "Echo the input"),
//!         |input: &str| Ok(input.to_string()),
//!     )))
//!     .unwrap();
//! assert!(registry.contains("Echo"));
//! ```

mod registry;
mod tool;

pub use registry::{RegistryError, ToolRegistry, ToolSummary, normalize_tool_name};
pub use tool::{FnTool, ToolHandler, ToolError, ToolMetadata};
