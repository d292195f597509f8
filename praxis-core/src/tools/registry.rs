//! Vetted tool table
//!
//! The `ToolRegistry` maps tool names to registered handlers:
//! - Deny by default: only allow-listed names can be registered
//! - Duplicate detection
//! - Lookup tolerant of case and spacing differences in model output
//! - Dispatch of a parsed [`ToolInvocation`]
//!
//! # Example
//!
//! ```rust,ignore
//! use praxis_core::tools::ToolRegistry;
//!
//! let mut registry = ToolRegistry::with_allowed(["search"]);
//! registry.register(Arc::new(SearchTool::new()))?;
//!
//! let observation = registry.dispatch(&invocation).await?;
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::tool::{ToolHandler, ToolError};
use crate::config::ToolsConfig;
use crate::parsing::ToolInvocation;

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Tool with this name already exists
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    /// Tool name is not on the allow-list
    #[error("Tool '{0}' is not in the allowed tool list")]
    NotAllowed(String),
}

/// Summary of a registered tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSummary {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// When the model should use the tool
    pub usage_hints: Vec<String>,
}

impl From<&dyn ToolHandler> for ToolSummary {
    fn from(tool: &dyn ToolHandler) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            usage_hints: tool.metadata().usage_hints.clone(),
        }
    }
}

/// Normalize a tool name for lookup: trim, lowercase, single spaces
pub fn normalize_tool_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Registry of vetted tool handlers
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolHandler>>,
    allowed: HashSet<String>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tool_count", &self.tools.len())
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    /// Create an empty registry that allows no tools
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that allows the given tool names
    pub fn with_allowed<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tools: HashMap::new(),
            allowed: names
                .into_iter()
                .map(|name| normalize_tool_name(name.as_ref()))
                .collect(),
        }
    }

    /// Create a registry from configuration
    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::with_allowed(&config.allowed)
    }

    /// Register a tool
    ///
    /// Fails if the name is not allowed or is already registered.
    pub fn register(&mut self, tool: Arc<dyn ToolHandler>) -> Result<(), RegistryError> {
        let key = normalize_tool_name(tool.name());
        if !self.allowed.contains(&key) {
            return Err(RegistryError::NotAllowed(tool.name().to_string()));
        }
        if self.tools.contains_key(&key) {
            return Err(RegistryError::DuplicateTool(tool.name().to_string()));
        }
        self.tools.insert(key, tool);
        Ok(())
    }

    /// Register multiple tools at once
    pub fn register_all(
        &mut self,
        tools: Vec<Arc<dyn ToolHandler>>,
    ) -> Result<(), RegistryError> {
        for tool in tools {
            self.register(tool)?;
        }
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.tools.get(&normalize_tool_name(name))
    }

    /// Check if a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered tool names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.values().map(|t| t.name()).collect();
        names.sort_unstable();
        names
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// List all tools with their summaries, sorted by name
    pub fn list(&self) -> Vec<ToolSummary> {
        let mut summaries: Vec<ToolSummary> = self
            .tools
            .values()
            .map(|t| ToolSummary::from(t.as_ref()))
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Render each tool as prompt text: name, description, then hints
    pub fn describe_tools(&self) -> String {
        let mut text = String::new();
        for summary in self.list() {
            text.push_str(&format!(
                "Tool Name: {}\nTool Description: {}\n",
                summary.name, summary.description
            ));
            for hint in &summary.usage_hints {
                text.push_str(&format!("- {}\n", hint));
            }
        }
        text
    }

    /// Call the tool named by a parsed invocation
    pub async fn dispatch(&self, invocation: &ToolInvocation) -> Result<String, ToolError> {
        let Some(tool) = self.get(&invocation.tool_name) else {
            return Err(ToolError::NotFound {
                name: invocation.tool_name.clone(),
                available: self.names().into_iter().map(String::from).collect(),
            });
        };

        debug!(
            tool = %tool.name(),
            input_len = invocation.tool_input.len(),
            "Dispatching tool invocation"
        );
        tool.call(&invocation.tool_input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{FnTool, ToolMetadata};

    fn echo(name: &str) -> Arc<dyn ToolHandler> {
        Arc::new(FnTool::new(
            ToolMetadata::new(name, "Echoes input back"),
            |input: &str| Ok(input.to_string()),
        ))
    }

    fn invocation(tool_name: &str, tool_input: &str) -> ToolInvocation {
        ToolInvocation {
            thought: String::new(),
            tool_name: tool_name.to_string(),
            tool_input: tool_input.to_string(),
            raw: String::new(),
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::with_allowed(["search"]);

        assert!(registry.register(echo("search")).is_ok());
        assert!(registry.contains("search"));
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_deny_by_default() {
        let mut registry = ToolRegistry::new();
        assert_eq!(
            registry.register(echo("search")),
            Err(RegistryError::NotAllowed("search".to_string()))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = ToolRegistry::with_allowed(["search"]);
        assert!(registry.register(echo("search")).is_ok());
        assert!(matches!(
            registry.register(echo("Search")),
            Err(RegistryError::DuplicateTool(_))
        ));
    }

    #[test]
    fn test_lookup_normalizes_name() {
        let mut registry = ToolRegistry::with_allowed(["Search the internet"]);
        registry.register(echo("Search the internet")).unwrap();

        assert!(registry.contains("search the internet"));
        assert!(registry.contains("  Search   the\tinternet "));
        assert!(!registry.contains("search internet"));
    }

    #[test]
    fn test_from_config() {
        let config = ToolsConfig {
            allowed: vec!["calculator".to_string()],
        };
        let mut registry = ToolRegistry::from_config(&config);
        assert!(registry.register(echo("calculator")).is_ok());
        assert!(registry.register(echo("search")).is_err());
    }

    #[test]
    fn test_names_and_list_sorted() {
        let mut registry = ToolRegistry::with_allowed(["search", "calculator"]);
        registry
            .register_all(vec![echo("search"), echo("calculator")])
            .unwrap();

        assert_eq!(registry.names(), vec!["calculator", "search"]);
        let list = registry.list();
        assert_eq!(list[0].name, "calculator");
        assert_eq!(list[1].description, "Echoes input back");
    }

    #[tokio::test]
    async fn test_dispatch() {
        let mut registry = ToolRegistry::with_allowed(["search"]);
        registry.register(echo("search")).unwrap();

        let observation = registry
            .dispatch(&invocation("Search", r#"{"q":"rust"}"#))
            .await
            .unwrap();
        assert_eq!(observation, r#"{"q":"rust"}"#);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let mut registry = ToolRegistry::with_allowed(["search"]);
        registry.register(echo("search")).unwrap();

        let err = registry
            .dispatch(&invocation("browse", "x"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::NotFound {
                name: "browse".to_string(),
                available: vec!["search".to_string()],
            }
        );
    }

    #[test]
    fn test_describe_tools_includes_hints() {
        let mut registry = ToolRegistry::with_allowed(["search", "calculator"]);
        registry
            .register(Arc::new(FnTool::new(
                ToolMetadata::new("search", "Search the web")
                    .with_hint("Use for recent events")
                    .with_hint("Prefer short queries"),
                |input: &str| Ok(input.to_string()),
            )))
            .unwrap();
        registry.register(echo("calculator")).unwrap();

        assert_eq!(
            registry.describe_tools(),
            "Tool Name: calculator\nTool Description: Echoes input back\n\
             Tool Name: search\nTool Description: Search the web\n\
             - Use for recent events\n- Prefer short queries\n"
        );
        assert!(ToolRegistry::new().describe_tools().is_empty());
    }
}
