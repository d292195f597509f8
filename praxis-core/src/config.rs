//! Configuration types for Praxis

use serde::{Deserialize, Serialize};

use crate::error::{PraxisError, Result};
use crate::parsing::ParserConfig;

/// Default config file looked up by [`PraxisConfig::load`]
pub const CONFIG_FILE: &str = "praxis.toml";

/// Environment variable naming an extra config file
pub const CONFIG_PATH_ENV: &str = "PRAXIS_CONFIG_PATH";

/// Main configuration for Praxis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PraxisConfig {
    /// Completion parser behavior
    pub parser: ParserConfig,

    /// Audit hook configuration
    pub audit: AuditConfig,

    /// Tool handler table configuration
    pub tools: ToolsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Audit hook configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Notify audit hooks on every parse
    pub enabled: bool,

    /// Name recorded as the sender of each completion
    pub sender: String,

    /// Execution the completions belong to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,

    /// Capacity of the audit channel
    pub channel_capacity: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sender: "agent".to_string(),
            execution_id: None,
            channel_capacity: 256,
        }
    }
}

/// Tool handler table configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ToolsConfig {
    /// Vetted tool names; only these may be registered
    pub allowed: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` env-filter directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Builder for PraxisConfig
pub struct ConfigBuilder {
    config: PraxisConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            config: PraxisConfig::default(),
        }
    }

    /// Set parser configuration
    pub fn parser(mut self, config: ParserConfig) -> Self {
        self.config.parser = config;
        self
    }

    /// Set audit configuration
    pub fn audit(mut self, config: AuditConfig) -> Self {
        self.config.audit = config;
        self
    }

    /// Allow a tool name
    pub fn allow_tool(mut self, name: impl Into<String>) -> Self {
        self.config.tools.allowed.push(name.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> PraxisConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PraxisConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order:
    /// 1. Default configuration
    /// 2. `praxis.toml` in the working directory
    /// 3. The file named by `PRAXIS_CONFIG_PATH`, if set
    /// 4. `PRAXIS_*` environment variables, nested with `__`
    ///    (e.g. `PRAXIS_AUDIT__SENDER=researcher`)
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source is invalid.
    pub fn load() -> Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Toml},
        };

        let mut figment = Figment::from(Serialized::defaults(PraxisConfig::default()))
            .merge(Toml::file(CONFIG_FILE));

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            figment = figment.merge(Toml::file(path));
        }

        let config: PraxisConfig = figment
            .merge(Env::prefixed("PRAXIS_").split("__"))
            .extract()
            .map_err(|e| {
                PraxisError::Configuration(format!("Failed to load configuration: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Format, Serialized, Toml},
        };

        let path = path.as_ref();
        if !path.exists() {
            return Err(PraxisError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let config: PraxisConfig = Figment::from(Serialized::defaults(PraxisConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| {
                PraxisError::Configuration(format!("Failed to load configuration file: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.audit.channel_capacity == 0 {
            return Err(PraxisError::Configuration(
                "audit.channel_capacity must be greater than zero".to_string(),
            ));
        }

        if self.tools.allowed.iter().any(|name| name.trim().is_empty()) {
            return Err(PraxisError::Configuration(
                "tools.allowed must not contain blank names".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PraxisConfig::default();
        assert_eq!(config.parser, ParserConfig::default());
        assert!(config.audit.enabled);
        assert_eq!(config.audit.sender, "agent");
        assert_eq!(config.audit.channel_capacity, 256);
        assert!(config.tools.allowed.is_empty());
        assert_eq!(config.logging.filter, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[parser]
repair_tool_input = false

[audit]
sender = "researcher"
execution_id = "exec-1"

[tools]
allowed = ["search", "calculator"]
"#
        )
        .unwrap();

        let config = PraxisConfig::from_file(file.path()).unwrap();
        assert!(!config.parser.repair_tool_input);
        assert!(config.parser.fix_unmatched_fence);
        assert_eq!(config.audit.sender, "researcher");
        assert_eq!(config.audit.execution_id.as_deref(), Some("exec-1"));
        assert_eq!(config.audit.channel_capacity, 256);
        assert_eq!(config.tools.allowed, vec!["search", "calculator"]);
    }

    #[test]
    fn test_from_file_missing() {
        let err = PraxisConfig::from_file("/nonexistent/praxis.toml").unwrap_err();
        assert!(matches!(err, PraxisError::Configuration(_)));
    }

    #[test]
    fn test_from_file_rejects_zero_capacity() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[audit]\nchannel_capacity = 0").unwrap();

        let err = PraxisConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("channel_capacity"));
    }

    #[test]
    fn test_validate_blank_tool_name() {
        let config = ConfigBuilder::new().allow_tool("search").allow_tool("  ").build();
        assert!(config.validate().is_err());
    }
}
