//! # Praxis - ReAct completion parsing for agents
//!
//! Praxis turns the free-form text a language model emits in a ReAct loop
//! into a typed decision:
//! - A **tool invocation** (tool name plus input, with near-JSON input repaired)
//! - A **final answer** (with a stray code fence fixed)
//! - A **parse error** carrying a fixed re-prompt message for the model
//!
//! Around the pure parser it provides small optional building blocks:
//! audit hooks that see every raw completion, a vetted tool table, and a
//! step adapter that ties them together.
//!
//! ## Quick Start
//!
//! ```rust
//! use praxis_core::prelude::*;
//!
//! let parser = CompletionParser::new();
//! let decision = parser.parse("Thought: done\nFinal Answer: 42").unwrap();
//! assert!(decision.is_final());
//!
//! let err = parser.parse("Thought: hmm").unwrap_err();
//! assert_eq!(err.kind, ErrorKind::MissingActionMarker);
//! ```
//!
//! ## Modules
//!
//! - [`parsing`]: grammar scanner, thought extraction, lenient repair, decisions
//! - [`audit`]: hooks notified with every completion
//! - [`tools`]: allow-listed tool handlers
//! - [`agent`]: one ReAct step from completion to observation
//! - [`config`]: layered configuration via `figment`

pub mod agent;
pub mod audit;
pub mod config;
pub mod error;
pub mod parsing;
pub mod tools;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{PraxisError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::agent::{StepOutcome, StepRunner};
    pub use crate::audit::{
        AuditError, AuditHook, AuditRecord, ChannelAuditHook, LoggingAuditHook, ObservedParser,
        audit_channel, audit_channel_from_config,
    };
    pub use crate::config::{AuditConfig, ConfigBuilder, PraxisConfig, ToolsConfig};
    pub use crate::error::{PraxisError, Result};
    pub use crate::parsing::{
        CompletionParser, Decision, ErrorKind, FinalAnswer, OutputParser, ParseError,
        ParseResult, ParserConfig, ToolInvocation, format_instructions, parse, repair_json,
        safe_repair,
    };
    pub use crate::tools::{
        FnTool, RegistryError, ToolError, ToolHandler, ToolMetadata, ToolRegistry,
    };
}
