//! Core parser trait, error taxonomy and parser configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::prompts;

/// Why a completion could not be turned into a decision.
///
/// Variants are listed in the order the parser checks for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Neither an `Action:` nor a `Final Answer:` marker was found
    MissingActionMarker,
    /// An `Action:` marker is present but no `Action Input:` marker
    MissingActionInputMarker,
    /// Markers are present but do not form a recognizable shape
    MalformedFormat,
}

impl ErrorKind {
    /// Stable identifier used in logs and serialized errors
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingActionMarker => "missing_action_marker",
            ErrorKind::MissingActionInputMarker => "missing_action_input_marker",
            ErrorKind::MalformedFormat => "malformed_format",
        }
    }

    /// Re-prompt text the agent loop can feed back to the model
    pub fn reprompt_message(&self) -> String {
        match self {
            ErrorKind::MissingActionMarker => format!(
                "{}\n{}",
                prompts::MISSING_ACTION_AFTER_THOUGHT,
                prompts::FINAL_ANSWER_FORMAT
            ),
            ErrorKind::MissingActionInputMarker => {
                prompts::MISSING_ACTION_INPUT_AFTER_ACTION.to_string()
            }
            ErrorKind::MalformedFormat => prompts::format_without_tools(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completion that matched neither the final-answer nor the action shape.
///
/// This is an expected, recoverable outcome: the agent loop owns the
/// re-prompt policy and can send [`ParseError::message`] back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct ParseError {
    /// Which marker check failed
    pub kind: ErrorKind,
    /// Re-prompt message for the model
    pub message: String,
}

impl ParseError {
    /// Create an error carrying the default re-prompt message for `kind`
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: kind.reprompt_message(),
        }
    }

    /// Replace the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl From<ErrorKind> for ParseError {
    fn from(kind: ErrorKind) -> Self {
        ParseError::new(kind)
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Trait for output parsers
pub trait OutputParser: Send + Sync {
    /// The output type produced by this parser
    type Output;

    /// Parse the raw output string
    fn parse(&self, raw: &str) -> ParseResult<Self::Output>;

    /// Check if this parser can handle the input
    fn can_parse(&self, raw: &str) -> bool;

    /// Get the parser name for debugging
    fn name(&self) -> &'static str;
}

/// Configuration for parser behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Pass extracted tool input through the lenient repairer
    pub repair_tool_input: bool,
    /// Drop an unmatched code fence from the final answer
    pub fix_unmatched_fence: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            repair_tool_input: true,
            fix_unmatched_fence: true,
        }
    }
}

impl ParserConfig {
    /// Create a strict config (fragments are returned as extracted)
    pub fn strict() -> Self {
        Self {
            repair_tool_input: false,
            fix_unmatched_fence: false,
        }
    }

    /// Create a lenient config (all corrections enabled)
    pub fn lenient() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_config_default() {
        let config = ParserConfig::default();
        assert!(config.repair_tool_input);
        assert!(config.fix_unmatched_fence);
        assert_eq!(config, ParserConfig::lenient());
    }

    #[test]
    fn test_parser_config_strict() {
        let config = ParserConfig::strict();
        assert!(!config.repair_tool_input);
        assert!(!config.fix_unmatched_fence);
    }

    #[test]
    fn test_error_carries_reprompt_message() {
        let err = ParseError::new(ErrorKind::MissingActionInputMarker);
        assert_eq!(err.kind, ErrorKind::MissingActionInputMarker);
        assert!(err.message.contains("'Action Input:'"));

        let err = ParseError::new(ErrorKind::MissingActionMarker);
        assert!(err.message.contains("'Action:'"));
        assert!(err.message.contains("Final Answer:"));
    }

    #[test]
    fn test_error_display() {
        let err = ParseError::new(ErrorKind::MalformedFormat).with_message("bad");
        assert_eq!(err.to_string(), "malformed_format: bad");
    }

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_value(ErrorKind::MissingActionMarker).unwrap();
        assert_eq!(json, serde_json::json!("missing_action_marker"));
    }
}
