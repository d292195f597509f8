//! Completion parser: raw model reply to [`Decision`]
//!
//! Expects the completion in one of two shapes. An action:
//!
//! ```text
//! Thought: agent thought here
//! Action: search
//! Action Input: what is the temperature in SF?
//! ```
//!
//! or a final answer:
//!
//! ```text
//! Thought: agent thought here
//! Final Answer: The temperature is 100 degrees
//! ```
//!
//! A `Final Answer:` marker anywhere in the text takes precedence over an
//! action pair.

use tracing::debug;

use super::decision::{Decision, build_final_answer, build_tool_invocation};
use super::grammar::{self, Shape};
use super::parser::{OutputParser, ParseError, ParseResult, ParserConfig};
use super::thought::extract_thought;

/// Stateless ReAct completion parser
#[derive(Debug, Clone, Default)]
pub struct CompletionParser {
    config: ParserConfig,
}

impl CompletionParser {
    /// Create a parser with the default (lenient) config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Create a strict parser (no repair, no fence fix)
    pub fn strict() -> Self {
        Self::with_config(ParserConfig::strict())
    }

    /// Get the parser config
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }
}

impl OutputParser for CompletionParser {
    type Output = Decision;

    fn parse(&self, raw: &str) -> ParseResult<Decision> {
        let thought = extract_thought(raw);

        match grammar::classify(raw) {
            Shape::FinalAnswer => {
                debug!(completion_len = raw.len(), "Parsed final answer");
                Ok(build_final_answer(raw, thought, &self.config).into())
            }
            Shape::Action {
                tool_name,
                tool_input,
            } => {
                let invocation =
                    build_tool_invocation(raw, thought, tool_name, tool_input, &self.config);
                debug!(
                    tool = %invocation.tool_name,
                    input_len = invocation.tool_input.len(),
                    "Parsed tool invocation"
                );
                Ok(invocation.into())
            }
            Shape::Malformed(kind) => {
                debug!(
                    kind = %kind,
                    thought_len = thought.len(),
                    "Completion did not match a known shape"
                );
                Err(ParseError::new(kind))
            }
        }
    }

    fn can_parse(&self, raw: &str) -> bool {
        !matches!(grammar::classify(raw), Shape::Malformed(_))
    }

    fn name(&self) -> &'static str {
        "react-completion"
    }
}

/// Parse a completion with the default parser
pub fn parse(text: &str) -> ParseResult<Decision> {
    CompletionParser::new().parse(text)
}
