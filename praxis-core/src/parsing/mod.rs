//! ReAct Completion Parsing
//!
//! Turns a model's free-form ReAct reply into a typed [`Decision`].
//!
//! # Components
//!
//! - **Grammar**: marker scanner that picks the completion shape
//! - **Thought**: reasoning preamble before the first marker line
//! - **Repair**: lenient fixer for near-JSON tool input
//! - **Decision**: typed tool invocation or final answer
//! - **CompletionParser**: the stateless entry point tying them together
//!
//! # Example
//!
//! ```rust
//! use praxis_core::parsing::{parse, Decision};
//!
//! let decision = parse("Thought: look it up\nAction: search\nAction Input: {query: 'rust',}")?;
//! match decision {
//!     Decision::ToolInvocation(call) => {
//!         assert_eq!(call.tool_name, "search");
//!         assert_eq!(call.tool_input, r#"{"query":"rust"}"#);
//!     }
//!     Decision::FinalAnswer(_) => unreachable!(),
//! }
//! # Ok::<(), praxis_core::parsing::ParseError>(())
//! ```

mod completion;
mod decision;
pub mod grammar;
mod parser;
mod prompts;
pub mod repair;
mod thought;

pub use completion::{CompletionParser, parse};
pub use decision::{
    Decision, FinalAnswer, ToolInvocation, clean_tool_input, clean_tool_name,
    strip_unmatched_fence,
};
pub use parser::{ErrorKind, OutputParser, ParseError, ParseResult, ParserConfig};
pub use prompts::{
    FINAL_ANSWER_FORMAT, FINAL_ANSWER_MARKER, MISSING_ACTION_AFTER_THOUGHT,
    MISSING_ACTION_INPUT_AFTER_ACTION, format_instructions, format_without_tools,
};
pub use repair::{repair_json, safe_repair};
pub use thought::extract_thought;

#[cfg(test)]
mod tests;
