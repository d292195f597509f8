//! Single ReAct step: completion in, next loop action out
//!
//! [`StepRunner`] is the glue between the completion parser and the vetted
//! tool table. It never calls a model itself; the caller owns the loop.
//!
//! # Example
//!
//! ```rust,ignore
//! let runner = StepRunner::new(parser, registry);
//!
//! loop {
//!     let completion = llm.complete(&prompt).await?;
//!     match runner.step(&completion).await {
//!         StepOutcome::Finished(answer) => break answer.output,
//!         outcome => prompt.push_str(&outcome.scratchpad()),
//!     }
//! }
//! ```

use tracing::{debug, warn};

use crate::audit::ObservedParser;
use crate::config::PraxisConfig;
use crate::parsing::{
    CompletionParser, Decision, FinalAnswer, OutputParser, ParseError, ToolInvocation,
    format_instructions,
};
use crate::tools::ToolRegistry;

/// What the loop should do after one completion
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The model produced a final answer
    Finished(FinalAnswer),

    /// A tool was called; feed the observation back to the model
    Observed {
        /// Parsed invocation
        invocation: ToolInvocation,
        /// Tool output, or a description of why the tool failed
        observation: String,
    },

    /// The completion did not follow the format; re-prompt with the error
    Reprompt(ParseError),
}

impl StepOutcome {
    /// Check if the loop is done
    pub fn is_finished(&self) -> bool {
        matches!(self, StepOutcome::Finished(_))
    }

    /// Text to append to the running prompt before the next completion
    ///
    /// Empty for a finished step.
    pub fn scratchpad(&self) -> String {
        match self {
            StepOutcome::Finished(_) => String::new(),
            StepOutcome::Observed {
                invocation,
                observation,
            } => format!(
                "{}\nObservation: {}\nThought: ",
                invocation.raw, observation
            ),
            StepOutcome::Reprompt(error) => format!("{}\nThought: ", error.message),
        }
    }
}

/// Runs one ReAct step against a vetted tool table
#[derive(Debug)]
pub struct StepRunner {
    parser: ObservedParser,
    tools: ToolRegistry,
}

impl StepRunner {
    /// Create a runner from an observed parser and a tool table
    pub fn new(parser: ObservedParser, tools: ToolRegistry) -> Self {
        Self { parser, tools }
    }

    /// Create a runner with no audit hooks
    pub fn with_tools(tools: ToolRegistry) -> Self {
        Self::new(ObservedParser::new(CompletionParser::new()), tools)
    }

    /// Create a runner whose parser follows the configuration
    ///
    /// Hooks are added to the parser separately.
    pub fn from_config(config: &PraxisConfig, tools: ToolRegistry) -> Self {
        Self::new(ObservedParser::from_config(config), tools)
    }

    /// The parser used for each step
    pub fn parser(&self) -> &ObservedParser {
        &self.parser
    }

    /// The tool table
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Prompt text describing the registered tools and the expected format
    pub fn instructions(&self) -> String {
        format!(
            "{}{}",
            self.tools.describe_tools(),
            format_instructions(&self.tools.names())
        )
    }

    /// Parse a completion and, for a tool invocation, call the tool
    ///
    /// Tool failures become observations so the model can correct itself.
    pub async fn step(&self, completion: &str) -> StepOutcome {
        let decision = match self.parser.parse(completion) {
            Ok(decision) => decision,
            Err(error) => {
                debug!(kind = %error.kind, "Completion needs re-prompt");
                return StepOutcome::Reprompt(error);
            }
        };

        match decision {
            Decision::FinalAnswer(answer) => {
                debug!(output_len = answer.output.len(), "Final answer reached");
                StepOutcome::Finished(answer)
            }
            Decision::ToolInvocation(invocation) => {
                let observation = match self.tools.dispatch(&invocation).await {
                    Ok(output) => output,
                    Err(e) => {
                        warn!(tool = %invocation.tool_name, error = %e, "Tool call failed");
                        e.to_string()
                    }
                };
                StepOutcome::Observed {
                    invocation,
                    observation,
                }
            }
        }
    }
}
