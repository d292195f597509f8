//! Typed decisions produced from a completion

use serde::{Deserialize, Serialize};

use super::parser::ParserConfig;
use super::prompts::FINAL_ANSWER_MARKER;
use super::repair::safe_repair;

const CODE_FENCE: &str = "```";

/// Instruction to call a named tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Reasoning that preceded the action
    pub thought: String,
    /// Cleaned tool name
    pub tool_name: String,
    /// Tool input after cleaning and repair
    pub tool_input: String,
    /// The full completion this was parsed from
    pub raw: String,
}

/// Final answer that ends the task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalAnswer {
    /// Reasoning that preceded the answer
    pub thought: String,
    /// Answer text
    pub output: String,
    /// The full completion this was parsed from
    pub raw: String,
}

/// Outcome of a successful parse: exactly one of the two variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Decision {
    /// Call a tool and feed its output back to the model
    ToolInvocation(ToolInvocation),
    /// Stop with an answer
    FinalAnswer(FinalAnswer),
}

impl Decision {
    /// Thought carried by either variant
    pub fn thought(&self) -> &str {
        match self {
            Decision::ToolInvocation(invocation) => &invocation.thought,
            Decision::FinalAnswer(answer) => &answer.thought,
        }
    }

    /// The completion this decision was parsed from
    pub fn raw(&self) -> &str {
        match self {
            Decision::ToolInvocation(invocation) => &invocation.raw,
            Decision::FinalAnswer(answer) => &answer.raw,
        }
    }

    /// Check if this decision ends the task
    pub fn is_final(&self) -> bool {
        matches!(self, Decision::FinalAnswer(_))
    }

    /// Get the tool invocation, if any
    pub fn as_tool_invocation(&self) -> Option<&ToolInvocation> {
        match self {
            Decision::ToolInvocation(invocation) => Some(invocation),
            Decision::FinalAnswer(_) => None,
        }
    }

    /// Get the final answer, if any
    pub fn as_final_answer(&self) -> Option<&FinalAnswer> {
        match self {
            Decision::FinalAnswer(answer) => Some(answer),
            Decision::ToolInvocation(_) => None,
        }
    }
}

impl From<ToolInvocation> for Decision {
    fn from(invocation: ToolInvocation) -> Self {
        Decision::ToolInvocation(invocation)
    }
}

impl From<FinalAnswer> for Decision {
    fn from(answer: FinalAnswer) -> Self {
        Decision::FinalAnswer(answer)
    }
}

/// Build a final answer from the text after the last `Final Answer:` marker
pub fn build_final_answer(raw: &str, thought: String, config: &ParserConfig) -> FinalAnswer {
    let after_marker = raw
        .rsplit_once(FINAL_ANSWER_MARKER)
        .map_or(raw, |(_, rest)| rest);

    let mut output = after_marker.trim().to_string();
    if config.fix_unmatched_fence {
        output = strip_unmatched_fence(&output);
    }

    FinalAnswer {
        thought,
        output,
        raw: raw.to_string(),
    }
}

/// Build a tool invocation from the raw name and input spans
pub fn build_tool_invocation(
    raw: &str,
    thought: String,
    tool_name: &str,
    tool_input: &str,
    config: &ParserConfig,
) -> ToolInvocation {
    let tool_input = clean_tool_input(tool_input);
    let tool_input = if config.repair_tool_input {
        safe_repair(tool_input)
    } else {
        tool_input.to_string()
    };

    ToolInvocation {
        thought,
        tool_name: clean_tool_name(tool_name),
        tool_input,
        raw: raw.to_string(),
    }
}

/// Trim a tool name and drop `*` emphasis around it
pub fn clean_tool_name(name: &str) -> String {
    name.trim().trim_matches('*').trim().to_string()
}

/// Trim tool input and drop one layer of surrounding double quotes
pub fn clean_tool_input(input: &str) -> &str {
    let input = input.trim();
    let input = input.strip_prefix('"').unwrap_or(input);
    input.strip_suffix('"').unwrap_or(input)
}

/// Remove a code fence that was opened but never closed.
///
/// With an odd number of fences, the last one has no partner. It is removed
/// and the text trimmed again when it ends the answer or starts a line, which
/// covers a dangling closing fence and an unclosed final code block. A fence
/// in the middle of prose is left alone.
pub fn strip_unmatched_fence(output: &str) -> String {
    if output.matches(CODE_FENCE).count() % 2 == 0 {
        return output.to_string();
    }

    let Some(index) = output.rfind(CODE_FENCE) else {
        return output.to_string();
    };
    let rest = &output[index + CODE_FENCE.len()..];
    let at_end = rest.trim().is_empty();
    let before = output[..index].trim_end_matches([' ', '\t']);
    let at_line_start = before.is_empty() || before.ends_with('\n');
    if !at_end && !at_line_start {
        return output.to_string();
    }

    let mut fixed = String::with_capacity(output.len());
    fixed.push_str(&output[..index]);
    fixed.push_str(rest);
    fixed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_answer_uses_last_marker() {
        let raw = "Final Answer: draft\nThought: better\nFinal Answer:  final  ";
        let answer = build_final_answer(raw, String::new(), &ParserConfig::default());
        assert_eq!(answer.output, "final");
        assert_eq!(answer.raw, raw);
    }

    #[test]
    fn test_trailing_fence_stripped() {
        assert_eq!(strip_unmatched_fence("print(1)\n```"), "print(1)");
    }

    #[test]
    fn test_unclosed_opening_fence_stripped() {
        assert_eq!(
            strip_unmatched_fence("Here is code:\n```print(1)"),
            "Here is code:\nprint(1)"
        );
    }

    #[test]
    fn test_fence_inside_prose_kept() {
        let text = "Wrap the snippet in ``` marks before pasting it.";
        assert_eq!(strip_unmatched_fence(text), text);
    }

    #[test]
    fn test_fence_at_end_of_prose_stripped() {
        assert_eq!(strip_unmatched_fence("All done ```"), "All done");
    }

    #[test]
    fn test_matched_fences_kept() {
        let text = "```python\nprint(1)\n```";
        assert_eq!(strip_unmatched_fence(text), text);
    }

    #[test]
    fn test_three_fences_drop_last() {
        assert_eq!(
            strip_unmatched_fence("```a``` and then\n```"),
            "```a``` and then"
        );
    }

    #[test]
    fn test_fence_fix_can_be_disabled() {
        let raw = "Final Answer: code\n```";
        let answer = build_final_answer(raw, String::new(), &ParserConfig::strict());
        assert_eq!(answer.output, "code\n```");
    }

    #[test]
    fn test_clean_tool_name() {
        assert_eq!(clean_tool_name("  **Search Tool**  "), "Search Tool");
        assert_eq!(clean_tool_name("* search *"), "search");
        assert_eq!(clean_tool_name("search"), "search");
    }

    #[test]
    fn test_clean_tool_input() {
        assert_eq!(clean_tool_input("  \"what is rust\"  "), "what is rust");
        assert_eq!(clean_tool_input("\"\"nested\"\""), "\"nested\"");
        assert_eq!(clean_tool_input("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(clean_tool_input("\"unterminated"), "unterminated");
    }

    #[test]
    fn test_tool_invocation_repairs_input() {
        let invocation = build_tool_invocation(
            "raw",
            "t".to_string(),
            " *search* ",
            " {query: 'rust',} ",
            &ParserConfig::default(),
        );
        assert_eq!(invocation.tool_name, "search");
        assert_eq!(invocation.tool_input, r#"{"query":"rust"}"#);
        assert_eq!(invocation.thought, "t");
    }

    #[test]
    fn test_tool_invocation_strict_keeps_input() {
        let invocation = build_tool_invocation(
            "raw",
            String::new(),
            "search",
            "{query: 'rust',}",
            &ParserConfig::strict(),
        );
        assert_eq!(invocation.tool_input, "{query: 'rust',}");
    }

    #[test]
    fn test_decision_serializes_with_tag() {
        let decision = Decision::from(FinalAnswer {
            thought: "t".to_string(),
            output: "42".to_string(),
            raw: "Final Answer: 42".to_string(),
        });
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["type"], "final_answer");
        assert_eq!(json["output"], "42");

        let back: Decision = serde_json::from_value(json).unwrap();
        assert_eq!(back, decision);
    }
}
