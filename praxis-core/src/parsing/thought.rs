//! Reasoning preamble extraction

const CODE_FENCE: &str = "```";

/// Extract the thought that precedes the first marker line.
///
/// The preamble ends at the first `"\nAction"`, or failing that the first
/// `"\nFinal Answer"`. Code fences are removed and whitespace trimmed. A
/// completion with neither marker line has an empty thought.
pub fn extract_thought(text: &str) -> String {
    let Some(index) = text
        .find("\nAction")
        .or_else(|| text.find("\nFinal Answer"))
    else {
        return String::new();
    };

    text[..index].trim().replace(CODE_FENCE, "").trim().to_string()
}
