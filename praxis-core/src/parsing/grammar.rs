//! Completion shape classifier
//!
//! A small hand-written scanner for the three ReAct markers:
//!
//! ```text
//! final-marker  := "Final Answer:"
//! action-marker := "Action" ws* digit* ws* ":"
//! input-marker  := "Action" ws* digit* ws* "Input" ws* digit* ws* ":"
//! ```
//!
//! An action shape is the leftmost action marker followed, anywhere later, by
//! an input marker. The tool name is the shortest span between the two; the
//! tool input runs from the input marker to the end of the text. Markers are
//! case-sensitive and may appear anywhere, not only at the start of a line.

use super::parser::ErrorKind;
use super::prompts::FINAL_ANSWER_MARKER;

const ACTION: &str = "Action";
const INPUT: &str = "Input";

/// Shape detected in a completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape<'a> {
    /// The completion contains a `Final Answer:` marker
    FinalAnswer,
    /// The completion contains an `Action:` / `Action Input:` pair
    Action {
        /// Raw span between the two markers
        tool_name: &'a str,
        /// Raw span after the input marker
        tool_input: &'a str,
    },
    /// Neither shape matched
    Malformed(ErrorKind),
}

/// Classify a completion. A final-answer marker wins over an action pair.
pub fn classify(text: &str) -> Shape<'_> {
    if text.contains(FINAL_ANSWER_MARKER) {
        return Shape::FinalAnswer;
    }

    if let Some((tool_name, tool_input)) = match_action(text) {
        return Shape::Action {
            tool_name,
            tool_input,
        };
    }

    Shape::Malformed(malformed_kind(text))
}

/// Pick the error kind for a completion that matched neither shape
pub fn malformed_kind(text: &str) -> ErrorKind {
    if find_action_marker(text, 0).is_none() {
        ErrorKind::MissingActionMarker
    } else if find_input_marker(text, 0).is_none() {
        ErrorKind::MissingActionInputMarker
    } else {
        ErrorKind::MalformedFormat
    }
}

/// Match the action shape, returning the raw tool name and tool input spans
pub fn match_action(text: &str) -> Option<(&str, &str)> {
    // Later action markers only see a suffix of the text, so if the first
    // one has no input marker after it, none does.
    let (_, after_action) = find_action_marker(text, 0)?;
    let name_start = skip_whitespace(text, after_action);

    let (input_start, after_input) = find_input_marker(text, name_start)?;
    let name_end = trim_whitespace_back(text, input_start).max(name_start);
    let value_start = skip_whitespace(text, after_input);

    Some((&text[name_start..name_end], &text[value_start..]))
}

/// Find the first `Action<ws><digits><ws>:` at or after `from`.
///
/// Returns the marker's start and the index just past its colon.
pub fn find_action_marker(text: &str, from: usize) -> Option<(usize, usize)> {
    find_marker(text, from, action_marker_end)
}

/// Find the first `Action<ws><digits><ws>Input<ws><digits><ws>:` at or after `from`
pub fn find_input_marker(text: &str, from: usize) -> Option<(usize, usize)> {
    find_marker(text, from, input_marker_end)
}

fn find_marker(
    text: &str,
    from: usize,
    marker_end: fn(&str, usize) -> Option<usize>,
) -> Option<(usize, usize)> {
    let mut cursor = from;
    while let Some(offset) = text.get(cursor..)?.find(ACTION) {
        let start = cursor + offset;
        if let Some(end) = marker_end(text, start) {
            return Some((start, end));
        }
        cursor = start + ACTION.len();
    }
    None
}

/// `start` points at `Action`; returns the index after the colon
fn action_marker_end(text: &str, start: usize) -> Option<usize> {
    let pos = skip_suffix(text, start + ACTION.len());
    text[pos..].starts_with(':').then_some(pos + 1)
}

/// `start` points at `Action`; returns the index after the colon
fn input_marker_end(text: &str, start: usize) -> Option<usize> {
    let pos = skip_suffix(text, start + ACTION.len());
    if !text[pos..].starts_with(INPUT) {
        return None;
    }
    let pos = skip_suffix(text, pos + INPUT.len());
    text[pos..].starts_with(':').then_some(pos + 1)
}

/// Skip the optional `ws* digit* ws*` that may follow a marker word
fn skip_suffix(text: &str, pos: usize) -> usize {
    let pos = skip_whitespace(text, pos);
    let pos = skip_while(text, pos, |c| c.is_ascii_digit());
    skip_whitespace(text, pos)
}

fn skip_whitespace(text: &str, pos: usize) -> usize {
    skip_while(text, pos, char::is_whitespace)
}

fn skip_while(text: &str, pos: usize, pred: impl Fn(char) -> bool) -> usize {
    text[pos..]
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(text.len(), |(i, _)| pos + i)
}

/// Walk back from `end` over whitespace, returning the new end
fn trim_whitespace_back(text: &str, end: usize) -> usize {
    text[..end].trim_end().len()
}
