//! End-to-end scenarios for the completion parser

use super::*;

fn tool_invocation(text: &str) -> ToolInvocation {
    match parse(text) {
        Ok(Decision::ToolInvocation(invocation)) => invocation,
        other => panic!("expected tool invocation, got {other:?}"),
    }
}

fn final_answer(text: &str) -> FinalAnswer {
    match parse(text) {
        Ok(Decision::FinalAnswer(answer)) => answer,
        other => panic!("expected final answer, got {other:?}"),
    }
}

#[test]
fn test_final_answer_is_text_after_last_marker() {
    let cases = [
        ("Final Answer: 42", "42"),
        ("Thought: x\nFinal Answer:\n  multi\n  line  \n", "multi\n  line"),
        ("Final Answer: one\nFinal Answer: two", "two"),
        ("prefix Final Answer:", ""),
    ];
    for (text, expected) in cases {
        assert_eq!(final_answer(text).output, expected, "input: {text:?}");
    }
}

#[test]
fn test_action_form_yields_repaired_input() {
    let text = "Thought: search\nAction: T\nAction Input: I";
    let invocation = tool_invocation(text);
    assert_eq!(invocation.tool_name, "T");
    assert_eq!(invocation.tool_input, repair::safe_repair("I"));
    assert_eq!(invocation.tool_input, "I");
}

#[test]
fn test_parse_is_idempotent() {
    let texts = [
        "Thought: a\nAction: search\nAction Input: {q: 'x'",
        "Thought: b\nFinal Answer: done\n```",
        "Thought: c",
    ];
    for text in texts {
        assert_eq!(parse(text), parse(text));
    }
}

#[test]
fn test_array_input_is_untouched() {
    let invocation = tool_invocation("Action: multi\nAction Input: [\"a\",\"b\"]");
    assert_eq!(invocation.tool_input, "[\"a\",\"b\"]");

    let invocation = tool_invocation("Action: multi\nAction Input: [ 'a', 'b', ]");
    assert_eq!(invocation.tool_input, "[ 'a', 'b', ]");
}

#[test]
fn test_degenerate_repair_keeps_original() {
    let invocation = tool_invocation("Action: search\nAction Input: not json at all");
    assert_eq!(invocation.tool_input, "not json at all");

    let invocation = tool_invocation("Action: search\nAction Input: \"what is rust?\"");
    assert_eq!(invocation.tool_input, "what is rust?");
}

#[test]
fn test_trailing_fence_correction() {
    let answer = final_answer("Final Answer: Here is code:\n```print(1)");
    assert_eq!(answer.output, "Here is code:\nprint(1)");

    let answer = final_answer("Thought: t\nFinal Answer: done\n```");
    assert_eq!(answer.output, "done");

    let answer = final_answer("Final Answer: ```rust\nfn main() {}\n```");
    assert_eq!(answer.output, "```rust\nfn main() {}\n```");

    let answer = final_answer("Final Answer: Quote code with ``` marks in chat.");
    assert_eq!(answer.output, "Quote code with ``` marks in chat.");
}

#[test]
fn test_final_answer_takes_precedence() {
    let text = "Thought: both\nAction: search\nAction Input: {\"q\": 1}\nFinal Answer: 42";
    let answer = final_answer(text);
    assert_eq!(answer.output, "42");
    assert_eq!(answer.thought, "Thought: both");

    let text = "Final Answer: 42\nAction: search\nAction Input: x";
    assert_eq!(final_answer(text).output, "42\nAction: search\nAction Input: x");
}

#[test]
fn test_missing_action_marker() {
    let err = parse("Thought: I should look this up.").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingActionMarker);
    assert!(err.message.starts_with(MISSING_ACTION_AFTER_THOUGHT));
}

#[test]
fn test_missing_action_input_marker() {
    let err = parse("Thought: x\nAction: search").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingActionInputMarker);
    assert_eq!(err.message, MISSING_ACTION_INPUT_AFTER_ACTION);
}

#[test]
fn test_malformed_format() {
    let err = parse("Action Input: {\"q\": 1}\nAction: search").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedFormat);
    assert_eq!(err.message, format_without_tools());
}

#[test]
fn test_emphasized_tool_name_and_fenced_input() {
    let text = "```\nThought: use the tool\n```\nAction: **Search the internet**\nAction Input: ```json\n{\"search_query\": \"rust\",}\n```";
    let invocation = tool_invocation(text);
    assert_eq!(invocation.thought, "Thought: use the tool");
    assert_eq!(invocation.tool_name, "Search the internet");
    assert_eq!(invocation.tool_input, r#"{"search_query":"rust"}"#);
}

#[test]
fn test_numbered_markers_and_trailing_observation() {
    let text = "Thought: go\nAction 1: calculator\nAction 1 Input 1: {'expression': '2 + 2'}\nObservation: 4";
    let invocation = tool_invocation(text);
    assert_eq!(invocation.tool_name, "calculator");
    assert_eq!(invocation.tool_input, r#"{"expression":"2 + 2"}"#);
}

#[test]
fn test_empty_completion() {
    let err = parse("").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingActionMarker);
}

#[test]
fn test_concurrent_parsing() {
    let text = "Thought: t\nAction: a\nAction Input: {b: 1}";
    let expected = parse(text).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(move || parse(text).unwrap()))
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
