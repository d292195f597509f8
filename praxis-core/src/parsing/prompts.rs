//! Re-prompt messages and format instructions
//!
//! These are the texts an agent loop sends back to the model when a
//! completion does not follow the ReAct format.

/// Marker that introduces a final answer
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// Sent when the completion has no `Action:` marker
pub const MISSING_ACTION_AFTER_THOUGHT: &str = "I did it wrong. Invalid Format: I missed the 'Action:' after 'Thought:'. I will do it right next time, and I will not use a tool I have already used.\n";

/// Sent when `Action:` is present but `Action Input:` is not
pub const MISSING_ACTION_INPUT_AFTER_ACTION: &str = "I did it wrong. Invalid Format: I missed the 'Action Input:' after 'Action:'. I will do it right next time, and I will not use a tool I have already used.\n";

/// Reminder of how to give a final answer
pub const FINAL_ANSWER_FORMAT: &str = "If I don't need to use any more tools, I must give my best complete final answer using the EXACT format below:\n\nThought: I now can give a great answer\nFinal Answer: my best complete final answer to the task.\n\n";

/// Full format reminder, with the available tool names listed
pub fn format_instructions(tool_names: &[&str]) -> String {
    let tools = if tool_names.is_empty() {
        String::new()
    } else {
        tool_names.join(", ")
    };

    format!(
        "\nSorry, I didn't use the right format. I MUST either use a tool (among the available ones), OR give my best final answer.\n\
         Here is the expected format I must follow:\n\n\
         Question: the input question I must answer\n\
         Thought: I should always think about what to do\n\
         Action: the action to take, should be one of [{tools}]\n\
         Action Input: the input to the action, as a JSON object when the tool takes arguments\n\
         Observation: the result of the action\n\
         ... (this Thought/Action/Action Input/Observation can repeat N times)\n\
         Thought: I now can give a great answer\n\
         {FINAL_ANSWER_MARKER} my best complete final answer to the task\n\n"
    )
}

/// Full format reminder when the tool list is not known
pub fn format_without_tools() -> String {
    format_instructions(&[])
}
