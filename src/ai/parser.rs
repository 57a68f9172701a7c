//! Parser module for processing AI responses.
//!
//! Models that answer in plain text instead of calling a tool follow a small
//! line protocol:
//! ```text
//! UNKNOWN
//! QUESTION: <answer>
//! NEEDS_APPROVAL: <command>
//! <command>
//! ```
//! This module turns such text, optionally wrapped in a markdown code block,
//! into a [`Translation`].

use super::Translation;

/// Marker announcing that the model considers the command dangerous.
/// Case-sensitive, stripped before the command goes anywhere else.
pub const APPROVAL_MARKER: &str = "NEEDS_APPROVAL:";
pub const QUESTION_MARKER: &str = "QUESTION:";
pub const UNKNOWN_MARKER: &str = "UNKNOWN";

/// Parse a text response into a [`Translation`].
pub fn parse_response(response: &str) -> Translation {
    let text = strip_code_block(response);
    let text = text.trim();

    if text.is_empty() || text == UNKNOWN_MARKER {
        return Translation::Unknown;
    }

    if let Some(answer) = text.strip_prefix(QUESTION_MARKER) {
        return Translation::QuestionAnswer(answer.trim().to_string());
    }

    if let Some(cmd) = text.strip_prefix(APPROVAL_MARKER) {
        let cmd = strip_code_block(cmd).trim().to_string();
        if cmd.is_empty() {
            return Translation::Unknown;
        }
        return Translation::SensitiveCommand(cmd);
    }

    Translation::PlainCommand(text.to_string())
}

/// Return the contents of the first markdown code block, or the input
/// unchanged when there is none.
fn strip_code_block(response: &str) -> String {
    let mut in_code_block = false;
    let mut seen_block = false;
    let mut command = String::new();

    for line in response.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            if in_code_block {
                // End of the first block; ignore anything after it.
                break;
            }
            in_code_block = true;
            seen_block = true;
        } else if in_code_block {
            if !command.is_empty() {
                command.push('\n');
            }
            command.push_str(trimmed);
        }
    }

    if seen_block {
        command
    } else {
        response.to_string()
    }
}
