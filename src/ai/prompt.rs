//! Prompt building utilities for AI requests.
//!
//! This module constructs the system prompt and the per-turn user prompt,
//! which carries the user's request along with the working directory and the
//! commands executed so far.

use crate::context::ContextSnapshot;

/// System prompt that defines the translator's behavior.
pub const SYSTEM_PROMPT: &str = r#"You are a command-line AI assistant. Your task is to understand the user's natural language requests and convert them into appropriate Linux/Unix shell commands.

Rules:
1. When the request needs a command, call the `suggest_command` tool with exactly one command (use && to chain steps if needed).
2. Set `risk_level` to "high" for anything dangerous: deleting files, changing permissions, privilege escalation, system control, disk operations, killing processes, overwriting files.
3. When the user is only asking a question, call the `answer_question` tool.
4. Never wrap commands in code blocks.

If you cannot call tools, reply with plain text instead:
- Safe command: the command string only
- Dangerous command: "NEEDS_APPROVAL: <command>"
- Question: "QUESTION: <your answer>"
- Intent unclear: "UNKNOWN"

Examples:
User: "List files in current directory"
You: ls -la

User: "What is Python?"
You: QUESTION: Python is a high-level programming language...

User: "Delete all .log files"
You: NEEDS_APPROVAL: find . -name "*.log" -type f -delete"#;

/// Build the user prompt for one turn.
pub fn build_prompt(user_query: &str, ctx: &ContextSnapshot) -> String {
    let mut prompt = String::new();

    prompt.push_str("USER REQUEST:\n");
    prompt.push_str(user_query);
    prompt.push_str("\n\n");

    let context = ctx.format_for_prompt();
    if !context.is_empty() {
        prompt.push_str("--- Context ---\n");
        prompt.push_str(&context);
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_basic() {
        let ctx = ContextSnapshot {
            cwd: "/home/user/projects".to_string(),
            recent_commands: vec!["ls -la".to_string()],
        };

        let prompt = build_prompt("delete the largest file", &ctx);

        assert!(prompt.starts_with("USER REQUEST:\ndelete the largest file"));
        assert!(prompt.contains("Current directory: /home/user/projects"));
        assert!(prompt.contains("  ls -la"));
    }

    #[test]
    fn test_build_prompt_empty_context() {
        let prompt = build_prompt("help me", &ContextSnapshot::default());
        assert!(prompt.contains("help me"));
        assert!(!prompt.contains("--- Context ---"));
    }

    #[test]
    fn test_system_prompt_documents_text_protocol() {
        assert!(SYSTEM_PROMPT.contains(super::super::parser::APPROVAL_MARKER));
        assert!(SYSTEM_PROMPT.contains(super::super::parser::QUESTION_MARKER));
        assert!(SYSTEM_PROMPT.contains(super::super::parser::UNKNOWN_MARKER));
    }
}
