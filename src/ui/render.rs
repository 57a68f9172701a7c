//! Text for results, history, and the static welcome/help screens.

use crossterm::style::{Stylize, style};

use crate::shell::{ExecutionResult, Termination};

pub const WELCOME_TEXT: &str = "\
Chat in natural language and the assistant will translate your request into a shell command.

Sensitive commands (deletion, permission changes, privilege escalation, ...) are shown in red and run only after you confirm them.

Type `help` for the list of built-in commands.";

pub const HELP_TEXT: &str = "\
help            Show this help
history         Show executed command history
history clear   Clear the command history
clear           Clear the conversation context
!<command>      Run a command directly (still checked and confirmed)
exit | quit     Exit the program

Examples:
  list all files in the current directory   -> ls -la
  show the current directory                -> pwd
  find all .py files                        -> find . -name \"*.py\"";

/// Describe the outcome of an execution.
pub fn format_result(result: &ExecutionResult) -> String {
    let mut out = String::new();

    match (&result.termination, result.succeeded) {
        (Termination::Exited(_), true) => {
            out.push_str(&format!("{}\n", style("✓ Command executed successfully").green()));
            if !result.stdout.is_empty() {
                out.push_str(&format!("{}\n{}", style("Output:").dim(), result.stdout));
            }
        }
        (Termination::Exited(code), false) => {
            out.push_str(&format!(
                "{}\n",
                style(format!("✗ Command execution failed (exit code: {})", code)).red()
            ));
            if !result.stdout.is_empty() {
                out.push_str(&format!("{}\n{}", style("Output:").dim(), result.stdout));
            }
            if !result.stderr.is_empty() {
                out.push_str(&format!("{}\n{}", style("Error:").red(), result.stderr));
            }
        }
        _ => {
            let reason = result
                .failure_reason()
                .unwrap_or_else(|| "Command execution failed".to_string());
            out.push_str(&format!("{}\n", style(format!("✗ {}", reason)).red()));
            if !result.stderr.is_empty() {
                out.push_str(&format!("{}\n{}", style("Error:").red(), result.stderr));
            }
        }
    }

    out.trim_end().to_string()
}

pub fn format_history(entries: &[String]) -> String {
    if entries.is_empty() {
        return format!("{}", style("No command history").dim());
    }
    let mut out = format!("{}\n", style("Command Execution History:").bold());
    for (i, cmd) in entries.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, cmd));
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::ExecutionError;

    fn result(termination: Termination, succeeded: bool, stdout: &str, stderr: &str) -> ExecutionResult {
        ExecutionResult {
            succeeded,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            termination,
        }
    }

    #[test]
    fn test_success_shows_output() {
        let text = format_result(&result(Termination::Exited(0), true, "hello\n", ""));
        assert!(text.contains("executed successfully"));
        assert!(text.contains("hello"));
    }

    #[test]
    fn test_failure_shows_code_and_stderr() {
        let text = format_result(&result(Termination::Exited(2), false, "", "No such file\n"));
        assert!(text.contains("exit code: 2"));
        assert!(text.contains("No such file"));
    }

    #[test]
    fn test_timeout_shows_reason() {
        let text = format_result(&result(
            Termination::Failed(ExecutionError::Timeout {
                limit: Duration::from_secs(30),
            }),
            false,
            "",
            "",
        ));
        assert!(text.contains("exceeded 30 seconds"));
    }

    #[test]
    fn test_history_listing() {
        assert!(format_history(&[]).contains("No command history"));
        let text = format_history(&["ls".to_string(), "pwd".to_string()]);
        assert!(text.contains("1. ls"));
        assert!(text.contains("2. pwd"));
    }
}
