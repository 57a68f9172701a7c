//! Session context: command history and the snapshot sent to the translator.
//!
//! The translator gets the current directory and the most recent commands so
//! follow-up requests ("now delete it") can be resolved.

mod history;

use serde::{Deserialize, Serialize};

pub use history::History;

/// How many executed commands are included in a prompt.
pub const PROMPT_HISTORY_LEN: usize = 5;

/// A snapshot of context information for prompt building.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub cwd: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub recent_commands: Vec<String>,
}

impl ContextSnapshot {
    /// Capture the process working directory and the tail of `history`.
    pub fn capture(history: &History) -> Self {
        let cwd = std::env::current_dir()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            cwd,
            recent_commands: history.recent(PROMPT_HISTORY_LEN),
        }
    }

    pub fn format_for_prompt(&self) -> String {
        let mut out = String::new();
        if !self.cwd.is_empty() {
            out.push_str(&format!("Current directory: {}\n", self.cwd));
        }
        if !self.recent_commands.is_empty() {
            out.push_str("Recently executed commands:\n");
            for cmd in &self.recent_commands {
                out.push_str(&format!("  {}\n", cmd));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_takes_history_tail() {
        let mut history = History::new();
        for i in 0..8 {
            history.push(format!("command_{}", i));
        }
        let snapshot = ContextSnapshot::capture(&history);
        assert_eq!(snapshot.recent_commands.len(), PROMPT_HISTORY_LEN);
        assert_eq!(snapshot.recent_commands.last().unwrap(), "command_7");
        assert!(!snapshot.cwd.is_empty());
    }

    #[test]
    fn test_format_for_prompt() {
        let snapshot = ContextSnapshot {
            cwd: "/test".to_string(),
            recent_commands: vec!["ls".to_string(), "touch a.txt".to_string()],
        };
        let formatted = snapshot.format_for_prompt();
        assert!(formatted.contains("Current directory: /test"));
        assert!(formatted.contains("Recently executed commands:"));
        assert!(formatted.contains("  touch a.txt"));
    }

    #[test]
    fn test_format_for_prompt_empty() {
        assert!(ContextSnapshot::default().format_for_prompt().is_empty());
    }
}
