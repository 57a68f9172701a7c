//! Command history for one session.
//!
//! Append-only record of every command handed to the execution engine, in
//! invocation order. It records intent to execute, so failing commands are
//! kept too. Nothing is persisted; the history dies with the process.

#[derive(Clone, Debug, Default)]
pub struct History {
    commands: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a command exactly as it will be executed.
    pub fn push(&mut self, cmd: impl Into<String>) {
        self.commands.push(cmd.into());
    }

    /// Copy of every entry, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.commands.clone()
    }

    /// Get the most recent n commands.
    pub fn recent(&self, n: usize) -> Vec<String> {
        let len = self.commands.len();
        let start = len.saturating_sub(n);
        self.commands[start..].to_vec()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_order_and_repeats() {
        let mut history = History::new();
        history.push("ls");
        history.push("ls");
        history.push("  pwd ");

        // Repeats and whitespace are kept verbatim.
        assert_eq!(history.entries(), vec!["ls", "ls", "  pwd "]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_recent() {
        let mut history = History::new();
        for i in 0..5 {
            history.push(format!("cmd_{}", i));
        }
        assert_eq!(history.recent(2), vec!["cmd_3", "cmd_4"]);
        assert_eq!(history.recent(10).len(), 5);
    }

    #[test]
    fn test_entries_is_a_copy() {
        let mut history = History::new();
        history.push("echo a");
        let mut copy = history.entries();
        copy.push("echo b".to_string());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.push("echo a");
        history.clear();
        assert!(history.is_empty());
        assert!(history.entries().is_empty());
    }
}
