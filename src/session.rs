//! Session orchestrator.
//!
//! A [`Session`] runs one classify → approve → execute cycle per command and
//! owns the command history. Commands are processed strictly one at a time.

use tracing::info;

use crate::context::History;
use crate::security::{ApprovalGate, Classification, GateVerdict, Prompter};
use crate::shell::{ExecutionEngine, ExecutionResult};

/// What happened to a command handed to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The gate approved the command and the engine ran it.
    Executed {
        verdict: GateVerdict,
        result: ExecutionResult,
    },
    /// The user declined; nothing ran and history is unchanged.
    Denied,
}

pub struct Session {
    gate: ApprovalGate,
    engine: ExecutionEngine,
    history: History,
}

impl Session {
    pub fn new(gate: ApprovalGate, engine: ExecutionEngine) -> Self {
        Self {
            gate,
            engine,
            history: History::new(),
        }
    }

    /// Run `command` through the approval gate and, if approved, execute it.
    ///
    /// The command is recorded before execution, so failed, timed out, and
    /// interrupted runs all appear in history. Denied commands never do.
    pub async fn process_one_command<P: Prompter>(
        &mut self,
        command: &str,
        hint: Option<Classification>,
        prompter: &mut P,
    ) -> CommandOutcome {
        let verdict = self.gate.decide(command, hint, prompter).await;
        if !verdict.decision.is_approved() {
            info!("Command denied: {}", command);
            return CommandOutcome::Denied;
        }

        self.history.push(command);
        prompter.announce_execution(command);
        let result = self.engine.execute(command).await;
        info!(
            "Command finished (succeeded: {}, decision: {:?}): {}",
            result.succeeded, verdict.decision, command
        );
        CommandOutcome::Executed { verdict, result }
    }

    /// Copy of the commands submitted for execution, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.entries()
    }

    pub fn history_ref(&self) -> &History {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
