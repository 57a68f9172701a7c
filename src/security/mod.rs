//! Security module for command classification and approval.
//!
//! This module decides whether a candidate command may run unattended, must
//! be confirmed by the user first, or must not run at all:
//! - `policy`: the keyword set and pattern list (configuration)
//! - `classifier`: pure SAFE/SENSITIVE labelling against a policy
//! - `gate`: the approval gate every command passes through before execution

pub mod classifier;
pub mod gate;
pub mod policy;

pub use classifier::{classify, classify_with_reason, MatchedRule};
pub use gate::{ApprovalDecision, ApprovalGate, Confirmation, GateVerdict, Prompter};
pub use policy::{PolicyFile, SafetyPolicy};

/// Label assigned to a command, either by local heuristics or by the
/// upstream translator as a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Safe,
    Sensitive,
}
