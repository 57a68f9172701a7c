//! Approval gate enforced before any command execution.
//!
//! Every command goes through [`ApprovalGate::decide`] exactly once. The gate
//! renders the command, consults the classifier unless the translator already
//! flagged the command, and asks the user when confirmation is needed.

use tracing::{debug, info};

use super::{Classification, MatchedRule, SafetyPolicy, classifier};

/// Outcome of the approval step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    /// Classified safe locally, no prompt shown.
    AutoApproved,
    /// The user answered yes.
    UserApproved,
    /// The user answered no, gave no clear answer, or cancelled.
    UserDenied,
}

impl ApprovalDecision {
    pub fn is_approved(self) -> bool {
        !matches!(self, ApprovalDecision::UserDenied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateVerdict {
    pub decision: ApprovalDecision,
    pub displayed_as_sensitive: bool,
}

/// Raw answer to a single confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    /// Interrupt, end of input, or prompt timeout.
    Cancelled,
}

impl Confirmation {
    /// Interpret a typed answer. Only an explicit yes approves.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => Confirmation::Yes,
            _ => Confirmation::No,
        }
    }
}

/// The gate's view of the user: somewhere to show a command and ask about it.
#[allow(async_fn_in_trait)]
pub trait Prompter {
    /// Render the command, styled as sensitive or normal.
    fn show_command(&mut self, command: &str, sensitive: bool, reason: Option<&MatchedRule>);

    /// Ask a yes/no question whose default is no.
    async fn confirm(&mut self, question: &str) -> Confirmation;

    /// Called once an approved command is about to run.
    fn announce_execution(&mut self, _command: &str) {}
}

pub const HINTED_QUESTION: &str = "This command was flagged as dangerous. Continue execution?";
pub const SENSITIVE_QUESTION: &str = "This is a sensitive command, continue execution?";

pub struct ApprovalGate {
    policy: SafetyPolicy,
}

impl ApprovalGate {
    pub fn new(policy: SafetyPolicy) -> Self {
        Self { policy }
    }

    /// Decide whether `command` may run.
    ///
    /// A `Sensitive` hint skips local classification and goes straight to the
    /// prompt. A `Safe` hint or no hint runs the classifier, so local policy can
    /// still escalate a command the translator considered harmless.
    pub async fn decide<P: Prompter>(
        &self,
        command: &str,
        hint: Option<Classification>,
        prompter: &mut P,
    ) -> GateVerdict {
        if hint == Some(Classification::Sensitive) {
            debug!("Command flagged upstream, skipping local classification: {}", command);
            prompter.show_command(command, true, None);
            let decision = Self::ask(prompter, HINTED_QUESTION).await;
            return GateVerdict {
                decision,
                displayed_as_sensitive: true,
            };
        }

        match classifier::classify_with_reason(command, &self.policy) {
            None => {
                prompter.show_command(command, false, None);
                info!("Command auto-approved: {}", command);
                GateVerdict {
                    decision: ApprovalDecision::AutoApproved,
                    displayed_as_sensitive: false,
                }
            }
            Some(rule) => {
                debug!("Command classified sensitive ({}): {}", rule, command);
                prompter.show_command(command, true, Some(&rule));
                let decision = Self::ask(prompter, SENSITIVE_QUESTION).await;
                GateVerdict {
                    decision,
                    displayed_as_sensitive: true,
                }
            }
        }
    }

    async fn ask<P: Prompter>(prompter: &mut P, question: &str) -> ApprovalDecision {
        let answer = prompter.confirm(question).await;
        info!("Confirmation answer: {:?}", answer);
        match answer {
            Confirmation::Yes => ApprovalDecision::UserApproved,
            Confirmation::No | Confirmation::Cancelled => ApprovalDecision::UserDenied,
        }
    }
}

/// Prompter that replays canned answers; used by tests across the crate.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::*;

    #[derive(Default)]
    pub(crate) struct ScriptedPrompter {
        answers: VecDeque<Confirmation>,
        pub shown: Vec<(String, bool)>,
        pub questions: Vec<String>,
        pub announced: Vec<String>,
    }

    impl ScriptedPrompter {
        pub(crate) fn answering(answers: impl IntoIterator<Item = Confirmation>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                ..Self::default()
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn show_command(&mut self, command: &str, sensitive: bool, _reason: Option<&MatchedRule>) {
            self.shown.push((command.to_string(), sensitive));
        }

        async fn confirm(&mut self, question: &str) -> Confirmation {
            self.questions.push(question.to_string());
            // Running out of script behaves like end of input.
            self.answers.pop_front().unwrap_or(Confirmation::Cancelled)
        }

        fn announce_execution(&mut self, command: &str) {
            self.announced.push(command.to_string());
        }
    }
}
