//! Interactive REPL.
//!
//! The [`App`] wires the console, the translator and the [`Session`] together:
//! read a line, translate it, and hand any resulting command to the session.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::ai::{Translation, Translator};
use crate::config::Config;
use crate::context::ContextSnapshot;
use crate::security::{ApprovalGate, Classification};
use crate::session::{CommandOutcome, Session};
use crate::shell::ExecutionEngine;
use crate::ui::console::{Console, Input};
use crate::utils::interrupt::interrupted;

/// A line the REPL handles itself instead of translating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Builtin<'a> {
    Help,
    History,
    ClearHistory,
    ClearConversation,
    Exit,
    /// `!<command>`: skip translation, keep the gate.
    Direct(&'a str),
}

impl<'a> Builtin<'a> {
    pub fn parse(line: &'a str) -> Option<Self> {
        if let Some(cmd) = line.strip_prefix('!') {
            let cmd = cmd.trim();
            return (!cmd.is_empty()).then_some(Builtin::Direct(cmd));
        }
        match line.to_lowercase().as_str() {
            "help" => Some(Builtin::Help),
            "history" => Some(Builtin::History),
            "history clear" => Some(Builtin::ClearHistory),
            "clear" => Some(Builtin::ClearConversation),
            "exit" | "quit" | "q" => Some(Builtin::Exit),
            _ => None,
        }
    }
}

pub struct App {
    console: Console,
    translator: Translator,
    session: Session,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let policy = config
            .safety_policy()
            .context("Failed to load safety policy")?;
        let execution = config.execution();
        info!(
            "Starting with shell {}, command timeout {:?}, model {}",
            execution.shell, execution.timeout, config.model
        );

        Ok(Self {
            console: Console::new(config.confirm_timeout()),
            translator: Translator::new(config.translator()),
            session: Session::new(ApprovalGate::new(policy), ExecutionEngine::new(execution)),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.console.welcome();
        if !self.translator.is_configured() {
            self.console.notice(
                "AI service not configured. Set AI_API_KEY to enable translation; `!<command>` still works.",
            );
        }

        loop {
            let line = match self
                .console
                .read_request()
                .await
                .context("Failed to read input")?
            {
                Input::Line(line) => line,
                Input::Interrupted => {
                    self.console.notice("Input cancelled. Type `exit` to quit.");
                    continue;
                }
                Input::TimedOut => continue,
                Input::Eof => break,
            };

            if line.is_empty() {
                continue;
            }

            match Builtin::parse(&line) {
                Some(Builtin::Exit) => break,
                Some(Builtin::Help) => self.console.help(),
                Some(Builtin::History) => self.console.history(&self.session.history()),
                Some(Builtin::ClearHistory) => {
                    self.session.clear_history();
                    self.console.info("Command history cleared");
                }
                Some(Builtin::ClearConversation) => {
                    self.translator.clear_conversation();
                    self.console.info("Conversation context cleared");
                }
                Some(Builtin::Direct(cmd)) => self.run_command(cmd, None).await,
                None => self.handle_request(&line).await,
            }
        }

        self.console.info("Goodbye!");
        info!("Session ended");
        Ok(())
    }

    async fn handle_request(&mut self, request: &str) {
        debug!("User request: {}", request);
        self.console.thinking();

        let snapshot = ContextSnapshot::capture(self.session.history_ref());
        let translation = tokio::select! {
            t = self.translator.translate(request, &snapshot) => Some(t),
            _ = interrupted() => None,
        };
        let Some(translation) = translation else {
            self.console.notice("Request cancelled");
            return;
        };

        match &translation {
            Translation::QuestionAnswer(answer) => self.console.answer(answer),
            Translation::Unknown => self
                .console
                .notice("Sorry, I couldn't understand your request. Please try rephrasing it."),
            Translation::Error(msg) => self.console.error(&format!("Error: {}", msg)),
            Translation::PlainCommand(_) | Translation::SensitiveCommand(_) => {
                if let Some((cmd, hint)) = translation.command() {
                    self.console.suggested(cmd);
                    self.run_command(cmd, hint).await;
                }
            }
        }
    }

    async fn run_command(&mut self, command: &str, hint: Option<Classification>) {
        let outcome = self
            .session
            .process_one_command(command, hint, &mut self.console)
            .await;

        match outcome {
            CommandOutcome::Denied => self.console.notice("Command execution cancelled"),
            CommandOutcome::Executed { result, .. } => {
                if !result.succeeded {
                    warn!("Command did not succeed: {}", command);
                }
                self.console.result(&result);
            }
        }
    }
}
