//! AI module: natural language to shell command translation.
//!
//! This module provides the translator client, the prompts it sends, and
//! the parser for text replies. Everything it returns is a [`Translation`].

pub mod client;
pub mod parser;
pub mod prompt;

pub use client::{Translator, TranslatorConfig};

use crate::security::Classification;

/// Typed result of translating one user request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// A command the translator did not flag; local policy still applies.
    PlainCommand(String),
    /// A command the translator judged dangerous; always confirmed.
    SensitiveCommand(String),
    /// A direct answer, nothing to execute.
    QuestionAnswer(String),
    /// The request could not be understood.
    Unknown,
    Error(String),
}

impl Translation {
    /// The command to run and the hint for the approval gate, if any.
    pub fn command(&self) -> Option<(&str, Option<Classification>)> {
        match self {
            Translation::PlainCommand(cmd) => Some((cmd.as_str(), None)),
            Translation::SensitiveCommand(cmd) => {
                Some((cmd.as_str(), Some(Classification::Sensitive)))
            }
            _ => None,
        }
    }

    /// Render in the text protocol, for the conversation transcript.
    pub fn transcript(&self) -> String {
        match self {
            Translation::PlainCommand(cmd) => cmd.clone(),
            Translation::SensitiveCommand(cmd) => format!("{} {}", parser::APPROVAL_MARKER, cmd),
            Translation::QuestionAnswer(answer) => format!("{} {}", parser::QUESTION_MARKER, answer),
            Translation::Unknown => parser::UNKNOWN_MARKER.to_string(),
            Translation::Error(msg) => format!("Error: {}", msg),
        }
    }
}
