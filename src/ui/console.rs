//! Line-oriented console: reads user input and renders output.
//!
//! Reads go through one long-lived `Lines<BufReader<Stdin>>`. `next_line` is
//! cancel safe, so a read abandoned on Ctrl-C or timeout never loses the next
//! line the user types.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::style::{Stylize, style};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::timeout;
use tracing::warn;

use super::panel::{Tone, render_panel, terminal_width};
use super::render::{HELP_TEXT, WELCOME_TEXT, format_history, format_result};
use crate::security::{Confirmation, MatchedRule, Prompter};
use crate::shell::ExecutionResult;
use crate::utils::interrupt::interrupted;

/// One attempt at reading a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Interrupted,
    TimedOut,
    Eof,
}

pub struct Console {
    lines: Lines<BufReader<Stdin>>,
    confirm_timeout: Option<Duration>,
}

impl Console {
    pub fn new(confirm_timeout: Option<Duration>) -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            confirm_timeout,
        }
    }

    /// Prompt for the next user request.
    pub async fn read_request(&mut self) -> io::Result<Input> {
        let prompt = format!("\n{}: ", style("You").cyan().bold());
        self.read_input(&prompt, None).await
    }

    async fn read_input(&mut self, prompt: &str, limit: Option<Duration>) -> io::Result<Input> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let read = self.lines.next_line();
        let bounded = async move {
            match limit {
                Some(limit) => timeout(limit, read).await.ok(),
                None => Some(read.await),
            }
        };

        tokio::select! {
            res = bounded => match res {
                None => {
                    println!();
                    Ok(Input::TimedOut)
                }
                Some(line) => Ok(match line? {
                    Some(line) => Input::Line(line.trim().to_string()),
                    None => Input::Eof,
                }),
            },
            _ = interrupted() => {
                println!();
                Ok(Input::Interrupted)
            }
        }
    }

    fn print_panel(&self, title: &str, body: &str, tone: Tone) {
        println!("{}", render_panel(title, body, tone, terminal_width()));
    }

    pub fn welcome(&self) {
        self.print_panel("Welcome", WELCOME_TEXT, Tone::Normal);
    }

    pub fn help(&self) {
        self.print_panel("Help", HELP_TEXT, Tone::Success);
    }

    pub fn answer(&self, text: &str) {
        self.print_panel("Answer", text, Tone::Success);
    }

    pub fn history(&self, entries: &[String]) {
        println!("{}", format_history(entries));
    }

    pub fn result(&self, result: &ExecutionResult) {
        println!("{}", format_result(result));
    }

    pub fn suggested(&self, command: &str) {
        println!("\n{} {}", style("AI Suggested Command:").bold(), style(command).cyan());
    }

    pub fn thinking(&self) {
        println!("{}", style("Thinking...").dim());
    }

    pub fn info(&self, msg: &str) {
        println!("{}", style(msg).green());
    }

    pub fn notice(&self, msg: &str) {
        println!("{}", style(msg).yellow());
    }

    pub fn error(&self, msg: &str) {
        println!("{}", style(msg).red());
    }
}

impl Prompter for Console {
    fn show_command(&mut self, command: &str, sensitive: bool, reason: Option<&MatchedRule>) {
        if sensitive {
            let mut body = format!("[!] Sensitive command detected\n\nCommand: {}", command);
            if let Some(rule) = reason {
                body.push_str(&format!("\nReason: {}", rule));
            }
            self.print_panel("Sensitive Command", &body, Tone::Danger);
        } else {
            let body = format!("Command to execute:\n\n{}", command);
            self.print_panel("Command Execution", &body, Tone::Normal);
        }
    }

    async fn confirm(&mut self, question: &str) -> Confirmation {
        let prompt = format!("{} (y/n) [n]: ", style(question).red().bold());
        let input = self.read_input(&prompt, self.confirm_timeout).await;
        if matches!(input, Ok(Input::TimedOut)) {
            self.notice("No answer, treating as no.");
        }
        confirmation_from_input(input)
    }

    fn announce_execution(&mut self, _command: &str) {
        println!("{}", style("Executing...").dim());
    }
}

/// Only a typed yes approves; anything that ends the prompt otherwise denies.
fn confirmation_from_input(input: io::Result<Input>) -> Confirmation {
    match input {
        Ok(Input::Line(answer)) => Confirmation::from_answer(&answer),
        Ok(Input::TimedOut) | Ok(Input::Interrupted) | Ok(Input::Eof) => Confirmation::Cancelled,
        Err(e) => {
            warn!("Failed to read confirmation: {}", e);
            Confirmation::Cancelled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(s: &str) -> io::Result<Input> {
        Ok(Input::Line(s.to_string()))
    }

    #[test]
    fn test_typed_answers() {
        assert_eq!(confirmation_from_input(line("y")), Confirmation::Yes);
        assert_eq!(confirmation_from_input(line("Yes")), Confirmation::Yes);
        assert_eq!(confirmation_from_input(line("n")), Confirmation::No);
        assert_eq!(confirmation_from_input(line("")), Confirmation::No);
    }

    #[test]
    fn test_unanswered_prompt_is_cancelled() {
        assert_eq!(confirmation_from_input(Ok(Input::TimedOut)), Confirmation::Cancelled);
        assert_eq!(confirmation_from_input(Ok(Input::Interrupted)), Confirmation::Cancelled);
        assert_eq!(confirmation_from_input(Ok(Input::Eof)), Confirmation::Cancelled);
    }

    #[test]
    fn test_read_error_is_cancelled() {
        let err = io::Error::new(io::ErrorKind::BrokenPipe, "stdin closed");
        assert_eq!(confirmation_from_input(Err(err)), Confirmation::Cancelled);
    }
}
