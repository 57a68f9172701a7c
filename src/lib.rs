//! rusty-cmd - natural-language shell commands behind a safety gate.
//!
//! A request is translated into a shell command, classified as safe or
//! sensitive, confirmed when needed, and run with a timeout:
//! - [`security`]: keyword/pattern classifier and the approval gate
//! - [`shell`]: process execution with timeout and process-group cleanup
//! - [`session`]: the per-command orchestration and command history
//! - [`ai`]: the translation client and its typed [`ai::Translation`]
//!
//! # Example
//!
//! ```no_run
//! use rusty_cmd::security::{ApprovalGate, SafetyPolicy};
//! use rusty_cmd::session::Session;
//! use rusty_cmd::shell::{ExecutionConfig, ExecutionEngine};
//! use rusty_cmd::ui::Console;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let gate = ApprovalGate::new(SafetyPolicy::default());
//!     let mut session = Session::new(gate, ExecutionEngine::new(ExecutionConfig::default()));
//!     let mut console = Console::new(None);
//!
//!     // Safe: runs right away. Sensitive: asks on the console first.
//!     session.process_one_command("ls -la", None, &mut console).await;
//!     println!("{:?}", session.history());
//! }
//! ```

pub mod ai;
pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod security;
pub mod session;
pub mod shell;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use ai::{Translation, Translator};
pub use app::App;
pub use config::Config;
pub use security::{ApprovalDecision, ApprovalGate, Classification, SafetyPolicy, classify};
pub use session::{CommandOutcome, Session};
pub use shell::{ExecutionEngine, ExecutionResult};
