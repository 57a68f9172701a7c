//! Main entry point for rusty-cmd.
//!
//! Loads `.env`, parses configuration, starts file logging, and runs the REPL
//! on a single-threaded runtime.

use anyhow::Result;
use clap::Parser;

use rusty_cmd::app::App;
use rusty_cmd::config::{Config, load_dotenv};
use rusty_cmd::utils::logger::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env before flags so its variables act as env fallbacks
    if let Err(e) = load_dotenv() {
        eprintln!("Warning: Failed to load .env: {}", e);
    }

    let config = Config::parse();

    // Initialize logging before anything else; flushes on drop
    let _log_guard = init_logging(&config.log_dir(), config.debug);

    let mut app = App::new(config)?;
    app.run().await
}
