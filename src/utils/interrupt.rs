//! Ctrl-C as a future.
//!
//! Once a Ctrl-C listener is registered the process no longer dies on SIGINT,
//! so every blocking wait (input, confirmation, execution) selects on
//! [`interrupted`] and decides for itself what an interrupt means.

use tracing::warn;

/// Resolves on the next Ctrl-C.
///
/// If the signal handler cannot be installed this never resolves, leaving the
/// default behaviour in place instead of reporting a spurious interrupt.
pub async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
