//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for Ctrl+C (SIGINT)
//! - Translate it into a shutdown trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)

use crate::lifecycle::Shutdown;

/// Trigger `shutdown` when Ctrl+C is received.
pub async fn forward_ctrl_c(shutdown: Shutdown) {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to install Ctrl+C handler");
        return;
    }
    shutdown.trigger("ctrl-c");
}
