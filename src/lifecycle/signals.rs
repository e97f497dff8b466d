//! OS signal handling.
//!
//! An interrupt (Ctrl-C / SIGINT) cancels the running batch the same way the
//! deadline does: every unit still waiting reports itself cancelled and the
//! verdict is produced normally.

use std::sync::Arc;

use crate::lifecycle::cancel::Cancellation;

/// Cancel `cancellation` when the process receives an interrupt.
pub fn cancel_on_interrupt(cancellation: Arc<Cancellation>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Interrupt received, cancelling outstanding checks");
                cancellation.trigger();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for interrupt signal");
            }
        }
    });
}
