//! Batch deadline and cancellation.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Instant};

const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Why a unit stopped waiting for its remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The shared batch deadline elapsed.
    DeadlineElapsed,
    /// The run was interrupted (e.g. Ctrl-C).
    Interrupted,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::DeadlineElapsed => write!(f, "timed out"),
            CancelReason::Interrupted => write!(f, "cancelled"),
        }
    }
}

/// Owner side of the batch cancellation signal.
///
/// Created once when the batch begins; fixes the deadline for every unit.
pub struct Cancellation {
    tx: watch::Sender<bool>,
    deadline: Instant,
}

impl Cancellation {
    /// Start the clock: the deadline is `timeout` from now.
    ///
    /// Timeouts too large to represent are capped at roughly thirty years.
    pub fn new(timeout: Duration) -> Self {
        let (tx, _) = watch::channel(false);
        let now = Instant::now();
        let deadline = now
            .checked_add(timeout)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        Self { tx, deadline }
    }

    /// A read-only view of the deadline for one unit.
    pub fn deadline(&self) -> Deadline {
        Deadline {
            at: self.deadline,
            cancelled: self.tx.subscribe(),
        }
    }

    /// Cancel every unit still waiting.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Shared deadline as seen by one unit.
#[derive(Clone)]
pub struct Deadline {
    at: Instant,
    cancelled: watch::Receiver<bool>,
}

impl Deadline {
    /// Point in time at which the batch gives up.
    pub fn instant(&self) -> Instant {
        self.at
    }

    /// Resolves once the deadline passes or the batch is cancelled.
    pub async fn expired(&mut self) -> CancelReason {
        let at = self.at;
        let cancelled = &mut self.cancelled;
        tokio::select! {
            _ = time::sleep_until(at) => CancelReason::DeadlineElapsed,
            signalled = async { cancelled.wait_for(|c| *c).await.is_ok() } => {
                if signalled {
                    CancelReason::Interrupted
                } else {
                    // Owner dropped without cancelling: only the clock remains.
                    time::sleep_until(at).await;
                    CancelReason::DeadlineElapsed
                }
            }
        }
    }
}
