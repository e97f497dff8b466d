//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Apply flags → Validate → Resolve identity → Parse payloads
//!
//! Cancellation (cancel.rs):
//!     Batch start fixes the deadline → every unit holds a Deadline
//!     → deadline elapses or cancel is triggered → waiting units give up
//!
//! Signals (signals.rs):
//!     SIGINT → Trigger cancellation
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and happens before any check runs
//! - One deadline per batch; units never extend it
//! - Cancellation stops waiting; it does not abort requests already in flight

pub mod cancel;
pub mod signals;
pub mod startup;

pub use cancel::{CancelReason, Cancellation, Deadline};
