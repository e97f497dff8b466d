//! Deployment gate library.
//!
//! Runs remote policy checks for a batch of deployment descriptors
//! concurrently and reduces them to a single pass/fail verdict.

pub mod checks;
pub mod cli;
pub mod cluster;
pub mod config;
pub mod coordinator;
pub mod descriptor;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod remote;

pub use config::schema::GateConfig;
pub use coordinator::{BatchReport, BatchVerdict, Coordinator};
pub use error::{GateError, GateResult};
pub use lifecycle::{Cancellation, Deadline};
