//! Check subsystem.
//!
//! # Data Flow
//! ```text
//! CheckUnit (kind + subject + descriptor)
//!     → steward.rs (derive request, race remote call against the deadline)
//!     → remote client (one HTTP call)
//!     → steward.rs (kind-specific evaluation)
//!         release-readiness: releaseReady flag
//!         change-management: change_window.rs state machine
//!         deployment-report: HTTP 200
//!     → CheckOutcome (Passed | Failed | Errored)
//! ```
//!
//! # Design Decisions
//! - "Service said no" (Failed) and "no answer" (Errored) stay distinct for
//!   diagnostics even though both fail the batch
//! - Stewards never return errors; every failure mode is an outcome

pub mod change_window;
pub mod outcome;
pub mod steward;

pub use outcome::{CheckError, CheckKind, CheckOutcome, CheckReport, CheckSubject};
pub use steward::{CheckUnit, Steward};
