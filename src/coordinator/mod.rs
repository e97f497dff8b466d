//! Batch coordination.
//!
//! # Data Flow
//! ```text
//! descriptors
//!     → fanout.rs plan (one unit per descriptor and enabled check,
//!                       one change-window unit per batch)
//!     → one task per unit, all sharing the batch Deadline
//!     → typed results channel (one report per unit)
//!     → verdict.rs reduce → BatchReport
//! ```

pub mod fanout;
pub mod verdict;

pub use fanout::Coordinator;
pub use verdict::{reduce, BatchReport, BatchVerdict};
