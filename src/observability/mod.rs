//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Coordinator and stewards produce:
//!     → structured tracing events (run_id, kind, subject, elapsed_ms)
//!     → logging.rs subscriber (plain or JSON, stderr)
//!
//! Caller produces:
//!     → one SUCCESS/FAILURE summary line per check on stdout
//! ```

pub mod logging;

pub use logging::init_logging;
