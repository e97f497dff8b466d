//! Remote check services.
//!
//! # Data Flow
//! ```text
//! Steward (owned query / report)
//!     → client.rs (one HTTP request, token header attached)
//!     → RemoteResponse on 2xx
//!     → ClientError::Status on any other status
//!     → ClientError::Transport on connect/timeout/body-read failure
//! ```
//!
//! # Security Constraints
//! - The service token is marked sensitive and never logged

pub mod client;
pub mod types;

pub use client::RemoteCheckClient;
pub use types::{
    ChangeRecord, ClientError, ClientResult, DeploymentReport, ReleaseQuery, ReleaseResponse,
    RemoteResponse,
};
