//! Cluster metadata.
//!
//! # Data Flow
//! ```text
//! cluster.app_name configured
//!     → labels.rs (kubectl get app <name> -n <ns> -o jsonpath={.metadata.labels})
//!     → JSON label map
//!     → sealId / deploymentId labels
//!     → IdentityConfig used by the change-window check
//! ```
//!
//! Any failure here is fatal and happens before the batch starts.

pub mod labels;

pub use labels::{lookup_identity, parse_identity, ClusterError};
