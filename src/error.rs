//! Top-level error type.
//!
//! Only setup failures surface here. Once the batch has started, every
//! problem is captured as a check outcome instead.

use thiserror::Error;

use crate::cluster::ClusterError;
use crate::config::ConfigError;
use crate::descriptor::DescriptorError;
use crate::remote::ClientError;

/// Fatal errors raised before any check runs.
#[derive(Debug, Error)]
pub enum GateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error("cluster metadata lookup failed: {0}")]
    Cluster(#[from] ClusterError),

    #[error("cannot build HTTP client: {0}")]
    Client(#[from] ClientError),
}

/// Result type for gate setup.
pub type GateResult<T> = Result<T, GateError>;
