//! Check kinds, subjects and outcomes.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::lifecycle::CancelReason;
use crate::remote::ClientError;

/// The remote checks a gate can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckKind {
    ReleaseReadiness,
    ChangeManagement,
    DeploymentReport,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::ReleaseReadiness => "release-readiness",
            CheckKind::ChangeManagement => "change-management",
            CheckKind::DeploymentReport => "deployment-report",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a check was run against.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckSubject {
    /// One descriptor of the batch, by position.
    Descriptor {
        index: usize,
        jet_id: String,
        artifact: String,
    },
    /// The whole batch (the change window is shared by all descriptors).
    Batch { change_id: String },
}

impl fmt::Display for CheckSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckSubject::Descriptor { jet_id, artifact, .. } => {
                write!(f, "JetId: {} and Image: {}", jet_id, artifact)
            }
            CheckSubject::Batch { change_id } => write!(f, "SnowId: {}", change_id),
        }
    }
}

/// Why a check could not produce a policy answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// Network, timeout or body-read failure.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Remote service answered with a non-2xx status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Response body did not have the expected shape.
    #[error("unparsable response: {0}")]
    Parse(String),

    /// Request could not be derived from the inputs.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The batch deadline or an interrupt ended the wait.
    #[error("{0} before the check completed")]
    Cancelled(CancelReason),

    /// The unit panicked; siblings were unaffected.
    #[error("check panicked: {0}")]
    Panicked(String),
}

impl From<ClientError> for CheckError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(e) => CheckError::Transport(e.to_string()),
            ClientError::Status { status, .. } => CheckError::Status(status),
            ClientError::InvalidRequest(msg) => CheckError::InvalidInput(msg),
        }
    }
}

/// Result of one steward invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The remote policy allows the deployment.
    Passed,
    /// The remote policy answered and said no.
    Failed(String),
    /// No policy answer could be obtained.
    Errored(CheckError),
}

impl CheckOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, CheckOutcome::Passed)
    }

    /// Label used in summary lines.
    pub fn label(&self) -> &'static str {
        if self.is_passed() {
            "SUCCESS"
        } else {
            "FAILURE"
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Passed => write!(f, "passed"),
            CheckOutcome::Failed(reason) => write!(f, "failed: {}", reason),
            CheckOutcome::Errored(cause) => write!(f, "error: {}", cause),
        }
    }
}

/// An outcome together with what produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub kind: CheckKind,
    pub subject: CheckSubject,
    pub outcome: CheckOutcome,
    pub elapsed: Duration,
}

impl CheckReport {
    /// Human-readable summary line.
    pub fn summary_line(&self) -> String {
        match &self.outcome {
            CheckOutcome::Passed => format!("SUCCESS: {} check passed for {}", self.kind, self.subject),
            other => format!("FAILURE: {} check for {} - {}", self.kind, self.subject, other),
        }
    }
}
