//! Deployment descriptors.
//!
//! A descriptor identifies one artifact being deployed. Descriptors are
//! parsed once from the hook's payload arguments and are read-only from then
//! on; the coordinator shares them between units behind an `Arc`.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while interpreting a descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// Payload is not a JSON descriptor.
    #[error("payload #{index} is not a valid descriptor: {source}")]
    Parse {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact creation date is not RFC3339.
    #[error("artifact create date '{value}' is not RFC3339: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Metadata for one artifact/deployment unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Descriptor {
    /// Job/tracking identifier.
    pub jet_id: String,
    pub organization_name: String,
    pub project_name: String,
    pub artifact_name: String,
    pub artifact_tag: String,
    pub artifact_id: String,
    /// RFC3339 creation timestamp of the artifact.
    pub artifact_create_date: String,
    pub artifact_location: String,
    /// Target environment; the configured default applies when blank.
    pub target_environment: String,
    /// Seal (ownership) identifier.
    pub seal_id: String,
    /// Deployment (change tracking) identifier.
    pub deployment_id: String,
}

impl Descriptor {
    /// Parse a single JSON payload.
    pub fn parse(index: usize, payload: &str) -> Result<Self, DescriptorError> {
        serde_json::from_str(payload).map_err(|source| DescriptorError::Parse { index, source })
    }

    /// Parse every non-blank payload, failing on the first malformed one.
    pub fn parse_all<S: AsRef<str>>(payloads: &[S]) -> Result<Vec<Self>, DescriptorError> {
        payloads
            .iter()
            .map(AsRef::as_ref)
            .enumerate()
            .filter(|(_, p)| !p.trim().is_empty())
            .map(|(index, payload)| Self::parse(index, payload))
            .collect()
    }

    /// Artifact creation time as epoch seconds.
    pub fn artifact_created_epoch(&self) -> Result<i64, DescriptorError> {
        DateTime::parse_from_rfc3339(self.artifact_create_date.trim())
            .map(|ts| ts.timestamp())
            .map_err(|source| DescriptorError::InvalidTimestamp {
                value: self.artifact_create_date.clone(),
                source,
            })
    }
}
