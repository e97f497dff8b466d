//! Wire types and error definitions for the remote services.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors that can occur during a remote call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, timeout or body-read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-2xx status.
    #[error("HTTP status {status}")]
    Status { status: u16, body: String },

    /// Request could not be built (bad URL or header value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for remote calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Successful (2xx) response of a remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: String,
}

impl RemoteResponse {
    /// Deserialize the body as JSON.
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Query of the release-readiness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseQuery {
    pub jet_id: String,
    pub git_branch: String,
    pub seal_id: String,
    /// Epoch seconds.
    pub artifact_create_date: i64,
}

impl ReleaseQuery {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("jetId", self.jet_id.clone()),
            ("gitBranch", self.git_branch.clone()),
            ("sealId", self.seal_id.clone()),
            ("artifactCreateDate", self.artifact_create_date.to_string()),
        ]
    }
}

/// Services send `null` for empty values; treat it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of a release-readiness response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReleaseResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub jet_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub release_ready: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub jet_console_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub release_ready_message: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub regulations: Vec<Regulation>,
}

/// Regulation attached to a release-readiness response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Regulation {
    #[serde(deserialize_with = "null_as_default")]
    pub regulation_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub effective_date: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub enforcement_date: i64,
}

/// Change-management record returned for a change id.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    /// RFC3339.
    #[serde(deserialize_with = "null_as_default")]
    pub start_time: String,
    /// RFC3339.
    #[serde(deserialize_with = "null_as_default")]
    pub end_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub main_configuration_item: ConfigurationItem,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigurationItem {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub number: ConfigurationItemNumber,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigurationItemNumber {
    /// `"<seal>:<deployment>"`.
    #[serde(deserialize_with = "null_as_default")]
    pub identifier: String,
}

/// Deployment record submitted after a sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentReport {
    pub event_status: String,
    pub deploy_tool: String,
    pub seal_id: String,
    pub jet_id: String,
    pub repo_name: String,
    pub project_name: String,
    pub branch: String,
    pub commit_id: String,
    /// Source repository the deployment was built from.
    pub source_uri: String,
    pub artifact_id: String,
    pub artifact_location: String,
    pub target_environment: String,
    pub initiator: String,
}
