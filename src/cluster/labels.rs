//! Identity lookup from application labels.

use std::collections::HashMap;
use thiserror::Error;
use tokio::process::Command;

use crate::config::{ClusterConfig, IdentityConfig};

const SEAL_LABEL: &str = "sealId";
const DEPLOYMENT_LABEL: &str = "deploymentId";

/// Errors raised while resolving identity from the cluster.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Command {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("application labels are not a JSON string map: {0}")]
    Labels(#[from] serde_json::Error),

    #[error("application has no '{0}' label")]
    MissingLabel(&'static str),
}

/// Resolve seal/deployment ids from the labels of `app_name`.
pub async fn lookup_identity(
    config: &ClusterConfig,
    app_name: &str,
) -> Result<IdentityConfig, ClusterError> {
    tracing::info!(app = %app_name, namespace = %config.namespace, "Looking up application labels");

    let output = Command::new(&config.kubectl)
        .args(["get", "app", app_name, "-n", config.namespace.as_str()])
        .args(["-o", "jsonpath={.metadata.labels}"])
        .output()
        .await
        .map_err(|source| ClusterError::Spawn {
            program: config.kubectl.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(ClusterError::Command {
            program: config.kubectl.clone(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let identity = parse_identity(&String::from_utf8_lossy(&output.stdout))?;
    tracing::info!(
        seal_id = ?identity.seal_id,
        deployment_id = ?identity.deployment_id,
        "Resolved identity from cluster"
    );
    Ok(identity)
}

/// Extract the identity labels from a jsonpath label dump.
pub fn parse_identity(raw: &str) -> Result<IdentityConfig, ClusterError> {
    // Some shells pass the jsonpath quoted, which kubectl echoes back.
    let trimmed = raw.trim().trim_matches('\'');
    let labels: HashMap<String, String> = serde_json::from_str(trimmed)?;

    let label = |name: &'static str| {
        labels
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ClusterError::MissingLabel(name))
    };

    Ok(IdentityConfig {
        seal_id: Some(label(SEAL_LABEL)?),
        deployment_id: Some(label(DEPLOYMENT_LABEL)?),
    })
}
