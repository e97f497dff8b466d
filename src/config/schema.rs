//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root configuration for one gate invocation.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Which side of the deployment this run gates.
    pub sync_type: Option<SyncType>,

    /// Remote service endpoints. An absent endpoint disables its check.
    pub endpoints: EndpointConfig,

    /// Authentication for the remote services.
    pub auth: AuthConfig,

    /// Seal/deployment identity expected in change records.
    pub identity: IdentityConfig,

    /// Source control context of the pipeline run.
    pub git: GitConfig,

    /// Deployment report settings.
    pub report: ReportConfig,

    /// Deadline and fan-out settings.
    pub execution: ExecutionConfig,

    /// Outbound HTTP client settings.
    pub http: HttpConfig,

    /// Cluster metadata lookup settings.
    pub cluster: ClusterConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Raw deployment descriptors (JSON documents).
    pub payloads: Vec<String>,
}

/// Pipeline hook the gate is running as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncType {
    /// Before the deployment: release-readiness and change-window checks.
    Presync,
    /// After the deployment: deployment reports.
    Postsync,
}

impl fmt::Display for SyncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncType::Presync => write!(f, "presync"),
            SyncType::Postsync => write!(f, "postsync"),
        }
    }
}

impl FromStr for SyncType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "presync" => Ok(SyncType::Presync),
            "postsync" => Ok(SyncType::Postsync),
            other => Err(format!(
                "sync type should either be presync or postsync, got '{}'",
                other
            )),
        }
    }
}

/// Remote service endpoints.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EndpointConfig {
    /// Release-readiness check URL.
    pub release_check_url: Option<String>,

    /// Change-management (ServiceNow) check URL.
    pub change_check_url: Option<String>,

    /// Deployment report submission URL.
    pub submit_deployment_url: Option<String>,
}

impl EndpointConfig {
    /// Release-readiness URL, if configured and non-blank.
    pub fn release_check(&self) -> Option<&str> {
        non_blank(&self.release_check_url)
    }

    /// Change-management URL, if configured and non-blank.
    pub fn change_check(&self) -> Option<&str> {
        non_blank(&self.change_check_url)
    }

    /// Deployment report URL, if configured and non-blank.
    pub fn submit_deployment(&self) -> Option<&str> {
        non_blank(&self.submit_deployment_url)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Authentication configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Service token sent in the auth header of every request.
    pub token: String,

    /// Header carrying the token.
    pub header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            header: default_auth_header(),
        }
    }
}

// Keeps the token out of logs.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &if self.token.is_empty() { "<unset>" } else { "<redacted>" })
            .field("header", &self.header)
            .finish()
    }
}

fn default_auth_header() -> String {
    "X-OpsMx-Auth".to_string()
}

/// Seal/deployment identity the change record must match.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct IdentityConfig {
    /// Seal (ownership) identifier.
    pub seal_id: Option<String>,

    /// Deployment (change tracking) identifier.
    pub deployment_id: Option<String>,
}

/// Source control context.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GitConfig {
    /// Branch being deployed.
    pub branch: String,

    /// Last commit message; carries the change id when none is given.
    pub last_commit_message: String,

    /// Last commit id.
    pub last_commit_id: String,

    /// Source repository URL.
    pub repo_url: String,

    /// Explicit change-management record id.
    pub change_id: Option<String>,
}

impl GitConfig {
    /// Change record id: the explicit id, else the trimmed commit message.
    pub fn change_id(&self) -> String {
        match non_blank(&self.change_id) {
            Some(id) => id.to_string(),
            None => self.last_commit_message.trim().to_string(),
        }
    }
}

/// Deployment report configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Deployment tool recorded in reports.
    pub deploy_tool: String,

    /// Who initiated the deployment.
    pub initiator: String,

    /// Fallback target environment for descriptors that carry none.
    pub target_environment: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            deploy_tool: "ArgoCD".to_string(),
            initiator: "ArgoCD".to_string(),
            target_environment: String::new(),
        }
    }
}

/// Deadline and fan-out configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Shared deadline for the whole batch, in seconds.
    pub timeout_secs: u64,

    /// Upper bound on concurrently running checks (unbounded when unset).
    pub max_concurrency: Option<usize>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 600,
            max_concurrency: None,
        }
    }
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 600,
            user_agent: concat!("deploy-gate/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Cluster metadata lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Deployed application whose labels carry the identity.
    pub app_name: Option<String>,

    /// Namespace of the application resource.
    pub namespace: String,

    /// kubectl binary to invoke.
    pub kubectl: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            app_name: None,
            namespace: "argocd".to_string(),
            kubectl: "kubectl".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
