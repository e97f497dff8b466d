//! Command-line interface of the pipeline hook.
//!
//! Every flag is optional so a TOML file can supply the rest; flags that are
//! given override the file.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{GateConfig, SyncType};

#[derive(Debug, Parser)]
#[command(name = "deploy-gate")]
#[command(about = "Gates deployments on remote release, change-window and reporting checks", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// presync (validate before deploying) or postsync (report after deploying).
    #[arg(short = 'y', long)]
    pub sync_type: Option<SyncType>,

    /// Release-readiness check URL.
    #[arg(short = 'u', long)]
    pub release_check_url: Option<String>,

    /// Change-management check URL.
    #[arg(short = 's', long)]
    pub servicenow_check_url: Option<String>,

    /// Deployment report submission URL.
    #[arg(short = 'd', long)]
    pub submit_deployment_url: Option<String>,

    /// Service token for the remote services.
    #[arg(short = 't', long)]
    pub service_token: Option<String>,

    /// Deployment descriptor as JSON; repeat for every artifact.
    #[arg(short = 'p', long = "payload", value_name = "JSON")]
    pub payloads: Vec<String>,

    /// Branch being deployed.
    #[arg(short = 'b', long)]
    pub git_branch: Option<String>,

    /// Last commit message (carries the change id).
    #[arg(short = 'c', long)]
    pub git_last_commit_message: Option<String>,

    /// Last commit id.
    #[arg(long, alias = "git-last-commitId")]
    pub git_last_commit_id: Option<String>,

    /// Source repository URL.
    #[arg(long)]
    pub repo_url: Option<String>,

    /// Target environment recorded in deployment reports.
    #[arg(long)]
    pub target_environment: Option<String>,

    /// Change-management record id (defaults to the last commit message).
    #[arg(long)]
    pub change_id: Option<String>,

    /// Seal id the change record must carry.
    #[arg(long, alias = "sealId")]
    pub seal_id: Option<String>,

    /// Deployment id the change record must carry.
    #[arg(long, alias = "deploymentId")]
    pub deployment_id: Option<String>,

    /// Application whose labels provide the seal and deployment ids.
    #[arg(long)]
    pub argocd_app_name: Option<String>,

    /// Namespace of the application resource.
    #[arg(long)]
    pub argocd_namespace: Option<String>,

    /// Deadline for the whole batch, in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Maximum number of checks running at once.
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(self, config: &mut GateConfig) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        fn set_some<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        set_some(&mut config.sync_type, self.sync_type);
        set_some(&mut config.endpoints.release_check_url, self.release_check_url);
        set_some(&mut config.endpoints.change_check_url, self.servicenow_check_url);
        set_some(&mut config.endpoints.submit_deployment_url, self.submit_deployment_url);
        set(&mut config.auth.token, self.service_token);

        if !self.payloads.is_empty() {
            config.payloads = self.payloads;
        }

        set(&mut config.git.branch, self.git_branch);
        set(&mut config.git.last_commit_message, self.git_last_commit_message);
        set(&mut config.git.last_commit_id, self.git_last_commit_id);
        set(&mut config.git.repo_url, self.repo_url);
        set_some(&mut config.git.change_id, self.change_id);
        set(&mut config.report.target_environment, self.target_environment);

        set_some(&mut config.identity.seal_id, self.seal_id);
        set_some(&mut config.identity.deployment_id, self.deployment_id);
        set_some(&mut config.cluster.app_name, self.argocd_app_name);
        set(&mut config.cluster.namespace, self.argocd_namespace);

        set(&mut config.execution.timeout_secs, self.timeout_secs);
        set_some(&mut config.execution.max_concurrency, self.max_concurrency);

        set(&mut config.observability.log_level, self.log_level);
        if self.json_logs {
            config.observability.json_logs = true;
        }
    }
}
