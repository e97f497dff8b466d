//! Check stewards.
//!
//! # Responsibilities
//! - Derive the remote request for one unit (descriptor + check kind)
//! - Race the remote call against the batch deadline
//! - Normalize the response into a `CheckOutcome`
//!
//! # Design Decisions
//! - The remote call runs in its own task; when the deadline wins, the
//!   steward stops waiting and the request is left to finish on its own
//! - Every failure mode becomes an outcome; nothing is propagated upward

use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::checks::change_window::{self, ExpectedIdentity};
use crate::checks::outcome::{CheckError, CheckKind, CheckOutcome, CheckSubject};
use crate::config::GateConfig;
use crate::descriptor::Descriptor;
use crate::lifecycle::Deadline;
use crate::remote::{
    ChangeRecord, ClientResult, DeploymentReport, ReleaseQuery, ReleaseResponse,
    RemoteCheckClient, RemoteResponse,
};

const REPORT_EVENT_STATUS: &str = "SUCCESS";

/// One unit of work for the coordinator.
#[derive(Debug, Clone)]
pub struct CheckUnit {
    pub kind: CheckKind,
    pub subject: CheckSubject,
    /// Absent for batch-wide checks.
    pub descriptor: Option<Arc<Descriptor>>,
}

impl CheckUnit {
    /// A per-descriptor unit.
    pub fn for_descriptor(kind: CheckKind, index: usize, descriptor: Arc<Descriptor>) -> Self {
        Self {
            kind,
            subject: CheckSubject::Descriptor {
                index,
                jet_id: descriptor.jet_id.clone(),
                artifact: descriptor.artifact_name.clone(),
            },
            descriptor: Some(descriptor),
        }
    }

    /// A unit that gates the whole batch.
    pub fn for_batch(kind: CheckKind, change_id: String) -> Self {
        Self {
            kind,
            subject: CheckSubject::Batch { change_id },
            descriptor: None,
        }
    }
}

/// Fully derived remote call, owned so it can move into its own task.
#[derive(Debug, Clone)]
enum RemoteCall {
    Get {
        url: String,
        query: Vec<(&'static str, String)>,
    },
    Post {
        url: String,
        report: DeploymentReport,
    },
}

impl RemoteCall {
    async fn send(self, client: RemoteCheckClient) -> ClientResult<RemoteResponse> {
        match self {
            RemoteCall::Get { url, query } => client.get(&url, &query).await,
            RemoteCall::Post { url, report } => client.post_json(&url, &report).await,
        }
    }
}

/// Runs units against the remote services.
#[derive(Clone)]
pub struct Steward {
    client: RemoteCheckClient,
    config: Arc<GateConfig>,
}

impl Steward {
    pub fn new(client: RemoteCheckClient, config: Arc<GateConfig>) -> Self {
        Self { client, config }
    }

    /// Run one unit to completion or until the deadline.
    pub async fn run(&self, unit: &CheckUnit, mut deadline: Deadline) -> CheckOutcome {
        let call = match self.prepare(unit) {
            Ok(call) => call,
            Err(e) => return CheckOutcome::Errored(e),
        };

        tracing::debug!(kind = %unit.kind, subject = %unit.subject, "Starting remote check");

        let client = self.client.clone();
        let in_flight = tokio::spawn(call.send(client));

        match await_call(in_flight, &mut deadline).await {
            Ok(Ok(response)) => self.evaluate(unit.kind, &response),
            Ok(Err(e)) => CheckOutcome::Errored(e.into()),
            Err(e) => {
                if let CheckError::Cancelled(reason) = &e {
                    tracing::warn!(kind = %unit.kind, subject = %unit.subject, %reason, "Abandoning remote check");
                }
                CheckOutcome::Errored(e)
            }
        }
    }

    fn prepare(&self, unit: &CheckUnit) -> Result<RemoteCall, CheckError> {
        let endpoints = &self.config.endpoints;
        let url = match unit.kind {
            CheckKind::ReleaseReadiness => endpoints.release_check(),
            CheckKind::ChangeManagement => endpoints.change_check(),
            CheckKind::DeploymentReport => endpoints.submit_deployment(),
        }
        .ok_or_else(|| CheckError::InvalidInput(format!("no endpoint configured for {}", unit.kind)))?
        .to_string();

        match unit.kind {
            CheckKind::ReleaseReadiness => {
                let query = self.release_query(require_descriptor(unit)?)?;
                Ok(RemoteCall::Get {
                    url,
                    query: query.to_query(),
                })
            }
            CheckKind::ChangeManagement => Ok(RemoteCall::Get {
                url,
                query: vec![("snowId", self.config.git.change_id())],
            }),
            CheckKind::DeploymentReport => {
                let report = self.deployment_report(require_descriptor(unit)?)?;
                Ok(RemoteCall::Post { url, report })
            }
        }
    }

    /// Query for the release-readiness service.
    pub fn release_query(&self, descriptor: &Descriptor) -> Result<ReleaseQuery, CheckError> {
        let created = descriptor
            .artifact_created_epoch()
            .map_err(|e| CheckError::InvalidInput(e.to_string()))?;

        Ok(ReleaseQuery {
            jet_id: descriptor.jet_id.clone(),
            git_branch: self.config.git.branch.clone(),
            seal_id: descriptor.seal_id.clone(),
            artifact_create_date: created,
        })
    }

    /// Deployment record for the reporting service.
    pub fn deployment_report(&self, descriptor: &Descriptor) -> Result<DeploymentReport, CheckError> {
        let git = &self.config.git;
        let report = &self.config.report;
        let repo_name = repo_name(&git.repo_url).ok_or_else(|| {
            CheckError::InvalidInput(format!("cannot derive repository name from '{}'", git.repo_url))
        })?;

        let target_environment = if descriptor.target_environment.trim().is_empty() {
            report.target_environment.clone()
        } else {
            descriptor.target_environment.clone()
        };

        Ok(DeploymentReport {
            event_status: REPORT_EVENT_STATUS.to_string(),
            deploy_tool: report.deploy_tool.clone(),
            seal_id: descriptor.seal_id.clone(),
            jet_id: descriptor.jet_id.clone(),
            repo_name,
            project_name: descriptor.project_name.clone(),
            branch: git.branch.clone(),
            commit_id: git.last_commit_id.clone(),
            source_uri: git.repo_url.trim().to_string(),
            artifact_id: descriptor.artifact_id.clone(),
            artifact_location: descriptor.artifact_location.clone(),
            target_environment,
            initiator: report.initiator.clone(),
        })
    }

    fn evaluate(&self, kind: CheckKind, response: &RemoteResponse) -> CheckOutcome {
        match kind {
            CheckKind::ReleaseReadiness => match response.json::<ReleaseResponse>() {
                Err(e) => CheckOutcome::Errored(CheckError::Parse(e.to_string())),
                Ok(release) if release.release_ready => CheckOutcome::Passed,
                Ok(release) => {
                    let mut reason = "release is not ready".to_string();
                    if !release.release_ready_message.is_empty() {
                        reason.push_str(": ");
                        reason.push_str(&release.release_ready_message.join("; "));
                    }
                    if !release.jet_console_url.is_empty() {
                        reason.push_str(&format!(" (see {})", release.jet_console_url));
                    }
                    CheckOutcome::Failed(reason)
                }
            },
            CheckKind::ChangeManagement => match response.json::<ChangeRecord>() {
                Err(e) => CheckOutcome::Errored(CheckError::Parse(e.to_string())),
                Ok(record) => match self.expected_identity() {
                    None => CheckOutcome::Errored(CheckError::InvalidInput(
                        "seal and deployment ids are not configured".to_string(),
                    )),
                    Some(expected) => match change_window::evaluate(&record, &expected, Utc::now()) {
                        Ok(()) => CheckOutcome::Passed,
                        Err(violation) => CheckOutcome::Failed(violation.to_string()),
                    },
                },
            },
            CheckKind::DeploymentReport => {
                if response.status == 200 {
                    CheckOutcome::Passed
                } else {
                    CheckOutcome::Failed(format!(
                        "report submission answered {} instead of 200",
                        response.status
                    ))
                }
            }
        }
    }

    fn expected_identity(&self) -> Option<ExpectedIdentity> {
        let identity = &self.config.identity;
        Some(ExpectedIdentity {
            seal_id: identity.seal_id.clone()?,
            deployment_id: identity.deployment_id.clone()?,
        })
    }
}

/// Wait for a spawned call unless the deadline comes first. The call task is
/// left running when the deadline wins.
async fn await_call<T>(in_flight: JoinHandle<T>, deadline: &mut Deadline) -> Result<T, CheckError> {
    tokio::select! {
        biased;
        joined = in_flight => joined.map_err(|e| CheckError::Panicked(e.to_string())),
        reason = deadline.expired() => Err(CheckError::Cancelled(reason)),
    }
}

fn require_descriptor(unit: &CheckUnit) -> Result<&Descriptor, CheckError> {
    unit.descriptor
        .as_deref()
        .ok_or_else(|| CheckError::InvalidInput(format!("{} needs a descriptor", unit.kind)))
}

/// Last path segment of a repository URL, ignoring a trailing slash.
pub fn repo_name(repo_url: &str) -> Option<String> {
    let trimmed = repo_url.trim().trim_end_matches('/');
    let (_, name) = trimmed.rsplit_once('/')?;
    let name = name.trim_end_matches(".git");
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
