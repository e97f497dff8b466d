//! Descriptor fan-out.
//!
//! # Responsibilities
//! - Plan one unit per (descriptor, enabled check) plus batch-wide units
//! - Spawn every unit concurrently under the shared deadline
//! - Collect exactly one report per unit on a typed channel
//! - Reduce the reports to a verdict
//!
//! # Design Decisions
//! - Completion is the channel closing: each unit owns one sender and drops
//!   it after its single send, so `recv()` returns `None` once all are done
//! - No short-circuit: a failure does not cancel siblings, so every outcome
//!   is logged before the verdict is returned
//! - A panicking unit is caught and reported as errored

use futures_util::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::checks::{CheckError, CheckKind, CheckOutcome, CheckReport, CheckUnit, Steward};
use crate::config::{GateConfig, SyncType};
use crate::coordinator::verdict::BatchReport;
use crate::descriptor::Descriptor;
use crate::lifecycle::Deadline;
use crate::remote::RemoteCheckClient;

/// Runs a batch of descriptors through the enabled checks.
pub struct Coordinator {
    steward: Steward,
    config: Arc<GateConfig>,
    permits: Option<Arc<Semaphore>>,
}

impl Coordinator {
    pub fn new(config: Arc<GateConfig>, client: RemoteCheckClient) -> Self {
        let permits = config
            .execution
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit)));

        Self {
            steward: Steward::new(client, config.clone()),
            config,
            permits,
        }
    }

    /// Units for a batch. Checks whose endpoint is not configured are skipped.
    pub fn plan(&self, sync_type: SyncType, descriptors: &[Arc<Descriptor>]) -> Vec<CheckUnit> {
        let endpoints = &self.config.endpoints;
        let mut units = Vec::new();

        let per_descriptor: &[CheckKind] = match sync_type {
            SyncType::Presync if endpoints.release_check().is_some() => &[CheckKind::ReleaseReadiness],
            SyncType::Postsync if endpoints.submit_deployment().is_some() => &[CheckKind::DeploymentReport],
            _ => &[],
        };

        for (index, descriptor) in descriptors.iter().enumerate() {
            for kind in per_descriptor {
                units.push(CheckUnit::for_descriptor(*kind, index, descriptor.clone()));
            }
        }

        // The change window gates the whole batch, so it is checked once.
        if sync_type == SyncType::Presync && endpoints.change_check().is_some() {
            units.push(CheckUnit::for_batch(
                CheckKind::ChangeManagement,
                self.config.git.change_id(),
            ));
        }

        units
    }

    /// Run every planned unit and reduce the results.
    pub async fn run(
        &self,
        sync_type: SyncType,
        descriptors: Vec<Descriptor>,
        deadline: Deadline,
    ) -> BatchReport {
        let run_id = Uuid::new_v4();
        let descriptors: Vec<Arc<Descriptor>> = descriptors.into_iter().map(Arc::new).collect();
        let units = self.plan(sync_type, &descriptors);
        let span = tracing::info_span!("batch", %run_id, %sync_type);

        async move {
            let remaining = deadline.instant().saturating_duration_since(Instant::now());
            tracing::info!(
                descriptors = descriptors.len(),
                units = units.len(),
                max_concurrency = ?self.config.execution.max_concurrency,
                deadline_ms = remaining.as_millis() as u64,
                "Starting batch"
            );

            if units.is_empty() {
                tracing::warn!("No check endpoints configured, nothing to gate");
            }

            let steward = self.steward.clone();
            let reports = fan_out(units, self.permits.clone(), deadline, move |unit, deadline| {
                let steward = steward.clone();
                async move { steward.run(&unit, deadline).await }
            })
            .await;

            let batch = BatchReport::from_reports(reports);
            let (passed, failed, errored) = batch.tally();
            tracing::info!(
                passed,
                failed,
                errored,
                success = batch.verdict.is_success(),
                "Batch complete"
            );
            batch
        }
        .instrument(span)
        .await
    }
}

/// Spawn one task per unit and collect exactly one report from each.
async fn fan_out<R, Fut>(
    units: Vec<CheckUnit>,
    permits: Option<Arc<Semaphore>>,
    deadline: Deadline,
    runner: R,
) -> Vec<CheckReport>
where
    R: Fn(CheckUnit, Deadline) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = CheckOutcome> + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<CheckReport>();

    for unit in units {
        let tx = tx.clone();
        let permits = permits.clone();
        let deadline = deadline.clone();
        let runner = runner.clone();

        tokio::spawn(
            async move {
                let started = Instant::now();
                let (kind, subject) = (unit.kind, unit.subject.clone());
                let outcome = run_unit(unit, permits, deadline, runner).await;
                let _ = tx.send(CheckReport {
                    kind,
                    subject,
                    outcome,
                    elapsed: started.elapsed(),
                });
            }
            .in_current_span(),
        );
    }
    drop(tx);

    let mut reports = Vec::new();
    while let Some(report) = rx.recv().await {
        log_report(&report);
        reports.push(report);
    }
    reports
}

async fn run_unit<R, Fut>(
    unit: CheckUnit,
    permits: Option<Arc<Semaphore>>,
    mut deadline: Deadline,
    runner: R,
) -> CheckOutcome
where
    R: FnOnce(CheckUnit, Deadline) -> Fut,
    Fut: Future<Output = CheckOutcome>,
{
    let _permit = match permits {
        None => None,
        Some(permits) => tokio::select! {
            permit = permits.acquire_owned() => match permit {
                Ok(permit) => Some(permit),
                Err(e) => return CheckOutcome::Errored(CheckError::InvalidInput(e.to_string())),
            },
            reason = deadline.expired() => {
                return CheckOutcome::Errored(CheckError::Cancelled(reason));
            }
        },
    };

    AssertUnwindSafe(async move { runner(unit, deadline).await })
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| CheckOutcome::Errored(CheckError::Panicked(panic_message(&*panic))))
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn log_report(report: &CheckReport) {
    let elapsed_ms = report.elapsed.as_millis() as u64;
    match &report.outcome {
        CheckOutcome::Passed => tracing::info!(
            kind = %report.kind,
            subject = %report.subject,
            elapsed_ms,
            "Check passed"
        ),
        CheckOutcome::Failed(reason) => tracing::warn!(
            kind = %report.kind,
            subject = %report.subject,
            elapsed_ms,
            reason = %reason,
            "Check failed"
        ),
        CheckOutcome::Errored(cause) => tracing::error!(
            kind = %report.kind,
            subject = %report.subject,
            elapsed_ms,
            error = %cause,
            "Check errored"
        ),
    }
}
