//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the optional config file and overlay command-line flags
//! - Validate the merged configuration
//! - Resolve seal/deployment ids from the cluster when configured
//! - Parse every descriptor
//! - Build the shared HTTP client and hand the batch to the coordinator
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Nothing is spawned until every input has been checked

use std::sync::Arc;

use crate::cli::Cli;
use crate::cluster;
use crate::config::loader::{ensure_valid, load_config};
use crate::config::validation::{identity_errors, ValidationError};
use crate::config::{ConfigError, GateConfig, SyncType};
use crate::coordinator::{BatchReport, Coordinator};
use crate::descriptor::Descriptor;
use crate::error::GateResult;
use crate::lifecycle::Deadline;
use crate::remote::RemoteCheckClient;

/// Merge the config file (if any) with the command-line flags.
pub fn load(cli: Cli) -> GateResult<GateConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };
    cli.apply(&mut config);
    Ok(config)
}

/// A validated batch, ready to run.
#[derive(Debug)]
pub struct PreparedRun {
    pub config: Arc<GateConfig>,
    pub sync_type: SyncType,
    pub descriptors: Vec<Descriptor>,
}

impl PreparedRun {
    /// Validate `config`, resolve identity and parse descriptors.
    pub async fn prepare(mut config: GateConfig) -> GateResult<Self> {
        ensure_valid(&config)?;

        // Only the change-window check compares against the identity.
        let needs_identity =
            config.sync_type == Some(SyncType::Presync) && config.endpoints.change_check().is_some();

        if let (true, Some(app_name)) = (needs_identity, config.cluster.app_name.clone()) {
            config.identity = cluster::lookup_identity(&config.cluster, &app_name).await?;
        }

        if needs_identity {
            let errors = identity_errors(&config);
            if !errors.is_empty() {
                return Err(ConfigError::Validation(errors).into());
            }
        }

        let descriptors = Descriptor::parse_all(&config.payloads)?;
        let sync_type = config
            .sync_type
            .ok_or_else(|| ConfigError::Validation(vec![ValidationError::MissingSyncType]))?;

        tracing::info!(
            %sync_type,
            descriptors = descriptors.len(),
            release_check = config.endpoints.release_check().is_some(),
            change_check = config.endpoints.change_check().is_some(),
            submit_deployment = config.endpoints.submit_deployment().is_some(),
            timeout_secs = config.execution.timeout_secs,
            "Configuration loaded"
        );

        Ok(Self {
            config: Arc::new(config),
            sync_type,
            descriptors,
        })
    }

    /// Run the batch under `deadline`.
    pub async fn execute(self, deadline: Deadline) -> GateResult<BatchReport> {
        let client = RemoteCheckClient::new(&self.config.http, &self.config.auth)?;
        let coordinator = Coordinator::new(self.config.clone(), client);
        Ok(coordinator.run(self.sync_type, self.descriptors, deadline).await)
    }
}
