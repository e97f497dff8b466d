//! Deployment gate (pipeline hook)
//!
//! # Architecture Overview
//!
//! ```text
//!   flags + config file
//!          │
//!          ▼
//!   ┌─────────────┐    ┌──────────────┐    ┌───────────────────────────┐
//!   │   startup   │───▶│ coordinator  │───▶│ unit per (descriptor,     │
//!   │ validate,   │    │ plan, spawn, │    │ check), shared deadline   │
//!   │ identity,   │    │ collect      │    │   steward → remote client │──▶ services
//!   │ descriptors │    └──────┬───────┘    └─────────────┬─────────────┘
//!   └─────────────┘           │      typed results       │
//!                             ◀──────────────────────────┘
//!                             │
//!                             ▼
//!                    verdict → exit code
//! ```
//!
//! Exit codes: 0 when every check passed, 1 when any check failed or
//! errored, 2 when the run could not start (configuration, payloads,
//! cluster lookup).

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use deploy_gate::cli::Cli;
use deploy_gate::lifecycle::signals::cancel_on_interrupt;
use deploy_gate::lifecycle::startup::{self, PreparedRun};
use deploy_gate::lifecycle::Cancellation;
use deploy_gate::observability::init_logging;

const EXIT_GATE_FAILED: u8 = 1;
const EXIT_SETUP_FAILED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match startup::load(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(EXIT_SETUP_FAILED);
        }
    };

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("warning: logging already initialized: {}", e);
    }

    let label = config
        .sync_type
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info!("deploy-gate v{} starting", env!("CARGO_PKG_VERSION"));

    let run = match PreparedRun::prepare(config).await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!(error = %e, "Gate setup failed");
            println!("FAILURE: {}", label);
            return ExitCode::from(EXIT_SETUP_FAILED);
        }
    };

    let cancellation = Arc::new(Cancellation::new(Duration::from_secs(
        run.config.execution.timeout_secs,
    )));
    cancel_on_interrupt(cancellation.clone());

    let batch = match run.execute(cancellation.deadline()).await {
        Ok(batch) => batch,
        Err(e) => {
            tracing::error!(error = %e, "Gate setup failed");
            println!("FAILURE: {}", label);
            return ExitCode::from(EXIT_SETUP_FAILED);
        }
    };

    for line in batch.summary_lines() {
        println!("{}", line);
    }

    if batch.verdict.is_success() {
        println!("SUCCESS: {}", label);
        ExitCode::SUCCESS
    } else {
        println!("FAILURE: {}", label);
        ExitCode::from(EXIT_GATE_FAILED)
    }
}
