//! Exit status of the hook binary as seen by the pipeline.

mod common;

use common::*;
use tokio::process::Command;

const BIN: &str = env!("CARGO_BIN_EXE_deploy-gate");

fn presync(release_url: &str) -> Command {
    presync_with_timeout(release_url, "5")
}

fn presync_with_timeout(release_url: &str, timeout_secs: &str) -> Command {
    let mut cmd = Command::new(BIN);
    cmd.args(["-y", "presync", "-t", "test-token", "-b", "main"])
        .args(["-u", release_url])
        .args(["-p", &payload(0)])
        .args(["--timeout-secs", timeout_secs])
        .env("RUST_LOG", "off");
    cmd
}

#[tokio::test]
async fn test_exit_zero_on_success() {
    let release = start_fixed_service(200, r#"{"releaseReady":true}"#).await;

    let output = presync(&release.url("/release/check")).output().await.unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.lines().any(|l| l == "SUCCESS: presync"));
}

#[tokio::test]
async fn test_exit_one_on_failed_check() {
    let release = start_fixed_service(200, r#"{"releaseReady":false}"#).await;

    let output = presync(&release.url("/release/check")).output().await.unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("FAILURE: release-readiness check for JetId: JET-0"));
    assert!(stdout.lines().any(|l| l == "FAILURE: presync"));
}

#[tokio::test]
async fn test_exit_two_on_bad_configuration() {
    let output = Command::new(BIN)
        .args(["-y", "presync", "-p", &payload(0)])
        .env("RUST_LOG", "off")
        .output()
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test]
async fn test_exit_two_on_malformed_payload() {
    let release = start_fixed_service(200, r#"{"releaseReady":true}"#).await;

    let output = Command::new(BIN)
        .args(["-y", "presync", "-t", "test-token"])
        .args(["-u", &release.url("/release/check")])
        .args(["-p", "{not json"])
        .env("RUST_LOG", "off")
        .output()
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(release.requests().is_empty());
}

#[tokio::test]
async fn test_huge_timeout_still_runs() {
    let release = start_fixed_service(200, r#"{"releaseReady":true}"#).await;

    let output = presync_with_timeout(&release.url("/release/check"), &u64::MAX.to_string())
        .output()
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
}
