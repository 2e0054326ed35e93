//! Launcher Tests: ProcessLauncher against real child processes
//!
//! These tests verify:
//! 1. Start/stop of long-running children and their status
//! 2. Startup failures (not configured, spawn error, early exit)
//! 3. Child environment and log file layout
//! 4. Reaping, shutdown, and a full unlock/stop over real processes
#![cfg(unix)]

mod common;

use beelaunch::{
    CommandSpec, ContainerError, ContainerId, ContainerKind, ContainerLifecycle, LaunchConfig, Orchestrator,
    ProcessLauncher, SessionConfig, StartConfig,
};
use common::FakeWallet;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn sh(script: &str) -> CommandSpec {
    CommandSpec::new("sh").arg("-c").arg(script)
}

fn config(dir: &TempDir) -> LaunchConfig {
    LaunchConfig::new("test")
        .with_data_dir(dir.path())
        .with_startup_grace(Duration::from_millis(100))
}

/// Test: long-running child starts, reports running, stops
#[tokio::test]
async fn start_and_stop() {
    let dir = TempDir::new().expect("tempdir");
    let launcher = ProcessLauncher::new(config(&dir).with_container(ContainerKind::Tor, sh("exec sleep 30")));

    launcher.start(ContainerKind::Tor, None).await.expect("start");
    let status = launcher.status_of(ContainerKind::Tor);
    assert!(status.running);
    assert!(!status.pending);
    assert_eq!(status.id.as_str(), "test_tor");

    // second start is a no-op
    launcher.start(ContainerKind::Tor, None).await.expect("restart");

    launcher.stop(&status.id).await.expect("stop");
    let status = launcher.status_of(ContainerKind::Tor);
    assert!(status.is_idle());
}

/// Test: status is pending during the startup grace
#[tokio::test]
async fn pending_while_starting() {
    let dir = TempDir::new().expect("tempdir");
    let launcher = Arc::new(ProcessLauncher::new(
        config(&dir)
            .with_startup_grace(Duration::from_millis(500))
            .with_container(ContainerKind::Wallet, sh("exec sleep 30")),
    ));

    let task = tokio::spawn({
        let launcher = launcher.clone();
        async move { launcher.start(ContainerKind::Wallet, None).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    let status = launcher.status_of(ContainerKind::Wallet);
    assert!(status.pending);
    assert!(!status.running);

    task.await.unwrap().expect("start");
    assert!(launcher.status_of(ContainerKind::Wallet).running);
    launcher.shutdown().await;
}

/// Test: kinds without a command fail to start
#[tokio::test]
async fn unconfigured_kind_fails() {
    let dir = TempDir::new().expect("tempdir");
    let launcher = ProcessLauncher::new(config(&dir));

    let err = launcher.start(ContainerKind::BaseNode, None).await.unwrap_err();
    assert!(matches!(err, ContainerError::NotConfigured(ContainerKind::BaseNode)), "{:?}", err);
}

/// Test: a missing program is a spawn error
#[tokio::test]
async fn missing_program_fails() {
    let dir = TempDir::new().expect("tempdir");
    let launcher = ProcessLauncher::new(
        config(&dir).with_container(ContainerKind::Tor, CommandSpec::new("/nonexistent/beelaunch-tor")),
    );

    let err = launcher.start(ContainerKind::Tor, None).await.unwrap_err();
    assert!(matches!(err, ContainerError::Spawn { kind: ContainerKind::Tor, .. }), "{:?}", err);
    assert!(launcher.status_of(ContainerKind::Tor).is_idle());
}

/// Test: a child dying inside the grace period is a failed start
#[tokio::test]
async fn early_exit_fails() {
    let dir = TempDir::new().expect("tempdir");
    let launcher = ProcessLauncher::new(config(&dir).with_container(ContainerKind::Wallet, sh("exit 3")));

    let err = launcher.start(ContainerKind::Wallet, None).await.unwrap_err();
    assert!(matches!(err, ContainerError::ExitedEarly { kind: ContainerKind::Wallet, code: Some(3) }), "{:?}", err);
    assert!(launcher.status_of(ContainerKind::Wallet).is_idle());
}

/// Test: stop rejects unknown ids; stopping an idle container is a no-op
#[tokio::test]
async fn stop_unknown_and_idle() {
    let dir = TempDir::new().expect("tempdir");
    let launcher = ProcessLauncher::new(config(&dir).with_container(ContainerKind::Tor, sh("exec sleep 30")));

    let unknown = ContainerId::new("other", ContainerKind::Tor);
    assert!(matches!(launcher.stop(&unknown).await, Err(ContainerError::UnknownContainer(_))));

    let idle = launcher.id(ContainerKind::Tor);
    launcher.stop(&idle).await.expect("idle stop");
    launcher.stop(&idle).await.expect("second idle stop");
    assert!(launcher.status_of(ContainerKind::Tor).is_idle());
}

/// Test: child env carries workspace, app name and the credential; output lands in the log
#[tokio::test]
async fn child_env_and_log() {
    let dir = TempDir::new().expect("tempdir");
    let launcher = ProcessLauncher::new(config(&dir).with_container(
        ContainerKind::Wallet,
        sh("echo \"$APP_NAME $BEELAUNCH_WORKSPACE $WALLET_PASSWORD $EXTRA\"; exec sleep 30").env("EXTRA", "x1"),
    ));

    let start = StartConfig::with_credential(Some("s3cret pass".into()));
    launcher.start(ContainerKind::Wallet, Some(start)).await.expect("start");
    launcher.stop(&launcher.id(ContainerKind::Wallet)).await.expect("stop");

    let log_path = dir.path().join("wallet").join("log").join("wallet.log");
    assert_eq!(launcher.config().log_path(ContainerKind::Wallet), log_path);
    let log = std::fs::read_to_string(&log_path).expect("log");
    assert!(log.contains("wallet test s3cret pass x1"), "{}", log);
}

/// Test: a child that exits on its own is reported stopped
#[tokio::test]
async fn self_exit_is_reaped() {
    let dir = TempDir::new().expect("tempdir");
    let launcher = ProcessLauncher::new(config(&dir).with_container(ContainerKind::Tor, sh("sleep 0.4")));

    launcher.start(ContainerKind::Tor, None).await.expect("start");
    assert!(launcher.status_of(ContainerKind::Tor).running);

    tokio::time::sleep(Duration::from_millis(800)).await;
    assert!(launcher.status_of(ContainerKind::Tor).is_idle());
}

/// Test: shutdown stops everything running
#[tokio::test]
async fn shutdown_stops_all() {
    let dir = TempDir::new().expect("tempdir");
    let launcher = ProcessLauncher::new(
        config(&dir)
            .with_container(ContainerKind::Tor, sh("exec sleep 30"))
            .with_container(ContainerKind::BaseNode, sh("exec sleep 30")),
    );
    launcher.start(ContainerKind::Tor, None).await.expect("tor");
    launcher.start(ContainerKind::BaseNode, None).await.expect("base node");

    launcher.shutdown().await;

    assert!(launcher.status_of(ContainerKind::Tor).is_idle());
    assert!(launcher.status_of(ContainerKind::BaseNode).is_idle());
}

/// Test: unlock and stop over real processes
#[tokio::test]
async fn orchestrated_unlock_and_stop() {
    let dir = TempDir::new().expect("tempdir");
    let launcher = Arc::new(ProcessLauncher::new(
        config(&dir)
            .with_container(ContainerKind::Tor, sh("exec sleep 30"))
            .with_container(ContainerKind::Wallet, sh("exec sleep 30")),
    ));
    let wallet = FakeWallet::new("abc", 100, 10, 5);
    let orch = Orchestrator::new(launcher.clone(), wallet, SessionConfig::new().with_credential("pw"));

    let session = orch.unlock().await.expect("unlock");
    assert!(session.unlocked);
    assert_eq!(session.balance.total, 105);
    assert!(orch.view().ready);

    orch.stop().await.expect("stop");
    assert!(launcher.status_of(ContainerKind::Tor).is_idle());
    assert!(launcher.status_of(ContainerKind::Wallet).is_idle());
    assert!(!orch.view().ready);
}

/// Test: stop with the wallet already down still releases tor
#[tokio::test]
async fn stop_with_wallet_down_releases_tor() {
    let dir = TempDir::new().expect("tempdir");
    let launcher = Arc::new(ProcessLauncher::new(
        config(&dir)
            .with_container(ContainerKind::Tor, sh("exec sleep 30"))
            .with_container(ContainerKind::Wallet, sh("exec sleep 30")),
    ));
    launcher.start(ContainerKind::Tor, None).await.expect("start tor");
    assert!(launcher.status_of(ContainerKind::Wallet).is_idle());

    let orch = Orchestrator::new(launcher.clone(), FakeWallet::new("abc", 0, 0, 0), SessionConfig::new());
    orch.stop().await.expect("stop");

    assert!(launcher.status_of(ContainerKind::Tor).is_idle());
    assert!(!orch.view().session.pending);
}
