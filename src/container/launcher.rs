//! ProcessLauncher - containers as supervised child processes
//!
//! Per-container state:
//!
//! ```text
//! Stopped ──start──▶ Starting ──grace ok──▶ Running ──stop──▶ Stopping ──▶ Stopped
//!                        │                     │
//!                        └──exit in grace──▶ Failed   exited on its own ──▶ Stopped
//! ```
//!
//! Stop kills immediately; stopping a container that is already down is a
//! no-op. Children are killed when the launcher is dropped.

use super::{
    ContainerError, ContainerId, ContainerKind, ContainerLifecycle, ContainerStatus, LaunchConfig, StartConfig,
};
use crate::core::paths::env as child_env;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::process::Stdio;
use std::sync::{Mutex, MutexGuard};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use super::CommandSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Stopped,
    Starting,
    Running,
    Stopping,
    Failed,
}

struct Slot {
    state: State,
    child: Option<Child>,
}

impl Slot {
    fn stopped() -> Self { Self { state: State::Stopped, child: None } }

    /// Notice children that exited without being asked to
    fn reap(&mut self, kind: ContainerKind) {
        if self.state != State::Running { return; }
        let exited = match self.child.as_mut().map(|c| c.try_wait()) {
            Some(Ok(Some(status))) => Some(status.code()),
            Some(Ok(None)) => None,
            Some(Err(e)) => { warn!(container = %kind, "try_wait failed: {}", e); None }
            None => Some(None),
        };
        if let Some(code) = exited {
            warn!(container = %kind, ?code, "Container exited unexpectedly");
            self.child = None;
            self.state = State::Stopped;
        }
    }
}

pub struct ProcessLauncher {
    config: LaunchConfig,
    slots: Mutex<HashMap<ContainerKind, Slot>>,
}

impl ProcessLauncher {
    pub fn new(config: LaunchConfig) -> Self { Self { config, slots: Mutex::new(HashMap::new()) } }

    pub fn config(&self) -> &LaunchConfig { &self.config }

    pub fn id(&self, kind: ContainerKind) -> ContainerId { ContainerId::new(&self.config.workspace, kind) }

    fn kind_of(&self, id: &ContainerId) -> Option<ContainerKind> {
        ContainerKind::ALL.into_iter().find(|k| &self.id(*k) == id)
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<ContainerKind, Slot>> {
        self.slots.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn set_state(&self, kind: ContainerKind, state: State) {
        self.slots().entry(kind).or_insert_with(Slot::stopped).state = state;
    }

    fn spawn(&self, kind: ContainerKind, spec: &CommandSpec, config: Option<&StartConfig>) -> Result<Child, ContainerError> {
        let spawn_err = |source| ContainerError::Spawn { kind, source };
        let log_path = self.config.log_path(kind);
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent).map_err(spawn_err)?;
        }
        let stdout = OpenOptions::new().create(true).append(true).open(&log_path).map_err(spawn_err)?;
        let stderr = stdout.try_clone().map_err(spawn_err)?;

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .env(child_env::CHILD_WORKSPACE, &self.config.workspace)
            .env(child_env::CHILD_DATA_FOLDER, &self.config.data_dir)
            .env(child_env::CHILD_APP_NAME, kind.container_name())
            .envs(&spec.env)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .kill_on_drop(true);
        if let Some(credential) = config.and_then(|c| c.credential.as_ref()) {
            cmd.env(child_env::CHILD_WALLET_PASSWORD, credential.expose());
        }
        debug!(container = %kind, log = %log_path.display(), "Spawning {}", spec.program);
        cmd.spawn().map_err(spawn_err)
    }

    /// Stop every running container. Failures are logged, not returned.
    pub async fn shutdown(&self) {
        for kind in ContainerKind::ALL {
            let status = self.status_of(kind);
            if !status.running { continue; }
            info!(container = %status.id, "Shutting down");
            if let Err(e) = self.stop(&status.id).await {
                warn!(container = %status.id, "Could not stop container: {}", e);
            }
        }
    }
}

#[async_trait]
impl ContainerLifecycle for ProcessLauncher {
    async fn start(&self, kind: ContainerKind, config: Option<StartConfig>) -> Result<(), ContainerError> {
        let spec = self.config.command(kind).cloned().ok_or(ContainerError::NotConfigured(kind))?;
        {
            let mut slots = self.slots();
            let slot = slots.entry(kind).or_insert_with(Slot::stopped);
            if matches!(slot.state, State::Starting | State::Running) {
                debug!(container = %kind, "Already up, nothing to start");
                return Ok(());
            }
            slot.state = State::Starting;
        }

        info!(container = %kind, image = kind.image_name(), "Starting container");
        let child = match self.spawn(kind, &spec, config.as_ref()) {
            Ok(child) => child,
            Err(e) => {
                self.set_state(kind, State::Failed);
                return Err(e);
            }
        };
        self.slots().entry(kind).or_insert_with(Slot::stopped).child = Some(child);

        tokio::time::sleep(self.config.startup_grace).await;

        let mut slots = self.slots();
        let slot = slots.entry(kind).or_insert_with(Slot::stopped);
        match slot.child.as_mut().map(|c| c.try_wait()) {
            Some(Ok(None)) => {
                slot.state = State::Running;
                info!(container = %self.id(kind), "Container started");
                Ok(())
            }
            Some(Ok(Some(status))) => {
                slot.child = None;
                slot.state = State::Failed;
                Err(ContainerError::ExitedEarly { kind, code: status.code() })
            }
            Some(Err(source)) => {
                slot.state = State::Failed;
                Err(ContainerError::Spawn { kind, source })
            }
            None => Err(ContainerError::Other(format!("{} was stopped while starting", kind))),
        }
    }

    async fn stop(&self, id: &ContainerId) -> Result<(), ContainerError> {
        let kind = self.kind_of(id).ok_or_else(|| ContainerError::UnknownContainer(id.clone()))?;
        let mut child = {
            let mut slots = self.slots();
            let slot = slots.entry(kind).or_insert_with(Slot::stopped);
            slot.reap(kind);
            match slot.child.take() {
                Some(child) => {
                    slot.state = State::Stopping;
                    child
                }
                None => {
                    slot.state = State::Stopped;
                    debug!(container = %id, "Not running, nothing to stop");
                    return Ok(());
                }
            }
        };

        info!(container = %id, "Stopping container");
        let result = child.kill().await;
        self.set_state(kind, State::Stopped);
        result.map_err(|source| ContainerError::Kill { id: id.clone(), source })?;
        info!(container = %id, "Container stopped");
        Ok(())
    }

    fn status_of(&self, kind: ContainerKind) -> ContainerStatus {
        let state = match self.slots().get_mut(&kind) {
            Some(slot) => {
                slot.reap(kind);
                slot.state
            }
            None => State::Stopped,
        };
        ContainerStatus {
            kind,
            id: self.id(kind),
            running: state == State::Running,
            pending: matches!(state, State::Starting | State::Stopping),
        }
    }
}
