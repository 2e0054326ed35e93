//! Containers - independently lifecycled background services
//!
//! The session only ever talks to containers through [`ContainerLifecycle`]:
//!
//! ```text
//! Orchestrator
//!     │
//!     ├── status_of(kind)        → ContainerStatus snapshot (sync)
//!     ├── start(kind, config)    → awaited until the container is up
//!     └── stop(id)               → awaited until the container is down
//!                 │
//!                 ▼
//!         ProcessLauncher (native) or any other adapter
//! ```
//!
//! Container ids follow the `{workspace}_{container_name}` convention.

#[cfg(feature = "native")]
mod config;
#[cfg(feature = "native")]
mod launcher;

#[cfg(feature = "native")]
pub use config::{CommandSpec, LaunchConfig};
#[cfg(feature = "native")]
pub use launcher::ProcessLauncher;

use crate::core::Credential;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Tor,
    BaseNode,
    Wallet,
    Sha3Miner,
    MmProxy,
    XmRig,
    Monerod,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 7] = [
        ContainerKind::Tor,
        ContainerKind::BaseNode,
        ContainerKind::Wallet,
        ContainerKind::Sha3Miner,
        ContainerKind::MmProxy,
        ContainerKind::XmRig,
        ContainerKind::Monerod,
    ];

    /// The network transport shared by every other container
    pub const TRANSPORT: ContainerKind = ContainerKind::Tor;
    pub const WALLET: ContainerKind = ContainerKind::Wallet;

    pub fn image_name(&self) -> &'static str {
        match self {
            Self::Tor => "tor",
            Self::BaseNode => "tari_base_node",
            Self::Wallet => "tari_console_wallet",
            Self::Sha3Miner => "tari_sha3_miner",
            Self::MmProxy => "tari_mm_proxy",
            Self::XmRig => "xmrig",
            Self::Monerod => "monerod",
        }
    }

    pub fn container_name(&self) -> &'static str {
        match self {
            Self::Tor => "tor",
            Self::BaseNode => "base_node",
            Self::Wallet => "wallet",
            Self::Sha3Miner => "sha3_miner",
            Self::MmProxy => "mm_proxy",
            Self::XmRig => "xmrig",
            Self::Monerod => "monerod",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.container_name()) }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(workspace: &str, kind: ContainerKind) -> Self {
        Self(format!("{}_{}", workspace, kind.container_name()))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Point-in-time view of one container. Owned by the lifecycle adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerStatus {
    pub kind: ContainerKind,
    pub id: ContainerId,
    pub running: bool,
    pub pending: bool,
}

impl ContainerStatus {
    /// Neither running nor on its way up or down
    pub fn is_idle(&self) -> bool { !self.running && !self.pending }
}

/// Extra configuration for a container start
#[derive(Debug, Clone, Default)]
pub struct StartConfig {
    pub credential: Option<Credential>,
}

impl StartConfig {
    pub fn with_credential(credential: Option<Credential>) -> Self { Self { credential } }
}

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("no command configured for {0}")]
    NotConfigured(ContainerKind),
    #[error("failed to spawn {kind}: {source}")]
    Spawn { kind: ContainerKind, #[source] source: std::io::Error },
    #[error("{kind} exited during startup (code {code:?})")]
    ExitedEarly { kind: ContainerKind, code: Option<i32> },
    #[error("unknown container {0}")]
    UnknownContainer(ContainerId),
    #[error("failed to stop {id}: {source}")]
    Kill { id: ContainerId, #[source] source: std::io::Error },
    #[error("{0}")]
    Other(String),
}

/// Start, stop and inspect background containers.
#[async_trait]
pub trait ContainerLifecycle: Send + Sync {
    /// Start `kind` and resolve once it is up
    async fn start(&self, kind: ContainerKind, config: Option<StartConfig>) -> Result<(), ContainerError>;
    /// Stop the container and resolve once it is down
    async fn stop(&self, id: &ContainerId) -> Result<(), ContainerError>;
    /// Synchronous snapshot of one container
    fn status_of(&self, kind: ContainerKind) -> ContainerStatus;
}

/// Statuses for `kinds`, in order
pub fn statuses(containers: &dyn ContainerLifecycle, kinds: &[ContainerKind]) -> Vec<ContainerStatus> {
    kinds.iter().map(|k| containers.status_of(*k)).collect()
}

/// Every container currently running, in [`ContainerKind::ALL`] order
pub fn running_snapshot(containers: &dyn ContainerLifecycle) -> Vec<ContainerStatus> {
    ContainerKind::ALL.iter().map(|k| containers.status_of(*k)).filter(|s| s.running).collect()
}
