use crate::container::{ContainerError, ContainerId, ContainerKind};
use crate::wallet::RpcError;
use std::fmt;
use thiserror::Error;

/// Which wallet call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcCall {
    Identity,
    Balance,
}

impl fmt::Display for RpcCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RpcCall::Identity => "getIdentity",
            RpcCall::Balance => "getBalance",
        })
    }
}

/// Failures of unlock and stop. Each carries the original cause.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to start {kind}: {source}")]
    ContainerStart { kind: ContainerKind, #[source] source: ContainerError },
    #[error("failed to stop {id}: {source}")]
    ContainerStop { id: ContainerId, #[source] source: ContainerError },
    #[error("{call} failed: {source}")]
    Rpc { call: RpcCall, #[source] source: RpcError },
}
