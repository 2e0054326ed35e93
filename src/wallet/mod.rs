//! Wallet - RPC seam to the running wallet process
//!
//! ```text
//! Orchestrator ──get_identity()──▶ WalletClient ──▶ HttpWalletClient (native)
//!              ──get_balance()───▶              ──▶ any other adapter
//! ```
//!
//! Calls carry no timeout. A hung wallet keeps the caller waiting.

mod balance;
#[cfg(feature = "native")]
mod http;

pub use balance::WalletBalance;
#[cfg(feature = "native")]
pub use http::HttpWalletClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `getIdentity` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub public_address: String,
}

/// `getBalance` response, in micro-units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub available: u64,
    pub pending_incoming: u64,
    pub pending_outgoing: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    #[error("wallet unreachable: {0}")]
    Transport(String),
    #[error("wallet responded with status {0}")]
    Status(u16),
    #[error("bad wallet response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait WalletClient: Send + Sync {
    async fn get_identity(&self) -> Result<Identity, RpcError>;
    async fn get_balance(&self) -> Result<BalanceSnapshot, RpcError>;
}
