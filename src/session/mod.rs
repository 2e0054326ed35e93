//! Session - wallet lock/unlock state and the routines that drive it
//!
//! ```text
//! Locked ──unlock()──▶ Unlocking ──ok──▶ Unlocked ──stop()──▶ Stopping ──▶ Locked
//!                          │                 │
//!                          └──err──▶ Locked  └── BalanceIdle ⇄ BalanceRefreshing
//! ```
//!
//! State lives in a [`SessionHandle`] and only changes through the pure
//! functions in [`transition`]. Presentation code subscribes to the handle.

mod config;
mod debounce;
mod error;
mod orchestrator;
pub mod transition;

pub use config::{SessionConfig, SettlePolicy};
pub use debounce::DebounceTimer;
pub use error::{RpcCall, SessionError};
pub use orchestrator::{Orchestrator, RefreshReport};

use crate::wallet::WalletBalance;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// In-memory wallet session. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSession {
    pub unlocked: bool,
    /// An unlock or stop is in flight
    pub pending: bool,
    /// Non-empty whenever `unlocked`
    pub address: String,
    pub balance: WalletBalance,
    /// Set by the transitions; `unlocked`/`pending` alone cannot tell
    /// a re-unlock from a stop
    #[serde(skip)]
    phase: SessionPhase,
}

impl WalletSession {
    pub fn phase(&self) -> SessionPhase { self.phase }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Locked,
    Unlocking,
    Unlocked,
    Stopping,
}

/// What the presentation layer sees
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session: WalletSession,
    /// Any required container starting or stopping
    pub busy: bool,
    /// Required containers usable
    pub ready: bool,
    pub phase: SessionPhase,
}

/// Shared, observable session state
#[derive(Clone)]
pub struct SessionHandle {
    tx: Arc<watch::Sender<WalletSession>>,
}

impl Default for SessionHandle {
    fn default() -> Self { Self::new() }
}

impl SessionHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(WalletSession::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> WalletSession { self.tx.borrow().clone() }

    pub fn subscribe(&self) -> watch::Receiver<WalletSession> { self.tx.subscribe() }

    /// Replace the state with `f(state)`. Subscribers are notified only on change.
    pub fn apply(&self, f: impl FnOnce(&WalletSession) -> WalletSession) -> bool {
        self.tx.send_if_modified(|state| {
            let next = f(state);
            if next == *state {
                return false;
            }
            *state = next;
            true
        })
    }
}
