//! Orchestrator - unlock, stop and balance refresh
//!
//! | Routine | Containers | Wallet RPC | Errors |
//! |---------|------------|------------|--------|
//! | `unlock` | start transport, then wallet, if idle | identity + balance, concurrently | returned |
//! | `stop` | stop wallet, stop transport if nothing else runs | - | returned |
//! | `refresh_balance` | - | balance, debounced busy flag | logged and dropped |
//!
//! No routine retries. Concurrent unlock/stop calls are not serialized.

use super::debounce::DebounceTimer;
use super::{transition, RpcCall, SessionConfig, SessionError, SessionHandle, SessionView, SettlePolicy, WalletSession};
use crate::container::{self, ContainerKind, ContainerLifecycle, ContainerStatus, StartConfig};
use crate::core::status::{self, Derived};
use crate::wallet::{RpcError, WalletBalance, WalletClient};
use serde::Serialize;
use std::sync::Arc;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Containers the wallet needs, in start order
const REQUIRED: [ContainerKind; 2] = [ContainerKind::TRANSPORT, ContainerKind::WALLET];

/// Outcome of one balance refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    /// A new balance was stored
    pub applied: bool,
    /// The debounce fired and the balance showed as pending
    pub flagged_busy: bool,
}

pub struct Orchestrator {
    containers: Arc<dyn ContainerLifecycle>,
    wallet: Arc<dyn WalletClient>,
    config: SessionConfig,
    session: SessionHandle,
}

impl Orchestrator {
    pub fn new(containers: Arc<dyn ContainerLifecycle>, wallet: Arc<dyn WalletClient>, config: SessionConfig) -> Self {
        Self { containers, wallet, config, session: SessionHandle::new() }
    }

    pub fn session(&self) -> &SessionHandle { &self.session }
    pub fn config(&self) -> &SessionConfig { &self.config }

    /// Transport and wallet status, in that order
    pub fn statuses(&self) -> Vec<ContainerStatus> { container::statuses(&*self.containers, &REQUIRED) }

    /// Derived "busy" signal
    pub fn pending(&self) -> bool { status::pending(&self.statuses()) }

    /// Derived "ready" signal
    pub fn running(&self) -> bool { status::running(&self.statuses()) }

    pub fn view(&self) -> SessionView {
        let session = self.session.current();
        let derived = Derived::of(&self.statuses());
        SessionView { phase: session.phase(), session, busy: derived.pending, ready: derived.running }
    }

    /// Start whatever is missing, wait for the wallet, fetch identity and balance.
    pub async fn unlock(&self) -> Result<WalletSession, SessionError> {
        self.session.apply(transition::begin_unlock);
        match self.run_unlock().await {
            Ok((address, balance)) => {
                self.session.apply(|s| transition::finish_unlock(s, &address, balance));
                info!(%address, available = balance.available, total = balance.total, "Session unlocked");
                Ok(self.session.current())
            }
            Err(e) => {
                self.session.apply(transition::fail_unlock);
                warn!("Unlock failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run_unlock(&self) -> Result<(String, WalletBalance), SessionError> {
        let [transport, wallet] = REQUIRED.map(|k| self.containers.status_of(k));

        if transport.is_idle() {
            info!(container = %transport.id, "Starting transport");
            self.containers
                .start(ContainerKind::TRANSPORT, None)
                .await
                .map_err(|source| SessionError::ContainerStart { kind: ContainerKind::TRANSPORT, source })?;
        } else {
            debug!(container = %transport.id, running = transport.running, "Transport already up");
        }

        let started = transport.is_idle() || wallet.is_idle();
        if wallet.is_idle() {
            info!(container = %wallet.id, "Starting wallet");
            let config = StartConfig::with_credential(self.config.credential.clone());
            self.containers
                .start(ContainerKind::WALLET, Some(config))
                .await
                .map_err(|source| SessionError::ContainerStart { kind: ContainerKind::WALLET, source })?;
        } else {
            debug!(container = %wallet.id, running = wallet.running, "Wallet already up");
        }

        self.wait_until_settled(started).await;

        let (identity, snapshot) = tokio::try_join!(
            async {
                self.wallet.get_identity().await.map_err(|source| SessionError::Rpc { call: RpcCall::Identity, source })
            },
            async {
                self.wallet.get_balance().await.map_err(|source| SessionError::Rpc { call: RpcCall::Balance, source })
            },
        )?;

        if identity.public_address.is_empty() {
            return Err(SessionError::Rpc {
                call: RpcCall::Identity,
                source: RpcError::Decode("empty public address".into()),
            });
        }
        Ok((identity.public_address, WalletBalance::from(snapshot)))
    }

    /// Wait per the settle policy. Returns whether transport and wallet ended up
    /// running and settled; running out of time is not an error.
    ///
    /// `after_start` applies the poll floor: a container that just came up is
    /// running before its RPC interface is reachable.
    pub async fn wait_until_settled(&self, after_start: bool) -> bool {
        match self.config.settle {
            SettlePolicy::Fixed(delay) => {
                sleep(delay).await;
                Derived::of(&self.statuses()).settled_running()
            }
            SettlePolicy::Poll { min, timeout, interval } => {
                let deadline = Instant::now() + timeout;
                if after_start {
                    sleep(min).await;
                }
                loop {
                    if Derived::of(&self.statuses()).settled_running() {
                        debug!("Wallet settled");
                        return true;
                    }
                    let now = Instant::now();
                    if now >= deadline {
                        debug!(?timeout, "Settle timed out, continuing");
                        return false;
                    }
                    sleep(interval.min(deadline - now)).await;
                }
            }
        }
    }

    /// Stop the wallet, and the transport too when nothing else uses it.
    ///
    /// The session ends locked either way. "Nothing else uses it" is a
    /// point-in-time snapshot, so a container starting concurrently can race.
    pub async fn stop(&self) -> Result<(), SessionError> {
        self.session.apply(transition::begin_stop);
        let result = self.run_stop().await;
        self.session.apply(transition::finish_stop);
        match &result {
            Ok(()) => info!("Session locked"),
            Err(e) => warn!("Stop failed, session locked anyway: {}", e),
        }
        result
    }

    async fn run_stop(&self) -> Result<(), SessionError> {
        let [transport, wallet] = REQUIRED.map(|k| self.containers.status_of(k));

        info!(container = %wallet.id, "Stopping wallet");
        self.containers
            .stop(&wallet.id)
            .await
            .map_err(|source| SessionError::ContainerStop { id: wallet.id.clone(), source })?;

        let others: Vec<ContainerStatus> = container::running_snapshot(&*self.containers)
            .into_iter()
            .filter(|s| !REQUIRED.contains(&s.kind))
            .collect();
        if !others.is_empty() {
            info!(in_use_by = others.len(), "Transport still in use, leaving it up");
            return Ok(());
        }

        info!(container = %transport.id, "Stopping transport");
        self.containers
            .stop(&transport.id)
            .await
            .map_err(|source| SessionError::ContainerStop { id: transport.id.clone(), source })
    }

    /// Re-fetch the balance. Never fails; errors are logged and the old balance kept.
    ///
    /// `balance.pending` is only raised if the fetch outlives the debounce delay.
    pub async fn refresh_balance(&self) -> RefreshReport {
        if !self.session.current().unlocked {
            debug!("Session locked, skipping balance refresh");
            return RefreshReport::default();
        }

        let mut timer = DebounceTimer::arm(self.config.balance_debounce);
        let fetch = self.wallet.get_balance();
        tokio::pin!(fetch);

        let result = loop {
            tokio::select! {
                biased;
                result = &mut fetch => break result,
                _ = timer.fired() => {
                    debug!("Balance refresh slow, flagging pending");
                    self.session.apply(transition::mark_balance_pending);
                }
            }
        };
        let flagged_busy = timer.release();

        match result {
            Ok(snapshot) => {
                let balance = WalletBalance::from(snapshot);
                let applied = self.session.current().unlocked;
                if applied {
                    self.session.apply(|s| transition::commit_balance(s, balance));
                    debug!(available = balance.available, total = balance.total, "Balance refreshed");
                } else {
                    self.session.apply(transition::clear_balance_pending);
                    debug!("Session locked during refresh, dropping balance");
                }
                RefreshReport { applied, flagged_busy }
            }
            Err(e) => {
                self.session.apply(transition::clear_balance_pending);
                warn!("Balance refresh failed: {}", e);
                RefreshReport { applied: false, flagged_busy }
            }
        }
    }
}
