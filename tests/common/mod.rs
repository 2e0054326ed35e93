//! In-memory collaborators for orchestrator tests
#![allow(dead_code)]

use async_trait::async_trait;
use beelaunch::{
    BalanceSnapshot, ContainerError, ContainerId, ContainerKind, ContainerLifecycle, ContainerStatus, Identity,
    Orchestrator, RpcError, SessionConfig, StartConfig, WalletClient,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const WORKSPACE: &str = "test";

pub fn id(kind: ContainerKind) -> ContainerId { ContainerId::new(WORKSPACE, kind) }

/// Lifecycle calls in the order they happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    StartBegin(ContainerKind),
    StartEnd(ContainerKind),
    Stop(ContainerId),
}

#[derive(Default)]
pub struct FakeContainers {
    state: Mutex<HashMap<ContainerKind, (bool, bool)>>,
    calls: Mutex<Vec<Call>>,
    credentials: Mutex<Vec<(ContainerKind, Option<String>)>>,
    start_delay: Mutex<Duration>,
    stop_delay: Mutex<Duration>,
    fail_start: Mutex<HashSet<ContainerKind>>,
    fail_stop: Mutex<HashSet<ContainerKind>>,
}

impl FakeContainers {
    pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

    pub fn set(&self, kind: ContainerKind, running: bool, pending: bool) {
        self.state.lock().unwrap().insert(kind, (running, pending));
    }

    pub fn running(&self, kinds: &[ContainerKind]) {
        for kind in kinds {
            self.set(*kind, true, false);
        }
    }

    pub fn with_start_delay(&self, delay: Duration) { *self.start_delay.lock().unwrap() = delay; }
    pub fn with_stop_delay(&self, delay: Duration) { *self.stop_delay.lock().unwrap() = delay; }
    pub fn fail_start(&self, kind: ContainerKind) { self.fail_start.lock().unwrap().insert(kind); }
    pub fn fail_stop(&self, kind: ContainerKind) { self.fail_stop.lock().unwrap().insert(kind); }

    pub fn is_running(&self, kind: ContainerKind) -> bool { self.status_of(kind).running }

    pub fn calls(&self) -> Vec<Call> { self.calls.lock().unwrap().clone() }

    pub fn starts(&self) -> Vec<ContainerKind> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::StartBegin(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }

    pub fn stops(&self) -> Vec<ContainerId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Stop(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn credential_for(&self, kind: ContainerKind) -> Option<Option<String>> {
        self.credentials.lock().unwrap().iter().find(|(k, _)| *k == kind).map(|(_, c)| c.clone())
    }

    fn record(&self, call: Call) { self.calls.lock().unwrap().push(call); }
}

#[async_trait]
impl ContainerLifecycle for FakeContainers {
    async fn start(&self, kind: ContainerKind, config: Option<StartConfig>) -> Result<(), ContainerError> {
        self.record(Call::StartBegin(kind));
        let credential = config.as_ref().and_then(|c| c.credential.as_ref()).map(|c| c.expose().to_string());
        self.credentials.lock().unwrap().push((kind, credential));
        self.set(kind, false, true);

        let delay = *self.start_delay.lock().unwrap();
        tokio::time::sleep(delay).await;

        if self.fail_start.lock().unwrap().contains(&kind) {
            self.set(kind, false, false);
            return Err(ContainerError::Other(format!("{} refused to start", kind)));
        }
        self.set(kind, true, false);
        self.record(Call::StartEnd(kind));
        Ok(())
    }

    async fn stop(&self, container: &ContainerId) -> Result<(), ContainerError> {
        self.record(Call::Stop(container.clone()));
        let kind = ContainerKind::ALL
            .into_iter()
            .find(|k| &id(*k) == container)
            .ok_or_else(|| ContainerError::UnknownContainer(container.clone()))?;
        let delay = *self.stop_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        if self.fail_stop.lock().unwrap().contains(&kind) {
            return Err(ContainerError::Other(format!("{} refused to stop", kind)));
        }
        self.set(kind, false, false);
        Ok(())
    }

    fn status_of(&self, kind: ContainerKind) -> ContainerStatus {
        let (running, pending) = self.state.lock().unwrap().get(&kind).copied().unwrap_or((false, false));
        ContainerStatus { kind, id: id(kind), running, pending }
    }
}

pub struct FakeWallet {
    identity: Mutex<Result<Identity, RpcError>>,
    balance: Mutex<Result<BalanceSnapshot, RpcError>>,
    balance_delay: Mutex<Duration>,
    pub identity_calls: AtomicUsize,
    pub balance_calls: AtomicUsize,
}

impl FakeWallet {
    pub fn new(address: &str, available: u64, pending_incoming: u64, pending_outgoing: u64) -> Arc<Self> {
        Arc::new(Self {
            identity: Mutex::new(Ok(Identity { public_address: address.into() })),
            balance: Mutex::new(Ok(BalanceSnapshot { available, pending_incoming, pending_outgoing })),
            balance_delay: Mutex::new(Duration::ZERO),
            identity_calls: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
        })
    }

    pub fn set_identity(&self, result: Result<Identity, RpcError>) { *self.identity.lock().unwrap() = result; }

    pub fn set_balance(&self, available: u64, pending_incoming: u64, pending_outgoing: u64) {
        *self.balance.lock().unwrap() = Ok(BalanceSnapshot { available, pending_incoming, pending_outgoing });
    }

    pub fn fail_balance(&self, error: RpcError) { *self.balance.lock().unwrap() = Err(error); }

    pub fn with_balance_delay(&self, delay: Duration) { *self.balance_delay.lock().unwrap() = delay; }

    pub fn balance_calls(&self) -> usize { self.balance_calls.load(Ordering::SeqCst) }
}

#[async_trait]
impl WalletClient for FakeWallet {
    async fn get_identity(&self) -> Result<Identity, RpcError> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);
        self.identity.lock().unwrap().clone()
    }

    async fn get_balance(&self) -> Result<BalanceSnapshot, RpcError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.balance_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        self.balance.lock().unwrap().clone()
    }
}

pub fn orchestrator(containers: &Arc<FakeContainers>, wallet: &Arc<FakeWallet>, config: SessionConfig) -> Arc<Orchestrator> {
    Arc::new(Orchestrator::new(containers.clone(), wallet.clone(), config))
}
