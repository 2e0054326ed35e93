//! Session configuration - passed from higher layers

use crate::core::Credential;
use std::time::Duration;

/// How unlock waits for the wallet to become reachable after starting containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Sleep the whole interval
    Fixed(Duration),
    /// Poll container status until transport and wallet are up and settled.
    /// After a start, waits at least `min` first. Hitting `timeout` is not an error.
    Poll { min: Duration, timeout: Duration, interval: Duration },
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self::Poll {
            min: Duration::from_secs(1),
            timeout: Duration::from_secs(3),
            interval: Duration::from_millis(250),
        }
    }
}

impl SettlePolicy {
    pub fn poll(min: Duration, timeout: Duration, interval: Duration) -> Self {
        // zero interval would spin
        Self::Poll { min: min.min(timeout), timeout, interval: interval.max(Duration::from_millis(1)) }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Forwarded unmodified to the wallet container
    pub credential: Option<Credential>,
    pub settle: SettlePolicy,
    /// Refreshes faster than this never show as pending
    pub balance_debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { credential: None, settle: SettlePolicy::default(), balance_debounce: Duration::from_millis(300) }
    }
}

impl SessionConfig {
    pub fn new() -> Self { Self::default() }
    pub fn with_credential(mut self, c: impl Into<Credential>) -> Self { self.credential = Some(c.into()); self }
    pub fn with_settle(mut self, policy: SettlePolicy) -> Self { self.settle = policy; self }
    pub fn with_balance_debounce(mut self, delay: Duration) -> Self { self.balance_debounce = delay; self }
}
