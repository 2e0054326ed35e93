//! Derived status - one busy/ready signal over several containers
//!
//! | Signal | Rule |
//! |--------|------|
//! | `pending` | any container pending |
//! | `running` | all running, or any running while any pending |
//!
//! A stack where one container runs and the other has settled as stopped is
//! *not* running: partially up is not ready.

use crate::container::ContainerStatus;

/// True while any container is starting or stopping
pub fn pending(statuses: &[ContainerStatus]) -> bool {
    statuses.iter().any(|s| s.pending)
}

/// True when the stack is usable, or on its way there with part of it already up
pub fn running(statuses: &[ContainerStatus]) -> bool {
    let all_running = statuses.iter().all(|s| s.running);
    let any_running = statuses.iter().any(|s| s.running);
    all_running || (any_running && pending(statuses))
}

/// Both derived signals at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Derived {
    pub pending: bool,
    pub running: bool,
}

impl Derived {
    pub fn of(statuses: &[ContainerStatus]) -> Self {
        Self { pending: pending(statuses), running: running(statuses) }
    }

    /// Running with nothing in flight
    pub fn settled_running(&self) -> bool { self.running && !self.pending }
}
