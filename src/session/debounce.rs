//! DebounceTimer - a deferred "busy" flag, raced against the work it covers
//!
//! The timer is polled from the same task as the work, so releasing it is
//! just dropping the sleep. Nothing can fire after [`DebounceTimer::release`].

use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, Sleep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Armed,
    Fired,
    Released,
}

pub struct DebounceTimer {
    sleep: Option<Pin<Box<Sleep>>>,
    state: TimerState,
}

impl DebounceTimer {
    pub fn arm(delay: Duration) -> Self {
        Self { sleep: Some(Box::pin(sleep(delay))), state: TimerState::Armed }
    }

    /// Resolves once, when the delay elapses. Never resolves after firing or release.
    pub async fn fired(&mut self) {
        if self.state != TimerState::Armed {
            return std::future::pending().await;
        }
        if let Some(sleep) = self.sleep.as_mut() {
            sleep.as_mut().await;
        }
        self.state = TimerState::Fired;
        self.sleep = None;
    }

    pub fn is_armed(&self) -> bool { self.state == TimerState::Armed }
    pub fn has_fired(&self) -> bool { self.state == TimerState::Fired }

    /// Cancel if still armed. Returns whether it had fired.
    pub fn release(&mut self) -> bool {
        let fired = self.has_fired();
        self.sleep = None;
        self.state = TimerState::Released;
        fired
    }
}
