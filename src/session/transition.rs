//! Pure session transitions. Each takes the current state and returns the next.

use super::{SessionPhase, WalletSession};
use crate::wallet::WalletBalance;

pub fn begin_unlock(s: &WalletSession) -> WalletSession {
    WalletSession { pending: true, phase: SessionPhase::Unlocking, ..s.clone() }
}

/// Unlock succeeded with the fetched identity and balance
pub fn finish_unlock(s: &WalletSession, address: &str, balance: WalletBalance) -> WalletSession {
    WalletSession {
        unlocked: true,
        pending: false,
        phase: SessionPhase::Unlocked,
        address: address.to_string(),
        balance: WalletBalance { pending: false, ..balance },
        ..s.clone()
    }
}

/// Unlock failed. `unlocked` is left as it was.
pub fn fail_unlock(s: &WalletSession) -> WalletSession {
    let phase = if s.unlocked { SessionPhase::Unlocked } else { SessionPhase::Locked };
    WalletSession { pending: false, phase, ..s.clone() }
}

pub fn begin_stop(s: &WalletSession) -> WalletSession {
    WalletSession { pending: true, phase: SessionPhase::Stopping, ..s.clone() }
}

/// Stop settled, success or not. Back to defaults.
pub fn finish_stop(_s: &WalletSession) -> WalletSession {
    WalletSession::default()
}

/// Debounce fired while a refresh is in flight
pub fn mark_balance_pending(s: &WalletSession) -> WalletSession {
    if !s.unlocked {
        return s.clone();
    }
    let mut next = s.clone();
    next.balance.pending = true;
    next
}

/// Store a refreshed balance. Ignored once the session is locked.
pub fn commit_balance(s: &WalletSession, balance: WalletBalance) -> WalletSession {
    if !s.unlocked {
        return s.clone();
    }
    WalletSession { balance: WalletBalance { pending: false, ..balance }, ..s.clone() }
}

/// Refresh failed. Keep the old values.
pub fn clear_balance_pending(s: &WalletSession) -> WalletSession {
    let mut next = s.clone();
    next.balance.pending = false;
    next
}
