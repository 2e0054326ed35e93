use super::BalanceSnapshot;
use serde::{Deserialize, Serialize};

/// Balance as shown to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub available: u64,
    /// available - pending outgoing + pending incoming
    pub total: u64,
    /// A refresh is taking long enough to show
    pub pending: bool,
}

impl WalletBalance {
    /// Derive from a wallet snapshot. Clamps at zero if outgoing exceeds the rest.
    pub fn from_snapshot(snapshot: &BalanceSnapshot) -> Self {
        let total = snapshot
            .available
            .saturating_add(snapshot.pending_incoming)
            .saturating_sub(snapshot.pending_outgoing);
        Self { available: snapshot.available, total, pending: false }
    }
}

impl From<BalanceSnapshot> for WalletBalance {
    fn from(snapshot: BalanceSnapshot) -> Self { Self::from_snapshot(&snapshot) }
}
