//! Beelaunch: launchpad wallet session. Sequences containers, unlocks the wallet, tracks balance.
//!
//! # Architecture
//!
//! ```text
//! Presentation (HTTP server, CLI)
//!   │
//!   └── Orchestrator
//!         ├── SessionHandle (watch channel of WalletSession)
//!         ├── ContainerLifecycle ──▶ ProcessLauncher (tor, wallet, ...)
//!         └── WalletClient ───────▶ HttpWalletClient (identity, balance)
//! ```
//!
//! # Routines
//!
//! | Routine | Method | Description |
//! |---------|--------|-------------|
//! | unlock | `orchestrator.unlock()` | Start transport then wallet, fetch identity and balance |
//! | stop | `orchestrator.stop()` | Stop wallet, stop transport if unused, lock |
//! | refresh | `orchestrator.refresh_balance()` | Debounced, best-effort balance refresh |
//! | view | `orchestrator.view()` | Session plus derived busy/ready |
//!
//! # Features
//!
//! - `native` - Process launcher, HTTP wallet client, HTTP server, logging
//!
//! # Usage
//!
//! ```ignore
//! use beelaunch::{HttpWalletClient, LaunchConfig, Orchestrator, ProcessLauncher, SessionConfig};
//! use std::sync::Arc;
//!
//! let launcher = Arc::new(ProcessLauncher::new(LaunchConfig::from_json(&raw)?));
//! let wallet = Arc::new(HttpWalletClient::new("http://127.0.0.1:18143"));
//! let orchestrator = Orchestrator::new(launcher, wallet, SessionConfig::new().with_credential("pw"));
//!
//! orchestrator.unlock().await?;
//! let view = orchestrator.view();
//! ```

// =============================================================================
// Shared modules (compile everywhere)
// =============================================================================
pub mod container;
pub mod core;
pub mod session;
pub mod wallet;

// =============================================================================
// Native-only modules (server, logging, signals)
// =============================================================================
#[cfg(feature = "native")]
pub mod logging;
#[cfg(feature = "native")]
pub mod runtime;
#[cfg(feature = "native")]
pub mod server;

// =============================================================================
// Re-exports: Shared
// =============================================================================
pub use container::{ContainerError, ContainerId, ContainerKind, ContainerLifecycle, ContainerStatus, StartConfig};
pub use self::core::{Credential, Derived};
pub use session::{
    Orchestrator, RefreshReport, RpcCall, SessionConfig, SessionError, SessionHandle, SessionPhase, SessionView, SettlePolicy,
    WalletSession,
};
pub use wallet::{BalanceSnapshot, Identity, RpcError, WalletBalance, WalletClient};

// =============================================================================
// Re-exports: Native
// =============================================================================
#[cfg(feature = "native")]
pub use container::{CommandSpec, LaunchConfig, ProcessLauncher};
#[cfg(feature = "native")]
pub use runtime::{install_signal_handlers, Shutdown};
#[cfg(feature = "native")]
pub use server::{create_router, create_router_with_name};
#[cfg(feature = "native")]
pub use wallet::HttpWalletClient;
