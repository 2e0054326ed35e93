//! Route, environment and file-name constants
//!
//! Centralized registry so the server, the CLI client and the adapters agree.

/// HTTP routes served by `server::create_router`
pub mod routes {
    pub const HEALTH: &str = "/health";
    pub const SESSION: &str = "/session";
    pub const UNLOCK: &str = "/session/unlock";
    pub const STOP: &str = "/session/stop";
    pub const BALANCE: &str = "/session/balance";
}

/// Wallet RPC endpoints, relative to the wallet base URL
pub mod wallet_rpc {
    pub const IDENTITY: &str = "/identity";
    pub const BALANCE: &str = "/balance";
}

/// Environment variables read by the binary and passed to children
pub mod env {
    pub const LOG_JSON: &str = "BEELAUNCH_LOG_JSON";
    pub const CONFIG: &str = "BEELAUNCH_CONFIG";
    pub const PORT: &str = "BEELAUNCH_PORT";
    pub const WALLET_URL: &str = "BEELAUNCH_WALLET_URL";
    pub const WALLET_PASSWORD: &str = "BEELAUNCH_WALLET_PASSWORD";

    /// Child process environment
    pub const CHILD_WORKSPACE: &str = "BEELAUNCH_WORKSPACE";
    pub const CHILD_DATA_FOLDER: &str = "DATA_FOLDER";
    pub const CHILD_APP_NAME: &str = "APP_NAME";
    pub const CHILD_WALLET_PASSWORD: &str = "WALLET_PASSWORD";
}

pub const SERVICE_NAME: &str = "beelaunch";
pub const DEFAULT_PORT: u16 = 18100;
pub const DEFAULT_WALLET_URL: &str = "http://127.0.0.1:18143";
pub const DEFAULT_WORKSPACE: &str = "default";
