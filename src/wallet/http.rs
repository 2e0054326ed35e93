//! HttpWalletClient - wallet RPC over plain HTTP+JSON

use super::{BalanceSnapshot, Identity, RpcError, WalletClient};
use crate::core::paths::wallet_rpc;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

pub struct HttpWalletClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpWalletClient {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), client: reqwest::Client::new() }
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RpcError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Wallet RPC");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Status(status.as_u16()));
        }
        response.json::<T>().await.map_err(|e| RpcError::Decode(e.to_string()))
    }
}

#[async_trait]
impl WalletClient for HttpWalletClient {
    async fn get_identity(&self) -> Result<Identity, RpcError> {
        self.get_json(wallet_rpc::IDENTITY).await
    }

    async fn get_balance(&self) -> Result<BalanceSnapshot, RpcError> {
        self.get_json(wallet_rpc::BALANCE).await
    }
}
