use std::time::Duration;

use airdrop_common::{Amount, ApiKey};
use alloy::primitives::{address, Address};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    disk_storage::DiskStorageInterface,
    moralis::{self, MoralisApi},
    resolver::DEFAULT_CHAIN,
    rpc::RpcEndpoint,
};

/// $FUNDED on Base.
pub const DEFAULT_TOKEN_ADDRESS: Address = address!("c1d5892e28ea1c5ecd9fac7771b9d06802f321e0");
pub const DEFAULT_BLOCK_NUMBER: u64 = 26161082;

pub const DEFAULT_RPC_ENDPOINTS: [&str; 4] = [
    "https://mainnet.base.org",
    "https://base.blockpi.network/v1/rpc/public",
    "https://1rpc.io/base",
    "https://base.meowrpc.com",
];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub token_address: Address,
    pub block_number: u64,
    /// USD per token.
    pub price_per_token: String,
    /// Airdrop tokens granted per USD of holdings.
    pub airdrop_ratio: String,
    pub chain: String,
    pub rpc_endpoints: Vec<String>,
    pub wallet_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub moralis_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moralis_api_key: Option<ApiKey>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_address: DEFAULT_TOKEN_ADDRESS,
            block_number: DEFAULT_BLOCK_NUMBER,
            price_per_token: "0.15".to_string(),
            airdrop_ratio: "1".to_string(),
            chain: DEFAULT_CHAIN.to_string(),
            rpc_endpoints: DEFAULT_RPC_ENDPOINTS.map(String::from).to_vec(),
            wallet_delay_ms: 500,
            request_timeout_secs: 15,
            moralis_base_url: moralis::DEFAULT_BASE_URL.to_string(),
            moralis_api_key: None,
        }
    }
}

impl DiskStorageInterface for Config {
    const FILE_NAME: &'static str = "config";
}

impl Config {
    pub fn price_per_token(&self) -> crate::Result<Amount> {
        Ok(self.price_per_token.parse()?)
    }

    pub fn airdrop_ratio(&self) -> crate::Result<Amount> {
        Ok(self.airdrop_ratio.parse()?)
    }

    pub fn wallet_delay(&self) -> Duration {
        Duration::from_millis(self.wallet_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Shared HTTP client; every request made through it is bounded by the configured
    /// timeout.
    pub fn http_client(&self) -> crate::Result<Client> {
        Ok(Client::builder().timeout(self.request_timeout()).build()?)
    }

    pub fn rpc_endpoints(&self, client: &Client) -> crate::Result<Vec<RpcEndpoint>> {
        self.rpc_endpoints
            .iter()
            .map(|url| RpcEndpoint::new(client.clone(), url))
            .collect()
    }

    /// TOML rendering with the API key left out, for showing to the user.
    pub fn to_redacted_toml(&self) -> crate::Result<String> {
        let redacted = Config {
            moralis_api_key: None,
            ..self.clone()
        };
        toml::to_string_pretty(&redacted)
            .map_err(|e| crate::Error::TomlFormattingFailed(format!("{redacted:?}"), e))
    }

    /// `None` when no API key is configured.
    pub fn moralis_api(&self, client: &Client) -> crate::Result<Option<MoralisApi>> {
        self.moralis_api_key
            .clone()
            .map(|key| MoralisApi::new(client.clone(), &self.moralis_base_url, key))
            .transpose()
    }
}
