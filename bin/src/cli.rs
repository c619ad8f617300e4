use airdrop_common::ApiKey;
use airdrop_utils::config::Config;
use alloy::primitives::Address;
use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "airdrop",
    bin_name = "airdrop",
    version,
    about = "Check historical ERC-20 balances and estimate an airdrop"
)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the balance of one or more wallets and estimate the airdrop. Pass `-` to read
    /// wallets from stdin, one per line.
    #[command(alias = "c")]
    Check {
        #[arg(required = true, value_name = "WALLET")]
        wallets: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up the balance of a single wallet
    #[command(alias = "b")]
    Balance {
        #[arg(value_name = "WALLET")]
        wallet: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Per-invocation overrides on top of `~/.airdrop/config.toml`.
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// ERC-20 token to query
    #[arg(long, env = "AIRDROP_TOKEN", global = true)]
    pub token: Option<Address>,

    /// Historical block the balances are read at
    #[arg(long, env = "AIRDROP_BLOCK", global = true)]
    pub block: Option<u64>,

    /// USD price per token
    #[arg(long, env = "AIRDROP_PRICE", global = true)]
    pub price: Option<String>,

    /// Airdrop tokens per USD
    #[arg(long, env = "AIRDROP_RATIO", global = true)]
    pub ratio: Option<String>,

    /// Chain identifier sent to the managed API
    #[arg(long, env = "AIRDROP_CHAIN", global = true)]
    pub chain: Option<String>,

    /// Fallback JSON-RPC endpoints, tried in order
    #[arg(
        long = "rpc",
        env = "AIRDROP_RPC_ENDPOINTS",
        value_delimiter = ',',
        global = true
    )]
    pub rpc_endpoints: Vec<String>,

    /// Pause between wallets in milliseconds
    #[arg(long, env = "AIRDROP_WALLET_DELAY_MS", global = true)]
    pub delay_ms: Option<u64>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "AIRDROP_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    #[arg(long, env = "AIRDROP_MORALIS_BASE_URL", global = true)]
    pub moralis_base_url: Option<String>,

    #[arg(long, env = "MORALIS_API_KEY", hide_env_values = true, global = true)]
    pub moralis_api_key: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(token) = self.token {
            config.token_address = token;
        }
        if let Some(block) = self.block {
            config.block_number = block;
        }
        if let Some(price) = self.price {
            config.price_per_token = price;
        }
        if let Some(ratio) = self.ratio {
            config.airdrop_ratio = ratio;
        }
        if let Some(chain) = self.chain {
            config.chain = chain;
        }
        if !self.rpc_endpoints.is_empty() {
            config.rpc_endpoints = self.rpc_endpoints;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.wallet_delay_ms = delay_ms;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.request_timeout_secs = timeout_secs;
        }
        if let Some(base_url) = self.moralis_base_url {
            config.moralis_base_url = base_url;
        }
        if let Some(key) = self.moralis_api_key.and_then(ApiKey::new) {
            config.moralis_api_key = Some(key);
        }
    }
}
