use airdrop_utils::{config::Config, moralis::MoralisApi, resolver::BalanceResolver, BatchRunner};
use tracing::{info, warn};

/// Wires the configured providers into a runner. The managed API is only used when an API
/// key is configured; without one every lookup goes straight to the RPC endpoints.
pub fn build_runner(config: &Config) -> crate::error::Result<BatchRunner<MoralisApi>> {
    let client = config.http_client()?;
    let endpoints = config.rpc_endpoints(&client)?;

    let moralis = config.moralis_api(&client)?;
    match &moralis {
        Some(_) => info!(base_url = %config.moralis_base_url, "using Moralis with RPC fallback"),
        None => warn!("no Moralis API key configured, reading balances over RPC only"),
    }
    info!(endpoints = endpoints.len(), chain = %config.chain, "RPC fallback configured");

    let resolver = BalanceResolver::new(moralis, config.chain.clone(), endpoints);
    Ok(BatchRunner::new(resolver, config.wallet_delay()))
}
