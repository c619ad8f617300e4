//! Historical ERC-20 balance lookup for one wallet.
//!
//! A managed indexing API is asked first when one is configured. When it is missing, fails,
//! or has nothing for the token, the balance is read directly from chain state with three
//! `eth_call`s (`decimals`, `symbol`, `balanceOf`) against an ordered list of JSON-RPC
//! endpoints, where the first endpoint answering all three wins.

use airdrop_common::{
    amount::{format_units_fixed, parse_raw_integer},
    erc20,
};
use alloy::primitives::Address;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    error::EndpointFailure,
    fallback,
    managed_api::{ManagedApi, TokenBalanceEntry, WalletTokenBalancesRequest},
    rpc::RpcEndpoint,
};

pub const DEFAULT_DECIMALS: u8 = 18;
pub const DEFAULT_MANAGED_SYMBOL: &str = "FUNDED";
pub const DEFAULT_RPC_SYMBOL: &str = "TOKEN";
/// Base mainnet as the managed API names it.
pub const DEFAULT_CHAIN: &str = "0x2105";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalanceQuery {
    pub token_address: Address,
    pub wallet_address: Address,
    pub block_number: u64,
}

/// Balance of one wallet at one block. On failure `error` is set and both balances are `"0"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRecord {
    pub token_address: Address,
    pub wallet_address: String,
    pub block_number: u64,
    /// `raw_balance / 10^decimals` with exactly `decimals` fractional digits.
    pub balance: String,
    pub symbol: String,
    pub decimals: u8,
    /// Base-10 as reported by the managed API, or the `balanceOf` return data as the node sent
    /// it (`0x` followed by the full 32-byte word) when read over RPC.
    pub raw_balance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BalanceRecord {
    pub fn resolved(
        query: &BalanceQuery,
        balance: String,
        symbol: String,
        decimals: u8,
        raw_balance: String,
    ) -> Self {
        Self {
            token_address: query.token_address,
            wallet_address: query.wallet_address.to_checksum(None),
            block_number: query.block_number,
            balance,
            symbol,
            decimals,
            raw_balance,
            error: None,
        }
    }

    pub fn failed(
        token_address: Address,
        wallet_address: String,
        block_number: u64,
        error: String,
    ) -> Self {
        Self {
            token_address,
            wallet_address,
            block_number,
            balance: "0".to_string(),
            symbol: DEFAULT_MANAGED_SYMBOL.to_string(),
            decimals: DEFAULT_DECIMALS,
            raw_balance: "0".to_string(),
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    fn from_managed_entry(query: &BalanceQuery, entry: TokenBalanceEntry) -> crate::Result<Self> {
        let decimals = entry.decimals.unwrap_or(DEFAULT_DECIMALS);
        let raw_balance = entry
            .balance
            .map(|b| b.trim().to_string())
            .unwrap_or_else(|| "0".to_string());
        let balance = format_units_fixed(parse_raw_integer(&raw_balance)?, decimals);
        let symbol = entry
            .symbol
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MANAGED_SYMBOL.to_string());

        Ok(Self::resolved(query, balance, symbol, decimals, raw_balance))
    }
}

pub struct BalanceResolver<M> {
    managed_api: Option<M>,
    chain: String,
    endpoints: Vec<RpcEndpoint>,
}

impl<M: ManagedApi> BalanceResolver<M> {
    pub fn new(
        managed_api: Option<M>,
        chain: impl Into<String>,
        endpoints: Vec<RpcEndpoint>,
    ) -> Self {
        Self {
            managed_api,
            chain: chain.into(),
            endpoints,
        }
    }

    pub fn managed_api(&self) -> Option<&M> {
        self.managed_api.as_ref()
    }

    pub fn endpoints(&self) -> &[RpcEndpoint] {
        &self.endpoints
    }

    pub async fn resolve(&self, query: &BalanceQuery) -> crate::Result<BalanceRecord> {
        let managed_failure = match &self.managed_api {
            Some(api) => match self.resolve_managed(api, query).await {
                Ok(record) => return Ok(record),
                Err(err) => {
                    warn!(
                        wallet = %query.wallet_address,
                        error = %err,
                        "managed API lookup failed, falling back to RPC"
                    );
                    Some(err.to_string())
                }
            },
            None => {
                debug!(wallet = %query.wallet_address, "no managed API configured, using RPC");
                None
            }
        };

        match self.resolve_rpc(query).await {
            Ok(record) => Ok(record),
            Err(rpc_err) => Err(match managed_failure {
                Some(managed) => crate::Error::BalanceUnavailable {
                    managed,
                    fallback: Box::new(rpc_err),
                },
                None => rpc_err,
            }),
        }
    }

    async fn resolve_managed(
        &self,
        api: &M,
        query: &BalanceQuery,
    ) -> crate::Result<BalanceRecord> {
        let request = WalletTokenBalancesRequest {
            address: query.wallet_address,
            chain: self.chain.clone(),
            token_addresses: vec![query.token_address],
            to_block: query.block_number,
        };

        let entries = api.wallet_token_balances(&request).await?;
        let entry = entries
            .into_iter()
            .find(|entry| entry.token_address == Some(query.token_address))
            .ok_or(crate::Error::ManagedApiEmptyResult {
                token: query.token_address,
            })?;

        let record = BalanceRecord::from_managed_entry(query, entry)?;
        debug!(
            wallet = %query.wallet_address,
            balance = %record.balance,
            "resolved via managed API"
        );
        Ok(record)
    }

    async fn resolve_rpc(&self, query: &BalanceQuery) -> crate::Result<BalanceRecord> {
        let result = fallback::first_success(&self.endpoints, |endpoint| {
            read_from_endpoint(endpoint, query)
        })
        .await;

        result.map_err(|failures| {
            let failures = failures
                .into_iter()
                .map(|(endpoint, err)| {
                    warn!(endpoint = %endpoint.url(), error = %err, "RPC endpoint failed");
                    EndpointFailure {
                        url: endpoint.url().to_string(),
                        reason: err.to_string(),
                    }
                })
                .collect();
            crate::Error::AllEndpointsExhausted { failures }
        })
    }
}

async fn read_from_endpoint(
    endpoint: &RpcEndpoint,
    query: &BalanceQuery,
) -> crate::Result<BalanceRecord> {
    let token = query.token_address;
    let block = query.block_number;

    let data = endpoint
        .eth_call(token, erc20::decimals_calldata(), block)
        .await?;
    let decimals = erc20::decode_decimals(&data)?;

    // A reverting `symbol()` only loses the symbol; transport failures still fail the endpoint.
    let symbol = match endpoint
        .eth_call(token, erc20::symbol_calldata(), block)
        .await
    {
        Ok(data) => erc20::decode_symbol(&data),
        Err(err @ crate::Error::JsonRpc { .. }) => {
            debug!(endpoint = %endpoint.url(), %token, error = %err, "symbol() call failed");
            None
        }
        Err(err) => return Err(err),
    }
    .unwrap_or_else(|| {
        debug!(endpoint = %endpoint.url(), %token, "no usable symbol, using default");
        DEFAULT_RPC_SYMBOL.to_string()
    });

    let data = endpoint
        .eth_call(token, erc20::balance_of_calldata(query.wallet_address), block)
        .await?;
    let raw = erc20::decode_balance(&data)?;
    let raw_balance = data.to_string();

    debug!(
        endpoint = %endpoint.url(),
        wallet = %query.wallet_address,
        block,
        "resolved via RPC"
    );
    Ok(BalanceRecord::resolved(
        query,
        format_units_fixed(raw, decimals),
        symbol,
        decimals,
        raw_balance,
    ))
}
