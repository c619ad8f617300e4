use std::future::Future;

use alloy::primitives::Address;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// Query for the ERC-20 balances of one wallet as of a historical block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletTokenBalancesRequest {
    pub address: Address,
    /// Provider chain identifier, e.g. `0x2105` for Base.
    pub chain: String,
    pub token_addresses: Vec<Address>,
    pub to_block: u64,
}

/// One token balance as reported by a managed indexing API. Providers disagree on field
/// casing and on whether numbers are quoted, the aliases and `PickFirst` absorb that.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TokenBalanceEntry {
    #[serde(default, alias = "tokenAddress")]
    pub token_address: Option<Address>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub decimals: Option<u8>,
    /// Base-10 integer in the token's smallest unit.
    #[serde(default, deserialize_with = "crate::serde::string_or_number")]
    pub balance: Option<String>,
}

/// A hosted indexing service able to answer historical token balance queries without
/// running `eth_call` ourselves.
pub trait ManagedApi: Send + Sync {
    fn wallet_token_balances(
        &self,
        request: &WalletTokenBalancesRequest,
    ) -> impl Future<Output = crate::Result<Vec<TokenBalanceEntry>>> + Send;
}
