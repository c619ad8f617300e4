use std::fmt;

use airdrop_common::ApiKey;
use reqwest::Client;
use serde::{
    de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer,
};
use tracing::debug;

use crate::{
    managed_api::{ManagedApi, TokenBalanceEntry, WalletTokenBalancesRequest},
    Reqwest,
};

pub const DEFAULT_BASE_URL: &str = "https://deep-index.moralis.io/api/v2.2";

/// The wallet endpoint answers either with a bare array or with a paginated `{ result }`
/// wrapper depending on API version. Read with a visitor rather than `untagged` so entries
/// are deserialized straight from the response text and balances keep their raw digits.
#[derive(Debug)]
struct MoralisResponse(Vec<TokenBalanceEntry>);

impl<'de> Deserialize<'de> for MoralisResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ResponseVisitor;

        impl<'de> Visitor<'de> for ResponseVisitor {
            type Value = MoralisResponse;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an array of token balances or an object with a `result` array")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some(entry) = seq.next_element()? {
                    entries.push(entry);
                }
                Ok(MoralisResponse(entries))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut result = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == "result" {
                        result = Some(map.next_value()?);
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                result
                    .map(MoralisResponse)
                    .ok_or_else(|| de::Error::missing_field("result"))
            }
        }

        deserializer.deserialize_any(ResponseVisitor)
    }
}

#[derive(Clone, Debug)]
pub struct MoralisApi {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl MoralisApi {
    pub fn new(client: Client, base_url: &str, api_key: ApiKey) -> crate::Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        base_url
            .parse::<url::Url>()
            .map_err(|e| crate::Error::UrlParsingFailed(base_url.to_string(), e))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key,
        })
    }
}

impl ManagedApi for MoralisApi {
    // docs: https://docs.moralis.com/web3-data-api/evm/reference/get-wallet-token-balances
    async fn wallet_token_balances(
        &self,
        request: &WalletTokenBalancesRequest,
    ) -> crate::Result<Vec<TokenBalanceEntry>> {
        let mut query = vec![
            ("chain".to_string(), request.chain.clone()),
            ("to_block".to_string(), request.to_block.to_string()),
        ];
        for (i, token) in request.token_addresses.iter().enumerate() {
            query.push((format!("token_addresses[{i}]"), format!("{token:#x}")));
        }

        let url = format!("{}/{:#x}/erc20", self.base_url, request.address);
        debug!(
            %url,
            chain = %request.chain,
            to_block = request.to_block,
            "moralis wallet token balances"
        );

        let response = Reqwest::get(&self.client, url)?
            .header("X-API-Key", self.api_key.expose())
            .header("accept", "application/json")
            .query(&query)
            .receive_json::<MoralisResponse>()
            .await?;

        Ok(response.0)
    }
}
