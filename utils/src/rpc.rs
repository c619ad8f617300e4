use alloy::primitives::{Address, Bytes};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::{
    rpc_types::{JsonRpcRequest, JsonRpcResponse, ResponsePayload},
    Reqwest,
};

/// A single JSON-RPC node used for raw `eth_call` reads.
#[derive(Clone, Debug)]
pub struct RpcEndpoint {
    url: Url,
    client: Client,
}

impl RpcEndpoint {
    pub fn new(client: Client, url: &str) -> crate::Result<Self> {
        let url = url
            .parse::<Url>()
            .map_err(|e| crate::Error::UrlParsingFailed(url.to_string(), e))?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Executes `eth_call` at `block_number` and returns the raw return data. An error object
    /// in the response is reported as [`crate::Error::JsonRpc`].
    pub async fn eth_call(
        &self,
        to: Address,
        data: Bytes,
        block_number: u64,
    ) -> crate::Result<Bytes> {
        let request = JsonRpcRequest::eth_call(1, to, &data, block_number);
        debug!(endpoint = %self.url, %to, block_number, data = %data, "eth_call");

        let response: JsonRpcResponse<Bytes> = Reqwest::post(&self.client, &self.url)?
            .json_body(&request)
            .receive_json()
            .await?;

        match response.payload {
            ResponsePayload::Success(bytes) => Ok(bytes),
            ResponsePayload::Error(err) => Err(crate::Error::JsonRpc {
                url: self.url.clone(),
                code: err.code,
                message: err.message,
            }),
        }
    }
}
