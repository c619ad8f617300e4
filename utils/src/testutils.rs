//! Test doubles for balance resolution.
//!
//! [`MockNode`] is an in-process JSON-RPC server answering the three ERC-20 reads over real
//! HTTP, and [`MockManagedApi`] is a scripted managed indexing API.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use alloy::primitives::{Address, Bytes, U256};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use reqwest::Client;
use tokio::net::TcpListener;

use crate::{
    managed_api::{ManagedApi, TokenBalanceEntry, WalletTokenBalancesRequest},
    rpc::RpcEndpoint,
    rpc_types::JsonRpcRequest,
};

/// Nothing listens on port 1, so connecting fails immediately.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1/";

const DECIMALS_SELECTOR: &str = "313ce567";
const SYMBOL_SELECTOR: &str = "95d89b41";
const BALANCE_OF_SELECTOR: &str = "70a08231";

pub fn abi_encode_string(s: &str) -> Bytes {
    let mut out = U256::from(0x20u8).to_be_bytes::<32>().to_vec();
    out.extend(U256::from(s.len()).to_be_bytes::<32>());
    let mut data = s.as_bytes().to_vec();
    data.resize(s.len().div_ceil(32) * 32, 0);
    out.extend(data);
    out.into()
}

fn word(value: U256) -> Bytes {
    value.to_be_bytes::<32>().to_vec().into()
}

#[derive(Clone, Debug)]
pub enum NodeBehaviour {
    /// Serves a token with the given metadata; every wallet holds `balance`.
    Token {
        decimals: u64,
        symbol_return: Bytes,
        balance: U256,
    },
    /// Every request fails with this HTTP status.
    HttpStatus(u16),
    /// Every request gets a JSON-RPC error object.
    RpcError,
    /// `balanceOf` returns empty data, as for a call to an address without code.
    EmptyBalance { decimals: u64 },
    /// Like [`NodeBehaviour::Token`] but `symbol()` reverts.
    RevertingSymbol { decimals: u64, balance: U256 },
}

impl NodeBehaviour {
    pub fn token(decimals: u64, symbol: &str, balance: U256) -> Self {
        NodeBehaviour::Token {
            decimals,
            symbol_return: abi_encode_string(symbol),
            balance,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub to: String,
    pub selector: String,
    pub block_tag: String,
}

struct MockNodeState {
    behaviour: NodeBehaviour,
    calls: Mutex<Vec<RecordedCall>>,
}

pub struct MockNode {
    url: String,
    state: Arc<MockNodeState>,
}

impl MockNode {
    pub async fn spawn(behaviour: NodeBehaviour) -> Self {
        let state = Arc::new(MockNodeState {
            behaviour,
            calls: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/", post(handle_rpc))
            .with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/"),
            state,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn endpoint(&self, client: &Client) -> RpcEndpoint {
        RpcEndpoint::new(client.clone(), &self.url).unwrap()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }
}

pub fn unreachable_endpoint(client: &Client) -> RpcEndpoint {
    RpcEndpoint::new(client.clone(), UNREACHABLE_URL).unwrap()
}

async fn handle_rpc(
    State(state): State<Arc<MockNodeState>>,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    let params = request.params.clone().unwrap_or_default();
    let call = RecordedCall {
        to: params[0]["to"].as_str().unwrap_or_default().to_lowercase(),
        selector: params[0]["data"]
            .as_str()
            .unwrap_or_default()
            .trim_start_matches("0x")
            .chars()
            .take(8)
            .collect(),
        block_tag: params[1].as_str().unwrap_or_default().to_string(),
    };
    state.calls.lock().unwrap().push(call.clone());

    let result = match &state.behaviour {
        NodeBehaviour::HttpStatus(code) => {
            let status = StatusCode::from_u16(*code).unwrap();
            return (status, "unavailable").into_response();
        }
        NodeBehaviour::RpcError => {
            return Json(request.create_error_response(-32000, "execution reverted"))
                .into_response();
        }
        NodeBehaviour::Token {
            decimals,
            symbol_return,
            balance,
        } => match call.selector.as_str() {
            DECIMALS_SELECTOR => word(U256::from(*decimals)),
            SYMBOL_SELECTOR => symbol_return.clone(),
            BALANCE_OF_SELECTOR => word(*balance),
            _ => Bytes::new(),
        },
        NodeBehaviour::RevertingSymbol { decimals, balance } => match call.selector.as_str() {
            DECIMALS_SELECTOR => word(U256::from(*decimals)),
            SYMBOL_SELECTOR => {
                return Json(request.create_error_response(-32000, "execution reverted"))
                    .into_response();
            }
            _ => word(*balance),
        },
        NodeBehaviour::EmptyBalance { decimals } => match call.selector.as_str() {
            DECIMALS_SELECTOR => word(U256::from(*decimals)),
            SYMBOL_SELECTOR => abi_encode_string("EMPTY"),
            _ => Bytes::new(),
        },
    };

    Json(request.create_success_response(result)).into_response()
}

#[derive(Clone, Debug)]
pub enum MockReply {
    Entries(Vec<TokenBalanceEntry>),
    /// Fails the request as a timeout would.
    Fail,
    /// Never answers.
    Pending,
}

/// Managed API double answering per wallet address. Wallets without a scripted reply get
/// an empty entry list.
#[derive(Default)]
pub struct MockManagedApi {
    replies: HashMap<Address, MockReply>,
    requests: Mutex<Vec<WalletTokenBalancesRequest>>,
}

impl MockManagedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, wallet: Address, reply: MockReply) -> Self {
        self.replies.insert(wallet, reply);
        self
    }

    pub fn requests(&self) -> Vec<WalletTokenBalancesRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ManagedApi for MockManagedApi {
    async fn wallet_token_balances(
        &self,
        request: &WalletTokenBalancesRequest,
    ) -> crate::Result<Vec<TokenBalanceEntry>> {
        self.requests.lock().unwrap().push(request.clone());

        match self.replies.get(&request.address).cloned() {
            Some(MockReply::Entries(entries)) => Ok(entries),
            Some(MockReply::Fail) => Err(crate::Error::RequestTimeout(
                "https://managed.invalid/".parse().unwrap(),
            )),
            Some(MockReply::Pending) => std::future::pending().await,
            None => Ok(Vec::new()),
        }
    }
}

pub fn entry(
    token: Address,
    balance: &str,
    decimals: Option<u8>,
    symbol: Option<&str>,
) -> TokenBalanceEntry {
    TokenBalanceEntry {
        token_address: Some(token),
        symbol: symbol.map(String::from),
        decimals,
        balance: Some(balance.to_string()),
    }
}
