use std::collections::HashMap;

use airdrop_common::ApiKey;
use alloy::primitives::{address, Address};
use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use reqwest::Client;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::{
    error::UtilsError,
    managed_api::{ManagedApi, WalletTokenBalancesRequest},
    moralis::MoralisApi,
};

const TOKEN: Address = address!("c1d5892e28ea1c5ecd9fac7771b9d06802f321e0");
const WALLET: Address = address!("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
const API_KEY: &str = "test-key";

async fn wallet_erc20(
    Path(wallet): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return (StatusCode::UNAUTHORIZED, "missing api key").into_response();
    }
    if query.get("chain").map(String::as_str) != Some("0x2105")
        || query.get("to_block").map(String::as_str) != Some("26161082")
        || query.get("token_addresses[0]").map(String::as_str)
            != Some("0xc1d5892e28ea1c5ecd9fac7771b9d06802f321e0")
    {
        return (StatusCode::BAD_REQUEST, format!("unexpected query {query:?}")).into_response();
    }

    if wallet == "0x0000000000000000000000000000000000000004" {
        // Balance as a bare JSON number wider than u64.
        let body = r#"[{"token_address":"0xc1d5892e28ea1c5ecd9fac7771b9d06802f321e0",
            "decimals":"18","balance":123456789012345678901234567890}]"#;
        return ([("content-type", "application/json")], body).into_response();
    }

    let entry = json!({
        "token_address": "0xc1d5892e28ea1c5ecd9fac7771b9d06802f321e0",
        "symbol": "FUNDED",
        "decimals": 18,
        "balance": "1500000000000000000"
    });
    let body: Value = match wallet.as_str() {
        // The wrapped shape newer API versions return.
        "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed" => json!({ "result": [entry], "cursor": null }),
        "0x0000000000000000000000000000000000000001" => json!([entry]),
        "0x0000000000000000000000000000000000000002" => json!({ "result": "nope" }),
        _ => json!([]),
    };
    Json(body).into_response()
}

async fn spawn_moralis() -> String {
    let app = Router::new().route("/{wallet}/erc20", get(wallet_erc20));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

fn request(address: Address) -> WalletTokenBalancesRequest {
    WalletTokenBalancesRequest {
        address,
        chain: "0x2105".to_string(),
        token_addresses: vec![TOKEN],
        to_block: 26161082,
    }
}

fn api(base_url: &str, key: &str) -> MoralisApi {
    MoralisApi::new(Client::new(), base_url, ApiKey::new(key).unwrap()).unwrap()
}

#[tokio::test]
async fn reads_wrapped_and_bare_responses() {
    let base_url = spawn_moralis().await;
    let api = api(&base_url, API_KEY);

    let wrapped = api.wallet_token_balances(&request(WALLET)).await.unwrap();
    assert_eq!(wrapped.len(), 1);
    assert_eq!(wrapped[0].token_address, Some(TOKEN));
    assert_eq!(wrapped[0].decimals, Some(18));
    assert_eq!(wrapped[0].balance.as_deref(), Some("1500000000000000000"));

    let bare = api
        .wallet_token_balances(&request(Address::with_last_byte(1)))
        .await
        .unwrap();
    assert_eq!(bare, wrapped);

    let empty = api
        .wallet_token_balances(&request(Address::with_last_byte(3)))
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn wide_numeric_balance_keeps_every_digit() {
    let base_url = spawn_moralis().await;
    let entries = api(&base_url, API_KEY)
        .wallet_token_balances(&request(Address::with_last_byte(4)))
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].decimals, Some(18));
    assert_eq!(
        entries[0].balance.as_deref(),
        Some("123456789012345678901234567890")
    );
}

#[tokio::test]
async fn bad_api_key_surfaces_status() {
    let base_url = spawn_moralis().await;
    let err = api(&base_url, "wrong")
        .wallet_token_balances(&request(WALLET))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn malformed_body_is_a_deserialise_error() {
    let base_url = spawn_moralis().await;
    let err = api(&base_url, API_KEY)
        .wallet_token_balances(&request(Address::with_last_byte(2)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        UtilsError::ReqwestFailed {
            stage: crate::reqwest::ReqwestStage::Deserialise,
            ..
        }
    ));
}

#[tokio::test]
async fn rejects_invalid_base_url() {
    let result = MoralisApi::new(Client::new(), "not a url", ApiKey::new("k").unwrap());
    assert!(matches!(result, Err(UtilsError::UrlParsingFailed(..))));
}
