//! JSON-RPC 2.0 envelope types shared by the `eth_call` client and the in-process test node.

use alloy::primitives::{Address, Bytes};
use serde::{
    de::{Error, Unexpected},
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::{json, Value};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(u64),
    String(String),
    #[default]
    Null,
}

#[derive(Clone, Copy, Debug)]
pub struct TwoPointZero;

impl Serialize for TwoPointZero {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str("2.0")
    }
}

impl<'de> Deserialize<'de> for TwoPointZero {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == "2.0" {
            Ok(TwoPointZero)
        } else {
            Err(D::Error::invalid_value(Unexpected::Str(&s), &"\"2.0\""))
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorObj {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum ResponsePayload<T> {
    #[serde(rename = "result")]
    Success(T),
    #[serde(rename = "error")]
    Error(ErrorObj),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: TwoPointZero,
    pub method: String,
    pub params: Option<Value>,
    pub id: Id,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse<T> {
    pub jsonrpc: TwoPointZero,
    #[serde(flatten)]
    pub payload: ResponsePayload<T>,
    pub id: Id,
}

/// Block tag in the form nodes expect for historical reads, e.g. `0x18f2fba`.
pub fn block_tag(block_number: u64) -> String {
    format!("{block_number:#x}")
}

impl JsonRpcRequest {
    /// `eth_call` against the state as of `block_number`.
    pub fn eth_call(id: u64, to: Address, data: &Bytes, block_number: u64) -> Self {
        Self {
            jsonrpc: TwoPointZero,
            method: "eth_call".to_string(),
            params: Some(json!([
                { "to": format!("{to:#x}"), "data": data },
                block_tag(block_number)
            ])),
            id: Id::Number(id),
        }
    }

    pub fn create_success_response<T>(&self, v: T) -> JsonRpcResponse<T> {
        JsonRpcResponse {
            jsonrpc: TwoPointZero,
            payload: ResponsePayload::Success(v),
            id: self.id.clone(),
        }
    }

    pub fn create_error_response(
        &self,
        code: i64,
        message: impl Into<String>,
    ) -> JsonRpcResponse<Value> {
        JsonRpcResponse {
            jsonrpc: TwoPointZero,
            payload: ResponsePayload::Error(ErrorObj {
                code,
                message: message.into(),
                data: None,
            }),
            id: self.id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    #[test]
    fn eth_call_request_shape() {
        let token = address!("c1d5892e28ea1c5ecd9fac7771b9d06802f321e0");
        let data = Bytes::from_static(&[0x31, 0x3c, 0xe5, 0x67]);
        let request = JsonRpcRequest::eth_call(1, token, &data, 26161082);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "method": "eth_call",
                "params": [
                    { "to": "0xc1d5892e28ea1c5ecd9fac7771b9d06802f321e0", "data": "0x313ce567" },
                    "0x18f2fba"
                ],
                "id": 1
            })
        );
    }

    #[test]
    fn block_tag_is_lowercase_hex() {
        assert_eq!(block_tag(0), "0x0");
        assert_eq!(block_tag(255), "0xff");
        assert_eq!(block_tag(26161082), "0x18f2fba");
    }

    #[test]
    fn parses_result_and_error_payloads() {
        let ok: JsonRpcResponse<Bytes> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x12"}"#).unwrap();
        assert!(matches!(
            ok.payload,
            ResponsePayload::Success(b) if b == Bytes::from_static(&[0x12])
        ));

        let err: JsonRpcResponse<Bytes> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"execution reverted"}}"#,
        )
        .unwrap();
        match err.payload {
            ResponsePayload::Error(obj) => {
                assert_eq!(obj.code, -32000);
                assert_eq!(obj.message, "execution reverted");
            }
            ResponsePayload::Success(_) => panic!("expected error payload"),
        }
    }
}
