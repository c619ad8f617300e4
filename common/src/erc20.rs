//! Calldata encoding and return-data decoding for the read-only ERC-20 calls used to
//! resolve a balance over plain `eth_call`.

use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
    sol_types::SolCall,
};

use crate::Error;

sol! {
    interface IERC20 {
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function balanceOf(address owner) external view returns (uint256);
    }
}

pub fn decimals_calldata() -> Bytes {
    IERC20::decimalsCall {}.abi_encode().into()
}

pub fn symbol_calldata() -> Bytes {
    IERC20::symbolCall {}.abi_encode().into()
}

pub fn balance_of_calldata(owner: Address) -> Bytes {
    IERC20::balanceOfCall { owner }.abi_encode().into()
}

/// Reads the first ABI word as a big-endian unsigned integer. Shorter payloads are accepted
/// as-is since some nodes strip the padding.
pub fn decode_uint(data: &[u8], call: &'static str) -> crate::Result<U256> {
    if data.is_empty() {
        return Err(Error::EmptyReturnData(call));
    }
    let word = &data[..data.len().min(32)];
    Ok(U256::from_be_slice(word))
}

pub fn decode_decimals(data: &[u8]) -> crate::Result<u8> {
    let value = decode_uint(data, "decimals()")?;
    u8::try_from(value).map_err(|_| Error::DecimalsOutOfRange(value))
}

pub fn decode_balance(data: &[u8]) -> crate::Result<U256> {
    decode_uint(data, "balanceOf(address)")
}

/// Decodes the `symbol()` return value. Handles the standard ABI string encoding as well as
/// legacy tokens returning a NUL-padded `bytes32`. Returns `None` when neither yields
/// printable text.
pub fn decode_symbol(data: &[u8]) -> Option<String> {
    let symbol = match IERC20::symbolCall::abi_decode_returns(data) {
        Ok(symbol) => symbol,
        Err(_) => decode_bytes32_text(data)?,
    };

    let symbol = symbol.trim_matches('\0').trim();
    if symbol.is_empty() || symbol.chars().any(char::is_control) {
        None
    } else {
        Some(symbol.to_string())
    }
}

fn decode_bytes32_text(data: &[u8]) -> Option<String> {
    if data.len() != 32 {
        return None;
    }
    let end = data.iter().position(|b| *b == 0).unwrap_or(data.len());
    String::from_utf8(data[..end].to_vec()).ok()
}
