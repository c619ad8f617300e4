use alloy::primitives::U256;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Contract call `{0}` returned empty data.")]
    EmptyReturnData(&'static str),

    #[error("Token decimals value {0} does not fit into a u8.")]
    DecimalsOutOfRange(U256),

    #[error("'{0}' is not a valid decimal number.")]
    InvalidDecimal(String),

    #[error("'{0}' is not a valid integer.")]
    InvalidInteger(String),

    #[error("Decimal arithmetic overflowed.")]
    DecimalOverflow,
}
