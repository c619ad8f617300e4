pub mod airdrop;
pub mod alloy;
pub mod batch;
pub mod config;
pub mod disk_storage;
pub mod error;
pub mod fallback;
pub mod managed_api;
pub mod moralis;
pub mod reqwest;
pub mod resolver;
pub mod rpc;
pub mod rpc_types;
pub mod serde;
pub mod shutdown;

#[cfg(test)]
mod tests;
#[cfg(test)]
pub mod testutils;

pub use error::{Result, UtilsError as Error};

pub use batch::{BatchResult, BatchRunner, Progress};
pub use managed_api::ManagedApi;
pub use reqwest::Reqwest;
pub use resolver::{BalanceQuery, BalanceRecord, BalanceResolver};
