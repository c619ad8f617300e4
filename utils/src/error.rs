use std::path::PathBuf;

use alloy::primitives::Address;
use reqwest::StatusCode;
use url::Url;

use crate::reqwest::{ReqwestErrorContext, ReqwestInnerError, ReqwestStage};

pub type Result<T> = std::result::Result<T, UtilsError>;

/// One failed fallback endpoint and why it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointFailure {
    pub url: String,
    pub reason: String,
}

fn format_failures(failures: &[EndpointFailure]) -> String {
    if failures.is_empty() {
        return "no RPC endpoints configured".to_string();
    }
    failures
        .iter()
        .map(|f| format!("{} ({})", f.url, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    #[error(transparent)]
    Common(#[from] airdrop_common::Error),

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    #[error("Address '{0}' is not a valid Ethereum address.")]
    InvalidAddress(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to parse URL: {0}. (Error: {1:?})")]
    UrlParsingFailed(String, url::ParseError),

    #[error("Please check your internet connection, the URL seems to be unreachable: {0}")]
    Internet(Url),

    #[error("Request to {0} timed out.")]
    RequestTimeout(Url),

    #[error("Request '{url}' failed at stage '{stage:?}' (Error='{inner:?}', Context='{context:?}')", url = context.url)]
    ReqwestFailed {
        stage: ReqwestStage,
        context: Box<ReqwestErrorContext>,
        inner: ReqwestInnerError,
    },

    #[error("Reqwest builder missing error context, this is a bug please report it.")]
    ReqwestErrorContextMissing,

    #[error("JSON-RPC endpoint {url} returned error {code}: {message}")]
    JsonRpc {
        url: Url,
        code: i64,
        message: String,
    },

    #[error("Managed API returned no balance entry for token {token}.")]
    ManagedApiEmptyResult { token: Address },

    #[error("All RPC endpoints failed: {}", format_failures(.failures))]
    AllEndpointsExhausted { failures: Vec<EndpointFailure> },

    #[error("Failed to fetch token balance. Managed API: {managed}. Fallback: {fallback}")]
    BalanceUnavailable {
        managed: String,
        fallback: Box<UtilsError>,
    },

    #[error("Batch of {0} wallets is too large.")]
    TooManyWallets(usize),

    #[error("Operation cancelled.")]
    Cancelled,

    #[error("Failed to get base directories.")]
    BaseDirsFailed,

    #[error("Failed to create directory: {0:?}. (Error: {1:?})")]
    CreateDirAllFailed(PathBuf, std::io::Error),

    #[error("Failed to read the file: {0}. (Error: {1:?})")]
    FileReadFailed(PathBuf, std::io::Error),

    #[error("Failed to write to the file: {0}. (Error: {1:?})")]
    FileWriteFailed(PathBuf, std::io::Error),

    #[error("Parsing the toml file failed: {0}. (Error: {1:?})")]
    TomlParsingFailed(PathBuf, toml::de::Error),

    #[error("Formatting to toml format failed: {0}. (Error: {1:?})")]
    TomlFormattingFailed(String, toml::ser::Error),
}

impl UtilsError {
    /// HTTP status of a request that completed with a non-success status.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::ReqwestFailed {
                stage: ReqwestStage::Status,
                inner: ReqwestInnerError::Reqwest(err),
                ..
            } => err.status(),
            _ => None,
        }
    }
}
