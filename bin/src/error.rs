#[derive(Debug, thiserror::Error)]
pub enum BinError {
    #[error(transparent)]
    Utils(#[from] airdrop_utils::Error),

    #[error("Failed to format JSON output. (Error: {0})")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read wallets from stdin. (Error: {0})")]
    Stdin(#[from] std::io::Error),

    #[error("No wallet addresses given.")]
    NoWallets,
}

pub type Result<T> = std::result::Result<T, BinError>;
