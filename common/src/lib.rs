pub mod amount;
pub mod erc20;
pub mod error;
pub mod secret;

pub use amount::Amount;
pub use error::Error;
pub use secret::ApiKey;
pub type Result<T> = std::result::Result<T, Error>;
