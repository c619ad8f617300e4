use airdrop_common::{Amount, Error as CommonError};
use serde::Serialize;

/// Fractional digits shown for the USD value and the airdrop amount.
const DISPLAY_DECIMALS: u8 = 2;

/// Airdrop estimate derived from a batch total: `usd = total * price` and
/// `airdrop = usd * ratio`, both rounded half-up to cents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirdropEstimate {
    pub token_balance: String,
    pub usd_value: String,
    pub airdrop_tokens: String,
}

impl AirdropEstimate {
    pub fn from_total(total: &str, price: &Amount, ratio: &Amount) -> crate::Result<Self> {
        let total: Amount = total.parse()?;
        let usd = total
            .checked_mul(price)
            .ok_or(CommonError::DecimalOverflow)?;
        let airdrop = usd.checked_mul(ratio).ok_or(CommonError::DecimalOverflow)?;

        let cents = |amount: Amount| {
            amount
                .round_dp(DISPLAY_DECIMALS)
                .map(|a| a.to_string())
                .ok_or(CommonError::DecimalOverflow)
        };

        Ok(Self {
            token_balance: total.normalized().to_string(),
            usd_value: cents(usd)?,
            airdrop_tokens: cents(airdrop)?,
        })
    }
}
