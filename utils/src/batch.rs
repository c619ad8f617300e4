use std::time::Duration;

use airdrop_common::Amount;
use alloy::primitives::Address;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    alloy::StringExt,
    managed_api::ManagedApi,
    resolver::{BalanceQuery, BalanceRecord, BalanceResolver},
    shutdown::until_cancelled,
};

pub const DEFAULT_WALLET_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// 1-based position of the wallet being processed.
    pub current: u32,
    pub total: u32,
    pub current_wallet: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub wallets: Vec<BalanceRecord>,
    /// Sum over the successful records, trailing fractional zeros trimmed.
    pub total_balance: String,
    pub total_wallets: u32,
}

/// Resolves a list of wallets one after another, pausing between wallets to stay under
/// provider rate limits. A wallet that cannot be resolved ends up as an error record and
/// does not stop the batch.
pub struct BatchRunner<M> {
    resolver: BalanceResolver<M>,
    delay: Duration,
}

impl<M: ManagedApi> BatchRunner<M> {
    pub fn new(resolver: BalanceResolver<M>, delay: Duration) -> Self {
        Self { resolver, delay }
    }

    pub fn resolver(&self) -> &BalanceResolver<M> {
        &self.resolver
    }

    pub async fn run_batch<S: AsRef<str>>(
        &self,
        addresses: &[S],
        token_address: Address,
        block_number: u64,
        mut on_progress: impl FnMut(Progress),
        cancel: &CancellationToken,
    ) -> crate::Result<BatchResult> {
        let wallets: Vec<&str> = addresses
            .iter()
            .map(|address| address.as_ref().trim())
            .filter(|address| !address.is_empty())
            .collect();
        let total =
            u32::try_from(wallets.len()).map_err(|_| crate::Error::TooManyWallets(wallets.len()))?;

        info!(total, %token_address, block_number, "starting balance batch");

        let mut records = Vec::with_capacity(wallets.len());
        let mut total_balance = Amount::ZERO;

        for (current, wallet) in (1..=total).zip(wallets.iter().copied()) {
            if cancel.is_cancelled() {
                return Err(crate::Error::Cancelled);
            }

            on_progress(Progress {
                current,
                total,
                current_wallet: wallet.to_string(),
            });

            let mut record = self
                .resolve_wallet(wallet, token_address, block_number, cancel)
                .await?;

            if !record.is_error() {
                match add_to_total(&total_balance, &record.balance) {
                    Ok(sum) => total_balance = sum,
                    Err(err) => {
                        warn!(
                            wallet,
                            balance = %record.balance,
                            error = %err,
                            "balance does not fit the running total"
                        );
                        record = BalanceRecord::failed(
                            token_address,
                            wallet.to_string(),
                            block_number,
                            err.to_string(),
                        );
                    }
                }
            }
            records.push(record);

            if current < total {
                until_cancelled(cancel, tokio::time::sleep(self.delay)).await?;
            }
        }

        let failed = records.iter().filter(|r| r.is_error()).count();
        info!(total, failed, "balance batch finished");

        Ok(BatchResult {
            wallets: records,
            total_balance: total_balance.normalized().to_string(),
            total_wallets: total,
        })
    }

    async fn resolve_wallet(
        &self,
        wallet: &str,
        token_address: Address,
        block_number: u64,
        cancel: &CancellationToken,
    ) -> crate::Result<BalanceRecord> {
        let failed = |err: crate::Error| {
            BalanceRecord::failed(
                token_address,
                wallet.to_string(),
                block_number,
                err.to_string(),
            )
        };

        let wallet_address = match wallet.parse_as_address() {
            Ok(address) => address,
            Err(err) => {
                warn!(wallet, "skipping unparsable wallet address");
                return Ok(failed(err));
            }
        };

        let query = BalanceQuery {
            token_address,
            wallet_address,
            block_number,
        };
        match until_cancelled(cancel, self.resolver.resolve(&query)).await? {
            Ok(record) => Ok(record),
            Err(err) => {
                warn!(wallet, error = %err, "wallet balance unavailable");
                Ok(failed(err))
            }
        }
    }
}

fn add_to_total(total: &Amount, balance: &str) -> airdrop_common::Result<Amount> {
    let amount = balance.parse::<Amount>()?.normalized();
    total
        .checked_add(&amount)
        .ok_or(airdrop_common::Error::DecimalOverflow)
}
