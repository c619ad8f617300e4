use airdrop_utils::{airdrop::AirdropEstimate, BalanceRecord, BatchResult};
use console::style;

/// Groups the integer part in thousands, leaving any fraction untouched:
/// `1234567.25` becomes `1,234,567.25`.
pub fn group_thousands(amount: &str) -> String {
    let (integer, fraction) = match amount.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (amount, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(fraction) => format!("{grouped}.{fraction}"),
        None => grouped,
    }
}

/// Drops trailing fractional zeros and groups thousands, without rounding.
pub fn display_amount(amount: &str) -> String {
    let trimmed = match amount.split_once('.') {
        Some((integer, fraction)) => match fraction.trim_end_matches('0') {
            "" => integer.to_string(),
            fraction => format!("{integer}.{fraction}"),
        },
        None => amount.to_string(),
    };
    group_thousands(&trimmed)
}

pub fn wallet_card(record: &BalanceRecord) -> String {
    match &record.error {
        Some(error) => format!(
            "{}  {}\n    {} {}",
            style(&record.wallet_address).bold(),
            style("unavailable").red(),
            style("error:").red(),
            error
        ),
        None => format!(
            "{}  {} {}",
            style(&record.wallet_address).bold(),
            style(display_amount(&record.balance)).green(),
            record.symbol
        ),
    }
}

pub fn summary(result: &BatchResult, estimate: &AirdropEstimate, price: &str) -> String {
    let symbol = result
        .wallets
        .iter()
        .find(|r| !r.is_error())
        .map_or("FUNDED", |r| r.symbol.as_str());
    let failed = result.wallets.iter().filter(|r| r.is_error()).count();

    let mut lines = vec![
        style("Airdrop estimate").bold().underlined().to_string(),
        format!(
            "  Total token balance: {} {symbol}",
            display_amount(&estimate.token_balance)
        ),
        format!(
            "  USD value (@ ${price}): ${}",
            group_thousands(&estimate.usd_value)
        ),
        format!(
            "  Estimated airdrop: {}",
            style(group_thousands(&estimate.airdrop_tokens)).green().bold()
        ),
        format!(
            "  Based on {} wallet{}",
            result.total_wallets,
            if result.total_wallets == 1 { "" } else { "s" }
        ),
    ];
    if failed > 0 {
        lines.push(format!(
            "  {}",
            style(format!("{failed} wallet(s) could not be checked")).yellow()
        ));
    }
    lines.join("\n")
}
