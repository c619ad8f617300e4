mod bootstrap;
mod cli;
mod error;
mod render;

use std::{io::BufRead, process::ExitCode};

use airdrop_utils::{
    airdrop::AirdropEstimate,
    alloy::StringExt,
    config::Config,
    disk_storage::DiskStorageInterface,
    shutdown::until_cancelled,
    BalanceQuery, BatchResult,
};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Cli, Commands},
    error::{BinError, Result},
};

#[derive(Serialize)]
struct CheckOutput<'a> {
    #[serde(flatten)]
    result: &'a BatchResult,
    estimate: &'a AirdropEstimate,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", style("error:").red());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Config { init: true } = cli.cmd {
        return init_config();
    }

    let mut config = Config::load()?;
    cli.overrides.apply(&mut config);

    let cancel = CancellationToken::new();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            watcher.cancel();
        }
    });

    match cli.cmd {
        Commands::Check { wallets, json } => check(&config, wallets, json, &cancel).await,
        Commands::Balance { wallet, json } => balance(&config, &wallet, json, &cancel).await,
        Commands::Config { .. } => show_config(&config),
    }
}

async fn check(
    config: &Config,
    wallets: Vec<String>,
    json: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let wallets = expand_stdin(wallets)?;
    if wallets.iter().all(|w| w.trim().is_empty()) {
        return Err(BinError::NoWallets);
    }

    let price = config.price_per_token()?;
    let ratio = config.airdrop_ratio()?;
    let runner = bootstrap::build_runner(config)?;

    let bar = if json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {msg}")
            .expect("invalid progress template")
            .progress_chars("=> "),
    );

    let result = runner
        .run_batch(
            &wallets,
            config.token_address,
            config.block_number,
            |progress| {
                bar.set_length(u64::from(progress.total));
                bar.set_position(u64::from(progress.current - 1));
                bar.set_message(format!(
                    "Processing wallet {} of {}: {}",
                    progress.current, progress.total, progress.current_wallet
                ));
            },
            cancel,
        )
        .await;
    bar.finish_and_clear();
    let result = result?;

    let estimate = AirdropEstimate::from_total(&result.total_balance, &price, &ratio)?;

    if json {
        let output = CheckOutput {
            result: &result,
            estimate: &estimate,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for record in &result.wallets {
            println!("{}", render::wallet_card(record));
        }
        println!();
        println!(
            "{}",
            render::summary(&result, &estimate, &config.price_per_token)
        );
    }

    Ok(())
}

async fn balance(
    config: &Config,
    wallet: &str,
    json: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let query = BalanceQuery {
        token_address: config.token_address,
        wallet_address: wallet.parse_as_address()?,
        block_number: config.block_number,
    };
    let runner = bootstrap::build_runner(config)?;

    let record = until_cancelled(cancel, runner.resolver().resolve(&query)).await??;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", render::wallet_card(&record));
    }
    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    println!("{} {}", style("Config file:").bold(), Config::path()?.display());
    println!();
    print!("{}", config.to_redacted_toml()?);
    if config.moralis_api_key.is_some() {
        println!("# moralis_api_key is set (hidden)");
    }
    Ok(())
}

fn init_config() -> Result<()> {
    let path = Config::path()?;
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    let path = Config::default().save()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

/// Replaces a `-` argument with the wallets read from stdin, one per line.
fn expand_stdin(wallets: Vec<String>) -> Result<Vec<String>> {
    let mut expanded = Vec::with_capacity(wallets.len());
    for wallet in wallets {
        if wallet == "-" {
            for line in std::io::stdin().lock().lines() {
                expanded.push(line?);
            }
        } else {
            expanded.push(wallet);
        }
    }
    Ok(expanded)
}
