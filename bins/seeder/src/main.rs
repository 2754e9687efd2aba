//! Ledger seeder for Tesora development and testing.
//!
//! Opens a demo owner's wallet set and records a handful of payments so a
//! fresh database has something to look at. Extra wallets can be requested
//! on the command line as `type:currency` pairs:
//!
//!   cargo run --bin seeder -- commission:USD trading:BTC
//!
//! Re-running is safe; wallets and payments that already exist are skipped.

use std::sync::Arc;

use rust_decimal_macros::dec;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use tesora_core::ledger::{
    Currency, LedgerError, LedgerService, PaymentRequest, StandardPolicy, WalletType,
};
use tesora_db::LedgerRepository;
use tesora_shared::config::AppConfig;
use tesora_shared::types::OwnerRef;

/// Demo owner ID (consistent for all seeds)
const DEMO_OWNER_ID: &str = "00000000-0000-0000-0000-000000000001";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing so the ledger's own logs show up
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tesora_core=debug,tesora_db=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().expect("Failed to load configuration");

    let mut extra_wallets = Vec::new();
    for arg in std::env::args().skip(1) {
        match parse_wallet_arg(&arg) {
            Ok(pair) => extra_wallets.push(pair),
            Err(e) => {
                eprintln!("Bad argument {arg:?}: {e}");
                std::process::exit(2);
            }
        }
    }

    println!("Connecting to database...");
    let db = tesora_db::connect(&config.database)
        .await
        .expect("Failed to connect to database");

    let policy = StandardPolicy::from_config(&config.ledger);
    let service = LedgerService::with_policy(LedgerRepository::new(db), Arc::new(policy));
    let owner = demo_owner();

    println!("Seeding demo wallets...");
    seed_wallets(&service, &owner, &extra_wallets).await;

    println!("Seeding demo activity...");
    seed_activity(&service, &owner).await;

    println!("Seeding complete!");
}

fn demo_owner() -> OwnerRef {
    OwnerRef::user(Uuid::parse_str(DEMO_OWNER_ID).unwrap())
}

/// Parses one `type:currency` argument, e.g. `trading:BTC`.
fn parse_wallet_arg(arg: &str) -> Result<(WalletType, Currency), String> {
    let (type_part, currency_part) = arg
        .split_once(':')
        .ok_or_else(|| format!("Expected type:currency, got {arg:?}"))?;

    let wallet_type = match type_part.parse::<WalletType>() {
        Ok(wallet_type) => wallet_type,
        Err(_) => {
            let err = LedgerError::UnknownWalletType(type_part.to_string());
            return Err(format!("{err} [{}]", err.error_code()));
        }
    };
    let currency = currency_part.parse::<Currency>()?;

    Ok((wallet_type, currency))
}

/// Opens the default wallet set plus any requested extras.
async fn seed_wallets(
    service: &LedgerService<LedgerRepository>,
    owner: &OwnerRef,
    extra: &[(WalletType, Currency)],
) {
    let defaults = [
        (WalletType::Cash, Currency::Usd),
        (WalletType::Trading, Currency::Usd),
        (WalletType::SwingTrading, Currency::Usd),
        (WalletType::Risk, Currency::Usd),
    ];

    for (wallet_type, currency) in defaults.iter().chain(extra) {
        match service
            .open_wallet(owner.clone(), *wallet_type, *currency)
            .await
        {
            Ok(wallet) => {
                println!("  Opened {} wallet ({})", wallet.wallet_type, wallet.currency);
            }
            Err(LedgerError::WalletAlreadyExists { .. }) => {
                println!("  {wallet_type} wallet already exists, skipping...");
            }
            Err(e) => eprintln!("  Failed to open {wallet_type} wallet: {e}"),
        }
    }
}

/// Records a small, recognizable set of ledger activity.
async fn seed_activity(service: &LedgerService<LedgerRepository>, owner: &OwnerRef) {
    let deposit = PaymentRequest::deposit(owner.clone(), "seed-deposit-0001", dec!(2500))
        .with_description("Seed deposit");
    match service.deposit(deposit).await {
        Ok(receipt) => {
            println!(
                "  Deposited 2500.00 across {} wallet(s)",
                receipt.transactions.len()
            );
            if !receipt.is_fully_allocated() {
                println!("  ({} found no room)", receipt.unallocated);
            }
        }
        Err(LedgerError::DuplicateTransaction(_)) => {
            println!("  Demo activity already recorded, skipping...");
            return;
        }
        Err(e) => {
            eprintln!("  Failed to record seed deposit: {e}");
            return;
        }
    }

    let payment = PaymentRequest::withdrawal(owner.clone(), "seed-payment-0001", dec!(120))
        .with_wallet_type(WalletType::Cash)
        .with_platform_fee(dec!(1.50))
        .with_description("Seed card payment");
    match service.pay(payment).await {
        Ok(receipt) => println!("  Paid {} from the cash wallet", receipt.total_debited()),
        Err(e) => eprintln!("  Failed to record seed payment: {e}"),
    }

    let rebalance = PaymentRequest::transfer(
        owner.clone(),
        "seed-transfer-0001",
        dec!(300),
        WalletType::Cash,
        WalletType::Trading,
    )
    .with_description("Seed rebalance");
    match service.transfer(rebalance).await {
        Ok(_) => println!("  Moved 300.00 from cash to trading"),
        Err(e) => eprintln!("  Failed to record seed transfer: {e}"),
    }

    let reserve = PaymentRequest::transfer(
        owner.clone(),
        "seed-transfer-0002",
        dec!(150),
        WalletType::Trading,
        WalletType::Risk,
    )
    .with_description("Seed risk reserve");
    match service.transfer(reserve).await {
        Ok(_) => println!("  Reserved 150.00 into the risk wallet"),
        Err(e) => eprintln!("  Failed to record seed reserve: {e}"),
    }
}
