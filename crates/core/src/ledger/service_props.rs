//! Property-based tests for the ledger operations.
//!
//! These run whole operations against the in-memory store and check the
//! money-conservation and bookkeeping guarantees that hold for any input:
//! balances never go negative, failed operations leave no trace, and every
//! crypto row carries exactly one detail row.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tesora_shared::types::OwnerRef;
use uuid::Uuid;

use super::error::LedgerError;
use super::memory::MemoryLedgerStore;
use super::request::PaymentRequest;
use super::service::LedgerService;
use super::store::{LedgerStore, LedgerTxn};
use super::types::{
    CryptoTransaction, Currency, CurrencyKind, NewWallet, TransactionStatus, TransactionType,
    WalletStatus, WalletType,
};

/// One wallet to seed before running operations.
#[derive(Debug, Clone)]
struct Seed {
    wallet_type: WalletType,
    currency: Currency,
    status: WalletStatus,
    balance: Decimal,
}

/// One operation to run.
#[derive(Debug, Clone)]
enum Op {
    Deposit { wallet_type: Option<WalletType>, amount: Decimal, approved: bool },
    Pay { wallet_type: Option<WalletType>, amount: Decimal },
    Transfer { from: WalletType, to: WalletType, amount: Decimal },
}

fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn balance_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn wallet_type_strategy() -> impl Strategy<Value = WalletType> {
    prop_oneof![
        Just(WalletType::Cash),
        Just(WalletType::Trading),
        Just(WalletType::SwingTrading),
        Just(WalletType::Risk),
        Just(WalletType::Commission),
    ]
}

fn status_strategy() -> impl Strategy<Value = WalletStatus> {
    prop_oneof![
        3 => Just(WalletStatus::Active),
        1 => Just(WalletStatus::Suspended),
        1 => Just(WalletStatus::Closed),
    ]
}

fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        3 => Just(Currency::Usd),
        1 => Just(Currency::Btc),
    ]
}

/// Strategy to generate seeds with distinct wallet types.
fn seeds_strategy() -> impl Strategy<Value = Vec<Seed>> {
    prop::sample::subsequence(
        vec![
            WalletType::Cash,
            WalletType::Trading,
            WalletType::SwingTrading,
            WalletType::Risk,
            WalletType::Commission,
        ],
        1..=5,
    )
    .prop_flat_map(|types| {
        let n = types.len();
        (
            Just(types),
            prop::collection::vec((currency_strategy(), status_strategy(), balance_amount()), n),
        )
    })
    .prop_map(|(types, attrs)| {
        types
            .into_iter()
            .zip(attrs)
            .map(|(wallet_type, (currency, status, balance))| Seed {
                wallet_type,
                currency,
                status,
                balance,
            })
            .collect()
    })
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (prop::option::of(wallet_type_strategy()), amount(), any::<bool>())
            .prop_map(|(wallet_type, amount, approved)| Op::Deposit { wallet_type, amount, approved }),
        (prop::option::of(wallet_type_strategy()), amount())
            .prop_map(|(wallet_type, amount)| Op::Pay { wallet_type, amount }),
        (wallet_type_strategy(), wallet_type_strategy(), amount())
            .prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
    ]
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
        .block_on(future)
}

async fn seeded(seeds: &[Seed]) -> (LedgerService<MemoryLedgerStore>, OwnerRef) {
    let store = MemoryLedgerStore::new();
    let owner = OwnerRef::user(Uuid::new_v4());
    let mut txn = store.begin().await.unwrap();
    for seed in seeds {
        txn.insert_wallet(NewWallet {
            owner: owner.clone(),
            wallet_type: seed.wallet_type,
            currency: seed.currency,
            currency_kind: seed.currency.kind(),
            status: seed.status,
            balance: seed.balance,
        })
        .await
        .unwrap();
    }
    txn.commit().await.unwrap();
    (LedgerService::new(store), owner)
}

fn seeded_total(seeds: &[Seed]) -> Decimal {
    seeds.iter().map(|s| s.balance).sum()
}

/// Crypto requests need an address; attaching one unconditionally keeps the
/// generated operations from tripping over `MissingCryptoAddress`.
fn with_crypto_fields(request: PaymentRequest) -> PaymentRequest {
    request.with_crypto_address("prop-addr").with_price_usd(Decimal::ONE)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A withdrawal succeeds exactly when the spendable balances cover it,
    /// and either way no wallet ever goes negative.
    #[test]
    fn prop_pay_succeeds_iff_funds_cover_it(seeds in seeds_strategy(), total in amount()) {
        let (ok, available_before, wallets_after, total_before, total_after) = run(async {
            let (service, owner) = seeded(&seeds).await;
            let available_before = service.available_balance(&owner).await.unwrap();
            let total_before = service.balance(&owner).await.unwrap();

            let request = with_crypto_fields(PaymentRequest::withdrawal(owner.clone(), "prop-wd", total));
            let ok = service.pay(request).await.is_ok();

            let wallets_after = service.wallets(&owner).await.unwrap();
            let total_after = service.balance(&owner).await.unwrap();
            (ok, available_before, wallets_after, total_before, total_after)
        });

        prop_assert_eq!(ok, available_before >= total);
        for wallet in &wallets_after {
            prop_assert!(wallet.balance >= Decimal::ZERO);
        }
        if ok {
            prop_assert_eq!(total_after, total_before - total);
        } else {
            prop_assert_eq!(total_after, total_before);
        }
    }

    /// An approved multi-wallet deposit credits exactly the placed amount;
    /// the receipt's leftover accounts for the rest.
    #[test]
    fn prop_deposit_credits_exactly_what_was_placed(seeds in seeds_strategy(), amount in amount()) {
        let (receipt, total_before, total_after) = run(async {
            let (service, owner) = seeded(&seeds).await;
            let total_before = service.balance(&owner).await.unwrap();

            let request = with_crypto_fields(PaymentRequest::deposit(owner.clone(), "prop-dep", amount));
            let receipt = service.deposit(request).await.unwrap();

            let total_after = service.balance(&owner).await.unwrap();
            (receipt, total_before, total_after)
        });

        prop_assert_eq!(total_after - total_before, amount - receipt.unallocated);
        let row_sum: Decimal = receipt.transactions.iter().map(|t| t.amount).sum();
        prop_assert_eq!(row_sum + receipt.unallocated, amount);
        for row in &receipt.transactions {
            prop_assert!(row.amount > Decimal::ZERO);
            prop_assert_eq!(row.transaction_type, TransactionType::Deposit);
        }
    }

    /// A transfer either conserves the owner's total or, out of a sink
    /// type, reduces it by exactly the moved total.
    #[test]
    fn prop_transfer_conserves_or_absorbs(
        pair in prop::sample::subsequence(
            vec![
                WalletType::Cash,
                WalletType::Trading,
                WalletType::SwingTrading,
                WalletType::Risk,
                WalletType::Commission,
            ],
            2,
        ),
        source_balance in balance_amount(),
        dest_balance in balance_amount(),
        total in amount(),
    ) {
        let (from, to) = (pair[0], pair[1]);
        let seeds = vec![
            Seed {
                wallet_type: from,
                currency: Currency::Usd,
                status: WalletStatus::Active,
                balance: source_balance,
            },
            Seed {
                wallet_type: to,
                currency: Currency::Usd,
                status: WalletStatus::Active,
                balance: dest_balance,
            },
        ];
        let sink = matches!(from, WalletType::SwingTrading | WalletType::Risk);

        let (ok, total_before, total_after) = run(async {
            let (service, owner) = seeded(&seeds).await;
            let total_before = service.balance(&owner).await.unwrap();

            let request = PaymentRequest::transfer(owner.clone(), "prop-tr", total, from, to);
            let ok = service.transfer(request).await.is_ok();

            let total_after = service.balance(&owner).await.unwrap();
            (ok, total_before, total_after)
        });

        prop_assert_eq!(ok, source_balance >= total);
        if !ok {
            prop_assert_eq!(total_after, total_before);
        } else if sink {
            prop_assert_eq!(total_after, total_before - total);
        } else {
            prop_assert_eq!(total_after, total_before);
        }
    }

    /// Replaying a reference never applies twice: the second run is
    /// rejected and changes nothing.
    #[test]
    fn prop_replay_never_double_applies(seeds in seeds_strategy(), amount in amount()) {
        prop_assume!(seeds.iter().any(|s| s.status == WalletStatus::Active));

        let (first_ok, second_err, total_between, total_after, rows_between, rows_after) = run(async {
            let (service, owner) = seeded(&seeds).await;

            let request = with_crypto_fields(PaymentRequest::deposit(owner.clone(), "prop-replay", amount));
            let first_ok = service.deposit(request.clone()).await.is_ok();
            let total_between = service.balance(&owner).await.unwrap();
            let rows_between = service.transactions(&owner).await.unwrap().len();

            let second_err = service.deposit(request).await.err();
            let total_after = service.balance(&owner).await.unwrap();
            let rows_after = service.transactions(&owner).await.unwrap().len();

            (first_ok, second_err, total_between, total_after, rows_between, rows_after)
        });

        // Multi-wallet deposits always write at least one row here because
        // an active wallet exists and no caps are configured.
        prop_assert!(first_ok);
        prop_assert!(matches!(second_err, Some(LedgerError::DuplicateTransaction(_))));
        prop_assert_eq!(total_after, total_between);
        prop_assert_eq!(rows_after, rows_between);
    }

    /// After any sequence of operations: no negative balances, the owner's
    /// total matches the successful operations' net effect, and every
    /// non-transfer crypto row carries exactly one detail row.
    #[test]
    fn prop_op_sequences_preserve_the_books(
        seeds in seeds_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..8),
    ) {
        let (expected, wallets, rows, details) = run(async {
            let (service, owner) = seeded(&seeds).await;
            let mut expected = seeded_total(&seeds);

            for (i, op) in ops.iter().enumerate() {
                let txid = format!("prop-seq-{i}");
                match op {
                    Op::Deposit { wallet_type, amount, approved } => {
                        let mut request =
                            with_crypto_fields(PaymentRequest::deposit(owner.clone(), txid, *amount));
                        if let Some(t) = wallet_type {
                            request = request.with_wallet_type(*t);
                        }
                        if !approved {
                            request = request.with_status(TransactionStatus::Pending);
                        }
                        if let Ok(receipt) = service.deposit(request).await {
                            if *approved {
                                expected += *amount - receipt.unallocated;
                            }
                        }
                    }
                    Op::Pay { wallet_type, amount } => {
                        let mut request =
                            with_crypto_fields(PaymentRequest::withdrawal(owner.clone(), txid, *amount));
                        if let Some(t) = wallet_type {
                            request = request.with_wallet_type(*t);
                        }
                        if service.pay(request).await.is_ok() {
                            expected -= *amount;
                        }
                    }
                    Op::Transfer { from, to, amount } => {
                        let request =
                            PaymentRequest::transfer(owner.clone(), txid, *amount, *from, *to);
                        if service.transfer(request).await.is_ok()
                            && matches!(from, WalletType::SwingTrading | WalletType::Risk)
                        {
                            expected -= *amount;
                        }
                    }
                }
            }

            let wallets = service.wallets(&owner).await.unwrap();
            let rows = service.transactions(&owner).await.unwrap();
            let mut details = Vec::new();
            for row in &rows {
                for detail in service.crypto_transactions(&row.txid).await.unwrap() {
                    if !details.iter().any(|d: &CryptoTransaction| d.id == detail.id) {
                        details.push(detail);
                    }
                }
            }
            (expected, wallets, rows, details)
        });

        let held: Decimal = wallets.iter().map(|w| w.balance).sum();
        prop_assert_eq!(held, expected);
        for wallet in &wallets {
            prop_assert!(wallet.balance >= Decimal::ZERO);
        }
        for row in &rows {
            let detail_count = details.iter().filter(|d| d.transaction_id == row.id).count();
            if row.currency_kind == CurrencyKind::Crypto
                && row.transaction_type != TransactionType::Transfer
            {
                prop_assert_eq!(detail_count, 1, "crypto row without its detail row");
            } else {
                prop_assert_eq!(detail_count, 0, "detail row on a non-crypto or transfer row");
            }
        }
        for detail in &details {
            prop_assert!(rows.iter().any(|r| r.id == detail.transaction_id));
        }
    }
}
