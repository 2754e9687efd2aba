//! Property-based tests for the allocation waterfall.

use std::collections::HashMap;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tesora_shared::types::{OwnerRef, WalletId};
use uuid::Uuid;

use super::allocation::{allocate, deposit_room, withdrawal_room};
use super::balance::has_sufficient_balance;
use super::types::{Currency, CurrencyKind, Wallet, WalletStatus, WalletType};

/// Strategy to generate a positive target amount (0.01 to 10,000.00).
fn target_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a non-negative balance (0.00 to 10,000.00).
fn balance_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a wallet status, weighted towards active.
fn status_strategy() -> impl Strategy<Value = WalletStatus> {
    prop_oneof![
        3 => Just(WalletStatus::Active),
        1 => Just(WalletStatus::Suspended),
        1 => Just(WalletStatus::Closed),
    ]
}

/// Helper to create a wallet for allocation runs.
fn make_wallet(wallet_type: WalletType, status: WalletStatus, balance: Decimal) -> Wallet {
    Wallet {
        id: WalletId::new(),
        owner: OwnerRef::user(Uuid::new_v4()),
        wallet_type,
        currency: Currency::Usd,
        currency_kind: CurrencyKind::Fiat,
        status,
        balance,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Strategy to generate a wallet set with distinct types, plus an optional
/// cap per wallet (aligned by index).
fn wallet_set() -> impl Strategy<Value = (Vec<Wallet>, Vec<Option<Decimal>>)> {
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
            prop::collection::vec((status_strategy(), balance_amount()), n),
            prop::collection::vec(prop::option::of(balance_amount()), n),
        )
    })
    .prop_map(|(types, attrs, caps)| {
        let wallets = types
            .into_iter()
            .zip(attrs)
            .map(|(t, (status, balance))| make_wallet(t, status, balance))
            .collect();
        (wallets, caps)
    })
}

/// Deposit capacity lookup built from the generated per-wallet caps.
fn cap_table(wallets: &[Wallet], caps: &[Option<Decimal>]) -> HashMap<WalletType, Decimal> {
    wallets
        .iter()
        .zip(caps)
        .filter_map(|(w, cap)| cap.map(|c| (w.wallet_type, c)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every plan accounts for the full target: shares plus leftover equal
    /// the amount asked for, nothing more and nothing less.
    #[test]
    fn prop_plan_accounts_for_target((wallets, caps) in wallet_set(), target in target_amount()) {
        let table = cap_table(&wallets, &caps);
        let plan = allocate(
            target,
            &wallets,
            |w| deposit_room(table.get(&w.wallet_type).copied(), w.balance),
            Wallet::is_active,
        );
        prop_assert_eq!(plan.total_allocated() + plan.remaining, target);
    }

    /// Every share is positive and fits inside the wallet's remaining room.
    #[test]
    fn prop_shares_fit_capacity((wallets, caps) in wallet_set(), target in target_amount()) {
        let table = cap_table(&wallets, &caps);
        let plan = allocate(
            target,
            &wallets,
            |w| deposit_room(table.get(&w.wallet_type).copied(), w.balance),
            Wallet::is_active,
        );
        for allocation in &plan.allocations {
            prop_assert!(allocation.amount > Decimal::ZERO);
            if let Some(cap) = table.get(&allocation.wallet.wallet_type) {
                prop_assert!(allocation.wallet.balance + allocation.amount <= *cap);
            }
        }
    }

    /// Ineligible wallets never receive a share.
    #[test]
    fn prop_only_eligible_wallets_drawn((wallets, caps) in wallet_set(), target in target_amount()) {
        let table = cap_table(&wallets, &caps);
        let plan = allocate(
            target,
            &wallets,
            |w| deposit_room(table.get(&w.wallet_type).copied(), w.balance),
            Wallet::is_active,
        );
        for allocation in &plan.allocations {
            prop_assert!(allocation.wallet.is_active());
        }
    }

    /// Shares come out in the order the wallets went in; the waterfall
    /// never re-sorts.
    #[test]
    fn prop_allocation_preserves_input_order((wallets, caps) in wallet_set(), target in target_amount()) {
        let table = cap_table(&wallets, &caps);
        let plan = allocate(
            target,
            &wallets,
            |w| deposit_room(table.get(&w.wallet_type).copied(), w.balance),
            Wallet::is_active,
        );
        let input_order: Vec<WalletType> = wallets.iter().map(|w| w.wallet_type).collect();
        let mut cursor = 0;
        for allocation in &plan.allocations {
            let pos = input_order[cursor..]
                .iter()
                .position(|t| *t == allocation.wallet.wallet_type);
            prop_assert!(pos.is_some(), "share for a wallet out of input order");
            cursor += pos.unwrap() + 1;
        }
    }

    /// An uncapped active wallet ends the waterfall: nothing is left over.
    #[test]
    fn prop_uncapped_active_wallet_absorbs_rest(
        (mut wallets, mut caps) in wallet_set(),
        target in target_amount(),
    ) {
        if let Some(last) = wallets.last_mut() {
            last.status = WalletStatus::Active;
        }
        if let Some(last) = caps.last_mut() {
            *last = None;
        }
        let table = cap_table(&wallets, &caps);
        let plan = allocate(
            target,
            &wallets,
            |w| deposit_room(table.get(&w.wallet_type).copied(), w.balance),
            Wallet::is_active,
        );
        prop_assert!(plan.is_fully_allocated());
    }

    /// The aggregate sufficiency check and the withdrawal waterfall agree:
    /// the plan places the full target exactly when the spendable balances
    /// cover it.
    #[test]
    fn prop_sufficiency_check_matches_withdrawal_plan(
        (wallets, _) in wallet_set(),
        target in target_amount(),
    ) {
        let plan = allocate(target, &wallets, withdrawal_room, Wallet::is_spendable);
        prop_assert_eq!(
            has_sufficient_balance(&wallets, target),
            plan.is_fully_allocated()
        );
    }

    /// A withdrawal plan never draws more from a wallet than it holds.
    #[test]
    fn prop_withdrawal_never_overdraws_a_wallet(
        (wallets, _) in wallet_set(),
        target in target_amount(),
    ) {
        let plan = allocate(target, &wallets, withdrawal_room, Wallet::is_spendable);
        for allocation in &plan.allocations {
            prop_assert!(allocation.amount <= allocation.wallet.balance);
        }
    }
}
