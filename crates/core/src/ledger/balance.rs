//! Balance sums and sufficiency checks.
//!
//! The withdrawal pre-checks live here as pure functions over a wallet
//! slice, so the service and both stores share one definition of "enough".

use rust_decimal::Decimal;

use super::types::{Wallet, WalletType};

/// Sum of every wallet's balance, regardless of status.
#[must_use]
pub fn total_balance(wallets: &[Wallet]) -> Decimal {
    wallets.iter().map(|w| w.balance).sum()
}

/// Sum of the balances a withdrawal could actually draw on: active wallets
/// holding funds. Suspended and closed wallets are excluded, matching what
/// the waterfall will draw on.
#[must_use]
pub fn available_balance(wallets: &[Wallet]) -> Decimal {
    wallets.iter().filter(|w| w.is_spendable()).map(|w| w.balance).sum()
}

/// Balance held in wallets of one type.
///
/// At most one wallet per type exists per owner, so this is that wallet's
/// balance, or zero when the owner has none of this type.
#[must_use]
pub fn balance_of_type(wallets: &[Wallet], wallet_type: WalletType) -> Decimal {
    wallets
        .iter()
        .filter(|w| w.wallet_type == wallet_type)
        .map(|w| w.balance)
        .sum()
}

/// Aggregate sufficiency: can the owner's spendable wallets cover `total`?
#[must_use]
pub fn has_sufficient_balance(wallets: &[Wallet], total: Decimal) -> bool {
    available_balance(wallets) >= total
}

/// Type-scoped sufficiency: does the wallet of this type cover `total`?
#[must_use]
pub fn has_sufficient_balance_by_type(
    wallets: &[Wallet],
    wallet_type: WalletType,
    total: Decimal,
) -> bool {
    balance_of_type(wallets, wallet_type) >= total
}
