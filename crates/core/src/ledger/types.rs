//! Ledger domain types.
//!
//! Every enum here is closed: callers can test membership with `is_valid`
//! and enumerate members with `values`, and the wire form used by serde,
//! `Display`, and `FromStr` is the same string.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tesora_shared::types::{OwnerRef, TransactionId, TxId, WalletId};
use uuid::Uuid;

/// Generates the closed-enum surface: `values`, `is_valid`, `Display`,
/// and a case-insensitive `FromStr` that agrees with the serde wire form.
macro_rules! closed_enum {
    ($ty:ident, $label:literal, { $($variant:path => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// All members in declaration order.
            #[must_use]
            pub const fn values() -> &'static [$ty] {
                &[$($variant),+]
            }

            /// Returns true when `s` is the wire form of a member.
            #[must_use]
            pub fn is_valid(s: &str) -> bool {
                s.parse::<$ty>().is_ok()
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let s = match self {
                    $($variant => $wire),+
                };
                write!(f, "{s}")
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($wire) {
                        return Ok($variant);
                    }
                )+
                Err(format!(concat!("Unknown ", $label, ": {}"), s))
            }
        }
    };
}

/// Wallet type: which bucket of the owner's money a wallet holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletType {
    /// Spendable cash balance.
    Cash,
    /// Funds committed to trading.
    Trading,
    /// Funds locked into swing-trading positions.
    SwingTrading,
    /// Risk reserve.
    Risk,
    /// Earned commissions.
    Commission,
}

closed_enum!(WalletType, "wallet type", {
    WalletType::Cash => "cash",
    WalletType::Trading => "trading",
    WalletType::SwingTrading => "swing_trading",
    WalletType::Risk => "risk",
    WalletType::Commission => "commission",
});

/// Wallet lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletStatus {
    /// Open for deposits and debits.
    Active,
    /// Temporarily frozen; debits are refused.
    Suspended,
    /// Permanently closed. Wallets are never deleted, only closed.
    Closed,
}

closed_enum!(WalletStatus, "wallet status", {
    WalletStatus::Active => "active",
    WalletStatus::Suspended => "suspended",
    WalletStatus::Closed => "closed",
});

impl WalletStatus {
    /// Returns true when the status permits debits.
    #[must_use]
    pub fn allows_debit(self) -> bool {
        self == Self::Active
    }
}

/// Currencies the ledger records (never converts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// British Pound
    Gbp,
    /// Bitcoin
    Btc,
    /// Ether
    Eth,
    /// Tether
    Usdt,
}

closed_enum!(Currency, "currency", {
    Currency::Usd => "USD",
    Currency::Eur => "EUR",
    Currency::Gbp => "GBP",
    Currency::Btc => "BTC",
    Currency::Eth => "ETH",
    Currency::Usdt => "USDT",
});

impl Currency {
    /// The kind (fiat or crypto) this currency belongs to.
    #[must_use]
    pub fn kind(self) -> CurrencyKind {
        match self {
            Self::Usd | Self::Eur | Self::Gbp => CurrencyKind::Fiat,
            Self::Btc | Self::Eth | Self::Usdt => CurrencyKind::Crypto,
        }
    }
}

/// Fiat vs. crypto denomination. Crypto transactions carry an extra detail row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyKind {
    /// Government-issued currency.
    Fiat,
    /// Cryptocurrency.
    Crypto,
}

closed_enum!(CurrencyKind, "currency kind", {
    CurrencyKind::Fiat => "fiat",
    CurrencyKind::Crypto => "crypto",
});

/// What kind of ledger effect a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Incoming funds.
    Deposit,
    /// Outgoing funds.
    Withdraw,
    /// Move between two wallets of the same owner.
    Transfer,
    /// Administrative correction.
    Adjustment,
}

closed_enum!(TransactionType, "transaction type", {
    TransactionType::Deposit => "deposit",
    TransactionType::Withdraw => "withdraw",
    TransactionType::Transfer => "transfer",
    TransactionType::Adjustment => "adjustment",
});

/// How the payment was carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionMethod {
    /// Entered by an operator.
    Manual,
    /// External payment gateway.
    Gateway,
    /// Bank transfer.
    BankTransfer,
    /// Internal ledger movement.
    Internal,
    /// On-chain crypto payment.
    Crypto,
}

closed_enum!(TransactionMethod, "transaction method", {
    TransactionMethod::Manual => "manual",
    TransactionMethod::Gateway => "gateway",
    TransactionMethod::BankTransfer => "bank_transfer",
    TransactionMethod::Internal => "internal",
    TransactionMethod::Crypto => "crypto",
});

/// Approval state of a transaction.
///
/// Deposits credit the balance only when approved; pending and declined
/// deposit rows are recorded without touching the wallet. Debits always
/// move funds, the status is bookkeeping there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Effect applied to the wallet balance.
    Approved,
    /// Awaiting approval; recorded but not applied.
    Pending,
    /// Refused; recorded but not applied.
    Declined,
}

closed_enum!(TransactionStatus, "transaction status", {
    TransactionStatus::Approved => "approved",
    TransactionStatus::Pending => "pending",
    TransactionStatus::Declined => "declined",
});

impl TransactionStatus {
    /// Returns true when the status applies the effect to the balance.
    #[must_use]
    pub fn is_approved(self) -> bool {
        self == Self::Approved
    }
}

/// A typed balance bucket owned by an entity.
///
/// At most one wallet exists per (owner, wallet type) pair. Balances only
/// change inside a ledger operation's unit of work and never go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Row identifier.
    pub id: WalletId,
    /// Owning entity.
    pub owner: OwnerRef,
    /// Which bucket this is. Immutable after creation.
    pub wallet_type: WalletType,
    /// Denomination. Immutable after creation.
    pub currency: Currency,
    /// Fiat or crypto.
    pub currency_kind: CurrencyKind,
    /// Lifecycle status.
    pub status: WalletStatus,
    /// Current balance.
    pub balance: Decimal,
    /// When the wallet was opened.
    pub created_at: DateTime<Utc>,
    /// Last balance change.
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Returns true when the wallet is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == WalletStatus::Active
    }

    /// Returns true when the wallet holds any funds.
    #[must_use]
    pub fn has_balance(&self) -> bool {
        self.balance > Decimal::ZERO
    }

    /// Returns true when the wallet may take part in a withdrawal:
    /// active and holding funds.
    #[must_use]
    pub fn is_spendable(&self) -> bool {
        self.is_active() && self.has_balance()
    }
}

/// Input for opening a wallet.
#[derive(Debug, Clone)]
pub struct NewWallet {
    /// Owning entity.
    pub owner: OwnerRef,
    /// Bucket type.
    pub wallet_type: WalletType,
    /// Denomination.
    pub currency: Currency,
    /// Fiat or crypto.
    pub currency_kind: CurrencyKind,
    /// Lifecycle status.
    pub status: WalletStatus,
    /// Opening balance.
    pub balance: Decimal,
}

/// Immutable record of one balance-affecting event.
///
/// Corrections are modeled as new rows; a written transaction is never
/// updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Row identifier.
    pub id: TransactionId,
    /// Owner whose wallet was touched.
    pub owner: OwnerRef,
    /// Counterparty owner for transfers, absent otherwise.
    pub owner_from: Option<OwnerRef>,
    /// Caller-supplied reference; one payment request per `TxId`.
    pub txid: TxId,
    /// Net amount moved by this row.
    pub amount: Decimal,
    /// Fee charged on top of the amount.
    pub platform_fee: Decimal,
    /// Amount plus fee by convention; callers may override.
    pub total: Decimal,
    /// Caller-facing description.
    pub description: Option<String>,
    /// Internal note.
    pub remark: Option<String>,
    /// Hidden rows are kept out of owner-facing listings.
    pub is_hidden: bool,
    /// Wallet the row touched (destination for transfers).
    pub wallet_type: WalletType,
    /// Source wallet for transfers, absent otherwise.
    pub from_wallet_type: Option<WalletType>,
    /// Denomination, copied from the wallet, not the request.
    pub currency: Currency,
    /// Fiat or crypto, copied from the wallet.
    pub currency_kind: CurrencyKind,
    /// Kind of effect.
    pub transaction_type: TransactionType,
    /// How the payment was carried.
    pub transaction_method: TransactionMethod,
    /// Approval state.
    pub status: TransactionStatus,
    /// Optional link to the profit distribution that produced this row.
    pub profit_id: Option<Uuid>,
    /// Reference of the transaction this row reverses, if any.
    pub recall_txid: Option<TxId>,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns true when this row is crypto-denominated and therefore
    /// carries a [`CryptoTransaction`] detail row.
    #[must_use]
    pub fn is_crypto(&self) -> bool {
        self.currency_kind == CurrencyKind::Crypto
    }
}

/// Input for appending a transaction row. The store stamps id and timestamp.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Owner whose wallet was touched.
    pub owner: OwnerRef,
    /// Counterparty owner for transfers.
    pub owner_from: Option<OwnerRef>,
    /// Caller-supplied reference.
    pub txid: TxId,
    /// Net amount moved.
    pub amount: Decimal,
    /// Fee charged on top.
    pub platform_fee: Decimal,
    /// Amount plus fee.
    pub total: Decimal,
    /// Caller-facing description.
    pub description: Option<String>,
    /// Internal note.
    pub remark: Option<String>,
    /// Keep out of owner-facing listings.
    pub is_hidden: bool,
    /// Wallet the row touched.
    pub wallet_type: WalletType,
    /// Source wallet for transfers.
    pub from_wallet_type: Option<WalletType>,
    /// Denomination.
    pub currency: Currency,
    /// Fiat or crypto.
    pub currency_kind: CurrencyKind,
    /// Kind of effect.
    pub transaction_type: TransactionType,
    /// How the payment was carried.
    pub transaction_method: TransactionMethod,
    /// Approval state.
    pub status: TransactionStatus,
    /// Optional profit distribution link.
    pub profit_id: Option<Uuid>,
    /// Reversed transaction reference.
    pub recall_txid: Option<TxId>,
}

/// Crypto detail row, one-to-one with a crypto-denominated [`Transaction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoTransaction {
    /// Row identifier.
    pub id: Uuid,
    /// Parent transaction row.
    pub transaction_id: TransactionId,
    /// Mirrors the parent's reference.
    pub txid: TxId,
    /// Destination address.
    pub address: String,
    /// Source address, when known.
    pub address_from: Option<String>,
    /// USD price of the currency at transaction time.
    pub price_usd: Decimal,
    /// Crypto currency recorded.
    pub currency: Currency,
    /// Deposit or withdraw, set by the operation independently of the parent.
    pub transaction_type: TransactionType,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}

/// Input for appending a crypto detail row.
#[derive(Debug, Clone)]
pub struct NewCryptoTransaction {
    /// Parent transaction row.
    pub transaction_id: TransactionId,
    /// Mirrors the parent's reference.
    pub txid: TxId,
    /// Destination address.
    pub address: String,
    /// Source address, when known.
    pub address_from: Option<String>,
    /// USD price at transaction time.
    pub price_usd: Decimal,
    /// Crypto currency recorded.
    pub currency: Currency,
    /// Deposit or withdraw.
    pub transaction_type: TransactionType,
}

/// Result of a deposit.
///
/// A deposit that could not place the full amount is not an error; the
/// leftover is reported here instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositReceipt {
    /// Rows written, one per wallet credited.
    pub transactions: Vec<Transaction>,
    /// Amount no wallet had room for.
    pub unallocated: Decimal,
}

impl DepositReceipt {
    /// Returns true when the full requested amount found a home.
    #[must_use]
    pub fn is_fully_allocated(&self) -> bool {
        self.unallocated.is_zero()
    }
}

/// Result of a pay/withdraw or adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Rows written, one per wallet debited.
    pub transactions: Vec<Transaction>,
}

impl PaymentReceipt {
    /// Sum of the per-wallet amounts debited.
    #[must_use]
    pub fn total_debited(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount).sum()
    }
}

/// Result of an internal transfer: exactly one row, carrying both sides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// The single transfer row.
    pub transaction: Transaction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[rstest]
    #[case("cash", WalletType::Cash)]
    #[case("trading", WalletType::Trading)]
    #[case("swing_trading", WalletType::SwingTrading)]
    #[case("risk", WalletType::Risk)]
    #[case("commission", WalletType::Commission)]
    fn test_wallet_type_wire_roundtrip(#[case] wire: &str, #[case] expected: WalletType) {
        assert_eq!(WalletType::from_str(wire).unwrap(), expected);
        assert_eq!(expected.to_string(), wire);
        assert!(WalletType::is_valid(wire));
    }

    #[test]
    fn test_wallet_type_rejects_unknown() {
        assert!(!WalletType::is_valid("savings"));
        assert!(!WalletType::is_valid(""));
        assert!(WalletType::from_str("savings").is_err());
    }

    #[test]
    fn test_values_enumerate_every_member() {
        assert_eq!(WalletType::values().len(), 5);
        assert_eq!(WalletStatus::values().len(), 3);
        assert_eq!(Currency::values().len(), 6);
        assert_eq!(CurrencyKind::values().len(), 2);
        assert_eq!(TransactionType::values().len(), 4);
        assert_eq!(TransactionMethod::values().len(), 5);
        assert_eq!(TransactionStatus::values().len(), 3);
        for wt in WalletType::values() {
            assert!(WalletType::is_valid(&wt.to_string()));
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(WalletType::from_str("CASH").unwrap(), WalletType::Cash);
        assert_eq!(Currency::from_str("usd").unwrap(), Currency::Usd);
        assert_eq!(
            TransactionStatus::from_str("Approved").unwrap(),
            TransactionStatus::Approved
        );
    }

    #[rstest]
    #[case(Currency::Usd, CurrencyKind::Fiat)]
    #[case(Currency::Eur, CurrencyKind::Fiat)]
    #[case(Currency::Gbp, CurrencyKind::Fiat)]
    #[case(Currency::Btc, CurrencyKind::Crypto)]
    #[case(Currency::Eth, CurrencyKind::Crypto)]
    #[case(Currency::Usdt, CurrencyKind::Crypto)]
    fn test_currency_kind(#[case] currency: Currency, #[case] kind: CurrencyKind) {
        assert_eq!(currency.kind(), kind);
    }

    #[test]
    fn test_serde_wire_form_matches_display() {
        let json = serde_json::to_string(&WalletType::SwingTrading).unwrap();
        assert_eq!(json, "\"swing_trading\"");
        let json = serde_json::to_string(&Currency::Btc).unwrap();
        assert_eq!(json, "\"BTC\"");
        let json = serde_json::to_string(&TransactionMethod::BankTransfer).unwrap();
        assert_eq!(json, "\"bank_transfer\"");
    }

    #[test]
    fn test_status_gates() {
        assert!(WalletStatus::Active.allows_debit());
        assert!(!WalletStatus::Suspended.allows_debit());
        assert!(!WalletStatus::Closed.allows_debit());
        assert!(TransactionStatus::Approved.is_approved());
        assert!(!TransactionStatus::Pending.is_approved());
        assert!(!TransactionStatus::Declined.is_approved());
    }

    #[test]
    fn test_wallet_spendability() {
        let mut wallet = Wallet {
            id: WalletId::new(),
            owner: OwnerRef::user(Uuid::new_v4()),
            wallet_type: WalletType::Cash,
            currency: Currency::Usd,
            currency_kind: CurrencyKind::Fiat,
            status: WalletStatus::Active,
            balance: dec!(10.00),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(wallet.is_spendable());

        wallet.balance = Decimal::ZERO;
        assert!(!wallet.is_spendable());

        wallet.balance = dec!(10.00);
        wallet.status = WalletStatus::Suspended;
        assert!(!wallet.is_spendable());
    }
}
