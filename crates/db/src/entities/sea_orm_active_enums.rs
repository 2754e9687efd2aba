//! `SeaORM` active enums mirroring the Postgres enum types.
//!
//! The string values are the wire forms shared with `tesora-core`; the
//! `From` impls are the only place the two enum families meet.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tesora_core::ledger;

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "wallet_type")]
pub enum WalletType {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "trading")]
    Trading,
    #[sea_orm(string_value = "swing_trading")]
    SwingTrading,
    #[sea_orm(string_value = "risk")]
    Risk,
    #[sea_orm(string_value = "commission")]
    Commission,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "wallet_status")]
pub enum WalletStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "suspended")]
    Suspended,
    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "currency")]
pub enum Currency {
    #[sea_orm(string_value = "USD")]
    Usd,
    #[sea_orm(string_value = "EUR")]
    Eur,
    #[sea_orm(string_value = "GBP")]
    Gbp,
    #[sea_orm(string_value = "BTC")]
    Btc,
    #[sea_orm(string_value = "ETH")]
    Eth,
    #[sea_orm(string_value = "USDT")]
    Usdt,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "currency_kind")]
pub enum CurrencyKind {
    #[sea_orm(string_value = "fiat")]
    Fiat,
    #[sea_orm(string_value = "crypto")]
    Crypto,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
pub enum TransactionType {
    #[sea_orm(string_value = "deposit")]
    Deposit,
    #[sea_orm(string_value = "withdraw")]
    Withdraw,
    #[sea_orm(string_value = "transfer")]
    Transfer,
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_method")]
pub enum TransactionMethod {
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "gateway")]
    Gateway,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "internal")]
    Internal,
    #[sea_orm(string_value = "crypto")]
    Crypto,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "declined")]
    Declined,
}

impl From<ledger::WalletType> for WalletType {
    fn from(value: ledger::WalletType) -> Self {
        match value {
            ledger::WalletType::Cash => Self::Cash,
            ledger::WalletType::Trading => Self::Trading,
            ledger::WalletType::SwingTrading => Self::SwingTrading,
            ledger::WalletType::Risk => Self::Risk,
            ledger::WalletType::Commission => Self::Commission,
        }
    }
}

impl From<WalletType> for ledger::WalletType {
    fn from(value: WalletType) -> Self {
        match value {
            WalletType::Cash => Self::Cash,
            WalletType::Trading => Self::Trading,
            WalletType::SwingTrading => Self::SwingTrading,
            WalletType::Risk => Self::Risk,
            WalletType::Commission => Self::Commission,
        }
    }
}

impl From<ledger::WalletStatus> for WalletStatus {
    fn from(value: ledger::WalletStatus) -> Self {
        match value {
            ledger::WalletStatus::Active => Self::Active,
            ledger::WalletStatus::Suspended => Self::Suspended,
            ledger::WalletStatus::Closed => Self::Closed,
        }
    }
}

impl From<WalletStatus> for ledger::WalletStatus {
    fn from(value: WalletStatus) -> Self {
        match value {
            WalletStatus::Active => Self::Active,
            WalletStatus::Suspended => Self::Suspended,
            WalletStatus::Closed => Self::Closed,
        }
    }
}

impl From<ledger::Currency> for Currency {
    fn from(value: ledger::Currency) -> Self {
        match value {
            ledger::Currency::Usd => Self::Usd,
            ledger::Currency::Eur => Self::Eur,
            ledger::Currency::Gbp => Self::Gbp,
            ledger::Currency::Btc => Self::Btc,
            ledger::Currency::Eth => Self::Eth,
            ledger::Currency::Usdt => Self::Usdt,
        }
    }
}

impl From<Currency> for ledger::Currency {
    fn from(value: Currency) -> Self {
        match value {
            Currency::Usd => Self::Usd,
            Currency::Eur => Self::Eur,
            Currency::Gbp => Self::Gbp,
            Currency::Btc => Self::Btc,
            Currency::Eth => Self::Eth,
            Currency::Usdt => Self::Usdt,
        }
    }
}

impl From<ledger::CurrencyKind> for CurrencyKind {
    fn from(value: ledger::CurrencyKind) -> Self {
        match value {
            ledger::CurrencyKind::Fiat => Self::Fiat,
            ledger::CurrencyKind::Crypto => Self::Crypto,
        }
    }
}

impl From<CurrencyKind> for ledger::CurrencyKind {
    fn from(value: CurrencyKind) -> Self {
        match value {
            CurrencyKind::Fiat => Self::Fiat,
            CurrencyKind::Crypto => Self::Crypto,
        }
    }
}

impl From<ledger::TransactionType> for TransactionType {
    fn from(value: ledger::TransactionType) -> Self {
        match value {
            ledger::TransactionType::Deposit => Self::Deposit,
            ledger::TransactionType::Withdraw => Self::Withdraw,
            ledger::TransactionType::Transfer => Self::Transfer,
            ledger::TransactionType::Adjustment => Self::Adjustment,
        }
    }
}

impl From<TransactionType> for ledger::TransactionType {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Deposit => Self::Deposit,
            TransactionType::Withdraw => Self::Withdraw,
            TransactionType::Transfer => Self::Transfer,
            TransactionType::Adjustment => Self::Adjustment,
        }
    }
}

impl From<ledger::TransactionMethod> for TransactionMethod {
    fn from(value: ledger::TransactionMethod) -> Self {
        match value {
            ledger::TransactionMethod::Manual => Self::Manual,
            ledger::TransactionMethod::Gateway => Self::Gateway,
            ledger::TransactionMethod::BankTransfer => Self::BankTransfer,
            ledger::TransactionMethod::Internal => Self::Internal,
            ledger::TransactionMethod::Crypto => Self::Crypto,
        }
    }
}

impl From<TransactionMethod> for ledger::TransactionMethod {
    fn from(value: TransactionMethod) -> Self {
        match value {
            TransactionMethod::Manual => Self::Manual,
            TransactionMethod::Gateway => Self::Gateway,
            TransactionMethod::BankTransfer => Self::BankTransfer,
            TransactionMethod::Internal => Self::Internal,
            TransactionMethod::Crypto => Self::Crypto,
        }
    }
}

impl From<ledger::TransactionStatus> for TransactionStatus {
    fn from(value: ledger::TransactionStatus) -> Self {
        match value {
            ledger::TransactionStatus::Pending => Self::Pending,
            ledger::TransactionStatus::Approved => Self::Approved,
            ledger::TransactionStatus::Declined => Self::Declined,
        }
    }
}

impl From<TransactionStatus> for ledger::TransactionStatus {
    fn from(value: TransactionStatus) -> Self {
        match value {
            TransactionStatus::Pending => Self::Pending,
            TransactionStatus::Approved => Self::Approved,
            TransactionStatus::Declined => Self::Declined,
        }
    }
}
