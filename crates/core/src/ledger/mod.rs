//! Multi-wallet balance ledger.
//!
//! This module implements the ledger engine:
//! - Wallet and transaction domain types
//! - Payment requests, the input to every operation
//! - The allocation waterfall for multi-wallet deposits and withdrawals
//! - Balance sums and sufficiency checks
//! - Pluggable capacity and sink policies
//! - The store contract (unit of work) and an in-memory implementation
//! - The operations themselves: deposit, pay, subtract, transfer, queries
//! - Error types for ledger operations

pub mod allocation;
pub mod balance;
pub mod error;
pub mod memory;
pub mod policy;
pub mod request;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod allocation_props;
#[cfg(test)]
mod service_props;

pub use allocation::{allocate, deposit_room, withdrawal_room, Allocation, AllocationPlan};
pub use balance::{
    available_balance, balance_of_type, has_sufficient_balance, has_sufficient_balance_by_type,
    total_balance,
};
pub use error::LedgerError;
pub use memory::MemoryLedgerStore;
pub use policy::{LedgerPolicy, StandardPolicy};
pub use request::PaymentRequest;
pub use service::LedgerService;
pub use store::{LedgerStore, LedgerTxn};
pub use types::{
    CryptoTransaction, Currency, CurrencyKind, DepositReceipt, NewCryptoTransaction,
    NewTransaction, NewWallet, PaymentReceipt, Transaction, TransactionMethod, TransactionStatus,
    TransactionType, TransferReceipt, Wallet, WalletStatus, WalletType,
};
