//! Ledger error types.
//!
//! This module defines all errors that can occur during ledger operations:
//! payment request validation, wallet resolution, funds checks, duplicate
//! detection, and store faults. Granular variants roll up into a small set
//! of stable codes via [`LedgerError::error_code`].

use rust_decimal::Decimal;
use tesora_shared::types::{OwnerRef, TxId};
use thiserror::Error;

use super::types::{WalletStatus, WalletType};

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Request Validation Errors ==========
    /// Payment request has an empty transaction reference.
    #[error("Payment request must carry a transaction reference")]
    EmptyTxid,

    /// Amount must be positive.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Total must be positive.
    #[error("Total must be positive, got {0}")]
    NonPositiveTotal(Decimal),

    /// Crypto-denominated request without a destination address.
    #[error("Crypto payment requires a destination address")]
    MissingCryptoAddress,

    /// Operation requires a wallet type the request did not carry.
    #[error("Operation requires a wallet type")]
    MissingWalletType,

    /// Transfer whose source and destination are the same wallet.
    #[error("Transfer source and destination wallet types must differ")]
    SelfTransfer,

    // ========== Wallet Errors ==========
    /// Wallet type string is not a recognized member.
    #[error("Unknown wallet type: {0}")]
    UnknownWalletType(String),

    /// No wallet row exists for (owner, wallet type).
    #[error("Owner {owner} has no {wallet_type} wallet")]
    WalletNotFound {
        /// Owner looked up.
        owner: OwnerRef,
        /// Wallet type looked up.
        wallet_type: WalletType,
    },

    /// Wallet exists but its status forbids debits.
    #[error("{wallet_type} wallet is {status}, debits are not allowed")]
    WalletInactive {
        /// Wallet type.
        wallet_type: WalletType,
        /// Its current status.
        status: WalletStatus,
    },

    /// A wallet of this type is already open for the owner.
    #[error("Owner {owner} already has a {wallet_type} wallet")]
    WalletAlreadyExists {
        /// Owner.
        owner: OwnerRef,
        /// Wallet type.
        wallet_type: WalletType,
    },

    // ========== Funds Errors ==========
    /// Requested total exceeds available funds.
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Total the operation needed.
        requested: Decimal,
        /// Funds actually available.
        available: Decimal,
    },

    // ========== Transaction Log Errors ==========
    /// The transaction reference has already been used.
    #[error("Transaction {0} already exists")]
    DuplicateTransaction(TxId),

    // ========== Concurrency Errors ==========
    /// Concurrent modification detected.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    // ========== Store Errors ==========
    /// Store-level failure, reported as text to keep this crate db-free.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the stable error code callers can match on.
    ///
    /// Granular variants collapse into the coarse taxonomy: everything that
    /// means "that wallet cannot be addressed" is `INVALID_WALLET`, every
    /// malformed-request case is `VALIDATION_ERROR`.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyTxid
            | Self::NonPositiveAmount(_)
            | Self::NonPositiveTotal(_)
            | Self::MissingCryptoAddress
            | Self::MissingWalletType
            | Self::SelfTransfer => "VALIDATION_ERROR",

            Self::UnknownWalletType(_) | Self::WalletNotFound { .. } => "INVALID_WALLET",

            Self::WalletInactive { .. } => "WALLET_INACTIVE",
            Self::WalletAlreadyExists { .. } => "WALLET_EXISTS",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::DuplicateTransaction(_) => "DUPLICATE_TRANSACTION",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }
}
