//! Shared types and configuration for Tesora.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - The opaque owner reference wallets and transactions hang off
//! - The caller-supplied transaction reference (`TxId`)
//! - Configuration management

pub mod config;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, LedgerConfig};
pub use types::{OwnerRef, TransactionId, TxId, WalletId};
