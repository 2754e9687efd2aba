//! Core business logic for Tesora.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Multi-wallet balance ledger: wallets, transactions, the
//!   waterfall allocation engine, and the ledger service itself

pub mod ledger;
