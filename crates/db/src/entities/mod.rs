//! `SeaORM` entity definitions.
//!
//! Each entity carries `From` conversions into the domain types from
//! `tesora-core`; the repositories never hand models to callers.

pub mod sea_orm_active_enums;
pub mod wallet_crypto_transactions;
pub mod wallet_transactions;
pub mod wallets;

#[cfg(test)]
#[path = "conversion_tests.rs"]
mod tests;
