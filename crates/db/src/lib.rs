//! Database layer with `SeaORM` entities and the Postgres ledger store.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the wallet tables
//! - The [`LedgerRepository`] store backing `tesora-core`'s ledger service
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{LedgerRepository, TransactionFilter};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tesora_shared::config::DatabaseConfig;

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(&config.url);
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections);

    Database::connect(options).await
}
