//! Store contracts: the atomic unit of work every ledger operation runs in.
//!
//! A [`LedgerStore`] hands out one [`LedgerTxn`] per operation. Everything an
//! operation reads and writes goes through that transaction, and the whole
//! set of effects commits or rolls back together. Implementations: the
//! in-memory store in this crate and the SeaORM/Postgres store in
//! `tesora-db`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tesora_shared::types::{OwnerRef, TxId, WalletId};

use super::error::LedgerError;
use super::types::{
    CryptoTransaction, NewCryptoTransaction, NewTransaction, NewWallet, Transaction, Wallet,
    WalletType,
};

/// Hands out units of work.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// The unit-of-work type this store produces.
    type Txn: LedgerTxn;

    /// Opens a new unit of work.
    async fn begin(&self) -> Result<Self::Txn, LedgerError>;
}

/// One atomic unit of work.
///
/// The `lock_*` reads must prevent lost updates on balance: two concurrent
/// units of work may not both read the same wallet row and independently
/// decide its balance is sufficient. The Postgres implementation locks rows
/// with SELECT ... FOR UPDATE; the in-memory one serializes whole units of
/// work. Plain `find_`/`list_` reads take no lock and are for queries.
///
/// Wallet listings return the owner's wallets in their natural order
/// (creation order); the waterfall's allocation order contract rests on it.
#[async_trait]
pub trait LedgerTxn: Send {
    /// Publishes every effect of this unit of work.
    async fn commit(self) -> Result<(), LedgerError>;

    /// Discards every effect of this unit of work.
    async fn rollback(self) -> Result<(), LedgerError>;

    /// Reads one wallet by (owner, type), locking it for the rest of the
    /// unit of work.
    async fn lock_wallet(
        &mut self,
        owner: &OwnerRef,
        wallet_type: WalletType,
    ) -> Result<Option<Wallet>, LedgerError>;

    /// Reads all of the owner's wallets in natural order, locking them.
    async fn lock_wallets(&mut self, owner: &OwnerRef) -> Result<Vec<Wallet>, LedgerError>;

    /// Reads one wallet without locking.
    async fn find_wallet(
        &mut self,
        owner: &OwnerRef,
        wallet_type: WalletType,
    ) -> Result<Option<Wallet>, LedgerError>;

    /// Reads all of the owner's wallets in natural order, without locking.
    async fn list_wallets(&mut self, owner: &OwnerRef) -> Result<Vec<Wallet>, LedgerError>;

    /// Inserts a wallet row.
    async fn insert_wallet(&mut self, wallet: NewWallet) -> Result<Wallet, LedgerError>;

    /// Writes a wallet's new balance.
    async fn save_balance(
        &mut self,
        wallet_id: WalletId,
        balance: Decimal,
    ) -> Result<(), LedgerError>;

    /// Returns true when any row in the log already carries this reference.
    async fn txid_exists(&mut self, txid: &TxId) -> Result<bool, LedgerError>;

    /// Appends a transaction row. The store stamps id and timestamp.
    async fn append_transaction(
        &mut self,
        row: NewTransaction,
    ) -> Result<Transaction, LedgerError>;

    /// Appends a crypto detail row.
    async fn append_crypto_transaction(
        &mut self,
        row: NewCryptoTransaction,
    ) -> Result<CryptoTransaction, LedgerError>;

    /// Finds the first transaction row carrying this reference.
    async fn find_transaction(&mut self, txid: &TxId) -> Result<Option<Transaction>, LedgerError>;

    /// Lists the owner's transaction rows, newest first.
    async fn list_transactions(&mut self, owner: &OwnerRef)
        -> Result<Vec<Transaction>, LedgerError>;

    /// Lists the crypto detail rows carrying this reference.
    async fn list_crypto_transactions(
        &mut self,
        txid: &TxId,
    ) -> Result<Vec<CryptoTransaction>, LedgerError>;
}
