//! In-memory ledger store.
//!
//! Backs the service tests and embedded/demo use. A unit of work takes the
//! single world lock and mutates a staged copy; commit publishes the copy,
//! rollback just drops it. Holding the lock for the whole unit of work
//! serializes operations, which is the strongest form of the isolation the
//! store contract asks for.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tesora_shared::types::{OwnerRef, TransactionId, TxId, WalletId};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::error::LedgerError;
use super::store::{LedgerStore, LedgerTxn};
use super::types::{
    CryptoTransaction, NewCryptoTransaction, NewTransaction, NewWallet, Transaction, Wallet,
    WalletType,
};

#[derive(Debug, Default, Clone)]
struct World {
    wallets: Vec<Wallet>,
    transactions: Vec<Transaction>,
    crypto_transactions: Vec<CryptoTransaction>,
}

/// Ledger store holding everything in process memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryLedgerStore {
    world: Arc<Mutex<World>>,
}

impl MemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Unit of work over the in-memory world.
pub struct MemoryLedgerTxn {
    guard: OwnedMutexGuard<World>,
    staged: World,
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    type Txn = MemoryLedgerTxn;

    async fn begin(&self) -> Result<Self::Txn, LedgerError> {
        let guard = Arc::clone(&self.world).lock_owned().await;
        let staged = guard.clone();
        Ok(MemoryLedgerTxn { guard, staged })
    }
}

#[async_trait]
impl LedgerTxn for MemoryLedgerTxn {
    async fn commit(mut self) -> Result<(), LedgerError> {
        *self.guard = self.staged;
        Ok(())
    }

    async fn rollback(self) -> Result<(), LedgerError> {
        Ok(())
    }

    async fn lock_wallet(
        &mut self,
        owner: &OwnerRef,
        wallet_type: WalletType,
    ) -> Result<Option<Wallet>, LedgerError> {
        self.find_wallet(owner, wallet_type).await
    }

    async fn lock_wallets(&mut self, owner: &OwnerRef) -> Result<Vec<Wallet>, LedgerError> {
        self.list_wallets(owner).await
    }

    async fn find_wallet(
        &mut self,
        owner: &OwnerRef,
        wallet_type: WalletType,
    ) -> Result<Option<Wallet>, LedgerError> {
        Ok(self
            .staged
            .wallets
            .iter()
            .find(|w| &w.owner == owner && w.wallet_type == wallet_type)
            .cloned())
    }

    async fn list_wallets(&mut self, owner: &OwnerRef) -> Result<Vec<Wallet>, LedgerError> {
        // Insertion order is creation order, the natural order callers rely on.
        Ok(self
            .staged
            .wallets
            .iter()
            .filter(|w| &w.owner == owner)
            .cloned()
            .collect())
    }

    async fn insert_wallet(&mut self, wallet: NewWallet) -> Result<Wallet, LedgerError> {
        if self
            .staged
            .wallets
            .iter()
            .any(|w| w.owner == wallet.owner && w.wallet_type == wallet.wallet_type)
        {
            return Err(LedgerError::WalletAlreadyExists {
                owner: wallet.owner,
                wallet_type: wallet.wallet_type,
            });
        }

        let now = Utc::now();
        let row = Wallet {
            id: WalletId::new(),
            owner: wallet.owner,
            wallet_type: wallet.wallet_type,
            currency: wallet.currency,
            currency_kind: wallet.currency_kind,
            status: wallet.status,
            balance: wallet.balance,
            created_at: now,
            updated_at: now,
        };
        self.staged.wallets.push(row.clone());
        Ok(row)
    }

    async fn save_balance(
        &mut self,
        wallet_id: WalletId,
        balance: Decimal,
    ) -> Result<(), LedgerError> {
        let wallet = self
            .staged
            .wallets
            .iter_mut()
            .find(|w| w.id == wallet_id)
            .ok_or_else(|| LedgerError::Database(format!("no wallet row {wallet_id}")))?;
        wallet.balance = balance;
        wallet.updated_at = Utc::now();
        Ok(())
    }

    async fn txid_exists(&mut self, txid: &TxId) -> Result<bool, LedgerError> {
        Ok(self.staged.transactions.iter().any(|t| &t.txid == txid))
    }

    async fn append_transaction(
        &mut self,
        row: NewTransaction,
    ) -> Result<Transaction, LedgerError> {
        // Backstop mirroring the database's UNIQUE (txid, wallet_type).
        if self
            .staged
            .transactions
            .iter()
            .any(|t| t.txid == row.txid && t.wallet_type == row.wallet_type)
        {
            return Err(LedgerError::DuplicateTransaction(row.txid));
        }

        let transaction = Transaction {
            id: TransactionId::new(),
            owner: row.owner,
            owner_from: row.owner_from,
            txid: row.txid,
            amount: row.amount,
            platform_fee: row.platform_fee,
            total: row.total,
            description: row.description,
            remark: row.remark,
            is_hidden: row.is_hidden,
            wallet_type: row.wallet_type,
            from_wallet_type: row.from_wallet_type,
            currency: row.currency,
            currency_kind: row.currency_kind,
            transaction_type: row.transaction_type,
            transaction_method: row.transaction_method,
            status: row.status,
            profit_id: row.profit_id,
            recall_txid: row.recall_txid,
            created_at: Utc::now(),
        };
        self.staged.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn append_crypto_transaction(
        &mut self,
        row: NewCryptoTransaction,
    ) -> Result<CryptoTransaction, LedgerError> {
        if !self
            .staged
            .transactions
            .iter()
            .any(|t| t.id == row.transaction_id)
        {
            return Err(LedgerError::Database(format!(
                "no parent transaction {} for crypto row",
                row.transaction_id
            )));
        }

        let crypto = CryptoTransaction {
            id: Uuid::now_v7(),
            transaction_id: row.transaction_id,
            txid: row.txid,
            address: row.address,
            address_from: row.address_from,
            price_usd: row.price_usd,
            currency: row.currency,
            transaction_type: row.transaction_type,
            created_at: Utc::now(),
        };
        self.staged.crypto_transactions.push(crypto.clone());
        Ok(crypto)
    }

    async fn find_transaction(
        &mut self,
        txid: &TxId,
    ) -> Result<Option<Transaction>, LedgerError> {
        Ok(self
            .staged
            .transactions
            .iter()
            .find(|t| &t.txid == txid)
            .cloned())
    }

    async fn list_transactions(
        &mut self,
        owner: &OwnerRef,
    ) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self
            .staged
            .transactions
            .iter()
            .rev()
            .filter(|t| &t.owner == owner)
            .cloned()
            .collect())
    }

    async fn list_crypto_transactions(
        &mut self,
        txid: &TxId,
    ) -> Result<Vec<CryptoTransaction>, LedgerError> {
        Ok(self
            .staged
            .crypto_transactions
            .iter()
            .filter(|c| &c.txid == txid)
            .cloned()
            .collect())
    }
}
