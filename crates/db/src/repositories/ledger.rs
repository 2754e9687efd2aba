//! Postgres ledger store.
//!
//! [`LedgerRepository`] hands out one database transaction per ledger
//! operation; [`PgLedgerTxn`] wraps it behind the `LedgerTxn` contract. The
//! `lock_*` reads translate to SELECT ... FOR UPDATE row locks, so two
//! concurrent operations on the same owner serialize at the wallet rows.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RuntimeErr, Set, SqlErr,
    TransactionTrait,
};
use uuid::Uuid;

use tesora_core::ledger::{
    CryptoTransaction, LedgerError, LedgerStore, LedgerTxn, NewCryptoTransaction, NewTransaction,
    NewWallet, Transaction, TransactionType, Wallet, WalletType,
};
use tesora_shared::types::{OwnerRef, TransactionId, TxId, WalletId};

use crate::entities::{
    sea_orm_active_enums, wallet_crypto_transactions, wallet_transactions, wallets,
};

/// Filter options for listing transaction rows.
///
/// The default keeps hidden rows out, which is what owner-facing listings
/// want.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only rows that touched this wallet type.
    pub wallet_type: Option<WalletType>,
    /// Only rows of this effect kind.
    pub transaction_type: Option<TransactionType>,
    /// Include rows flagged as hidden.
    pub include_hidden: bool,
}

/// SeaORM-backed [`LedgerStore`].
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists an owner's transaction rows, newest first, narrowed by `filter`.
    ///
    /// Runs on the plain connection outside any unit of work; meant for host
    /// application queries, not for use inside ledger operations.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn transactions_where(
        &self,
        owner: &OwnerRef,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let mut query = wallet_transactions::Entity::find()
            .filter(wallet_transactions::Column::OwnerKind.eq(owner.kind.as_str()))
            .filter(wallet_transactions::Column::OwnerId.eq(owner.id));

        if let Some(wallet_type) = filter.wallet_type {
            query = query.filter(
                wallet_transactions::Column::WalletType
                    .eq(sea_orm_active_enums::WalletType::from(wallet_type)),
            );
        }
        if let Some(transaction_type) = filter.transaction_type {
            query = query.filter(
                wallet_transactions::Column::TransactionType
                    .eq(sea_orm_active_enums::TransactionType::from(transaction_type)),
            );
        }
        if !filter.include_hidden {
            query = query.filter(wallet_transactions::Column::IsHidden.eq(false));
        }

        let models = query
            .order_by_desc(wallet_transactions::Column::CreatedAt)
            .order_by_desc(wallet_transactions::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().map(Transaction::from).collect())
    }
}

#[async_trait]
impl LedgerStore for LedgerRepository {
    type Txn = PgLedgerTxn;

    async fn begin(&self) -> Result<Self::Txn, LedgerError> {
        let txn = self.db.begin().await.map_err(store_error)?;
        Ok(PgLedgerTxn { txn })
    }
}

/// One ledger unit of work, backed by a Postgres transaction.
pub struct PgLedgerTxn {
    txn: DatabaseTransaction,
}

#[async_trait]
impl LedgerTxn for PgLedgerTxn {
    async fn commit(self) -> Result<(), LedgerError> {
        self.txn.commit().await.map_err(store_error)
    }

    async fn rollback(self) -> Result<(), LedgerError> {
        self.txn.rollback().await.map_err(store_error)
    }

    async fn lock_wallet(
        &mut self,
        owner: &OwnerRef,
        wallet_type: WalletType,
    ) -> Result<Option<Wallet>, LedgerError> {
        let model = wallets::Entity::find()
            .filter(wallets::Column::OwnerKind.eq(owner.kind.as_str()))
            .filter(wallets::Column::OwnerId.eq(owner.id))
            .filter(wallets::Column::WalletType.eq(sea_orm_active_enums::WalletType::from(
                wallet_type,
            )))
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(store_error)?;

        Ok(model.map(Wallet::from))
    }

    async fn lock_wallets(&mut self, owner: &OwnerRef) -> Result<Vec<Wallet>, LedgerError> {
        let models = wallets::Entity::find()
            .filter(wallets::Column::OwnerKind.eq(owner.kind.as_str()))
            .filter(wallets::Column::OwnerId.eq(owner.id))
            .order_by_asc(wallets::Column::CreatedAt)
            .order_by_asc(wallets::Column::Id)
            .lock_exclusive()
            .all(&self.txn)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().map(Wallet::from).collect())
    }

    async fn find_wallet(
        &mut self,
        owner: &OwnerRef,
        wallet_type: WalletType,
    ) -> Result<Option<Wallet>, LedgerError> {
        let model = wallets::Entity::find()
            .filter(wallets::Column::OwnerKind.eq(owner.kind.as_str()))
            .filter(wallets::Column::OwnerId.eq(owner.id))
            .filter(wallets::Column::WalletType.eq(sea_orm_active_enums::WalletType::from(
                wallet_type,
            )))
            .one(&self.txn)
            .await
            .map_err(store_error)?;

        Ok(model.map(Wallet::from))
    }

    async fn list_wallets(&mut self, owner: &OwnerRef) -> Result<Vec<Wallet>, LedgerError> {
        let models = wallets::Entity::find()
            .filter(wallets::Column::OwnerKind.eq(owner.kind.as_str()))
            .filter(wallets::Column::OwnerId.eq(owner.id))
            .order_by_asc(wallets::Column::CreatedAt)
            .order_by_asc(wallets::Column::Id)
            .all(&self.txn)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().map(Wallet::from).collect())
    }

    async fn insert_wallet(&mut self, wallet: NewWallet) -> Result<Wallet, LedgerError> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        let model = wallets::ActiveModel {
            id: Set(WalletId::new().into_inner()),
            owner_kind: Set(wallet.owner.kind.clone()),
            owner_id: Set(wallet.owner.id),
            wallet_type: Set(wallet.wallet_type.into()),
            currency: Set(wallet.currency.into()),
            currency_kind: Set(wallet.currency_kind.into()),
            status: Set(wallet.status.into()),
            balance: Set(wallet.balance),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match model.insert(&self.txn).await {
            Ok(saved) => Ok(saved.into()),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(LedgerError::WalletAlreadyExists {
                        owner: wallet.owner,
                        wallet_type: wallet.wallet_type,
                    })
                }
                _ => Err(store_error(err)),
            },
        }
    }

    async fn save_balance(
        &mut self,
        wallet_id: WalletId,
        balance: Decimal,
    ) -> Result<(), LedgerError> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        let updated = wallets::Entity::update_many()
            .col_expr(wallets::Column::Balance, Expr::value(balance))
            .col_expr(wallets::Column::UpdatedAt, Expr::value(now))
            .filter(wallets::Column::Id.eq(wallet_id.into_inner()))
            .exec(&self.txn)
            .await
            .map_err(store_error)?;

        if updated.rows_affected == 1 {
            Ok(())
        } else {
            Err(LedgerError::Database(format!(
                "wallet {wallet_id} vanished mid-transaction"
            )))
        }
    }

    async fn txid_exists(&mut self, txid: &TxId) -> Result<bool, LedgerError> {
        let count = wallet_transactions::Entity::find()
            .filter(wallet_transactions::Column::Txid.eq(txid.as_str()))
            .count(&self.txn)
            .await
            .map_err(store_error)?;

        Ok(count > 0)
    }

    async fn append_transaction(
        &mut self,
        row: NewTransaction,
    ) -> Result<Transaction, LedgerError> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        let model = wallet_transactions::ActiveModel {
            id: Set(TransactionId::new().into_inner()),
            owner_kind: Set(row.owner.kind.clone()),
            owner_id: Set(row.owner.id),
            owner_from_kind: Set(row.owner_from.as_ref().map(|o| o.kind.clone())),
            owner_from_id: Set(row.owner_from.as_ref().map(|o| o.id)),
            txid: Set(row.txid.as_str().to_owned()),
            amount: Set(row.amount),
            platform_fee: Set(row.platform_fee),
            total: Set(row.total),
            description: Set(row.description.clone()),
            remark: Set(row.remark.clone()),
            is_hidden: Set(row.is_hidden),
            wallet_type: Set(row.wallet_type.into()),
            from_wallet_type: Set(row.from_wallet_type.map(Into::into)),
            currency: Set(row.currency.into()),
            currency_kind: Set(row.currency_kind.into()),
            transaction_type: Set(row.transaction_type.into()),
            transaction_method: Set(row.transaction_method.into()),
            status: Set(row.status.into()),
            profit_id: Set(row.profit_id),
            recall_txid: Set(row.recall_txid.as_ref().map(|t| t.as_str().to_owned())),
            created_at: Set(now),
        };

        match model.insert(&self.txn).await {
            Ok(saved) => Ok(saved.into()),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(LedgerError::DuplicateTransaction(row.txid))
                }
                _ => Err(store_error(err)),
            },
        }
    }

    async fn append_crypto_transaction(
        &mut self,
        row: NewCryptoTransaction,
    ) -> Result<CryptoTransaction, LedgerError> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        let model = wallet_crypto_transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            transaction_id: Set(row.transaction_id.into_inner()),
            txid: Set(row.txid.as_str().to_owned()),
            address: Set(row.address),
            address_from: Set(row.address_from),
            price_usd: Set(row.price_usd),
            currency: Set(row.currency.into()),
            transaction_type: Set(row.transaction_type.into()),
            created_at: Set(now),
        };

        let saved = model.insert(&self.txn).await.map_err(store_error)?;
        Ok(saved.into())
    }

    async fn find_transaction(&mut self, txid: &TxId) -> Result<Option<Transaction>, LedgerError> {
        let model = wallet_transactions::Entity::find()
            .filter(wallet_transactions::Column::Txid.eq(txid.as_str()))
            .order_by_asc(wallet_transactions::Column::CreatedAt)
            .order_by_asc(wallet_transactions::Column::Id)
            .one(&self.txn)
            .await
            .map_err(store_error)?;

        Ok(model.map(Transaction::from))
    }

    async fn list_transactions(
        &mut self,
        owner: &OwnerRef,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let models = wallet_transactions::Entity::find()
            .filter(wallet_transactions::Column::OwnerKind.eq(owner.kind.as_str()))
            .filter(wallet_transactions::Column::OwnerId.eq(owner.id))
            .order_by_desc(wallet_transactions::Column::CreatedAt)
            .order_by_desc(wallet_transactions::Column::Id)
            .all(&self.txn)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().map(Transaction::from).collect())
    }

    async fn list_crypto_transactions(
        &mut self,
        txid: &TxId,
    ) -> Result<Vec<CryptoTransaction>, LedgerError> {
        let models = wallet_crypto_transactions::Entity::find()
            .filter(wallet_crypto_transactions::Column::Txid.eq(txid.as_str()))
            .order_by_asc(wallet_crypto_transactions::Column::CreatedAt)
            .order_by_asc(wallet_crypto_transactions::Column::Id)
            .all(&self.txn)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().map(CryptoTransaction::from).collect())
    }
}

/// Maps a SeaORM error onto the ledger error taxonomy.
///
/// Serialization failures and deadlocks become [`LedgerError::ConcurrentModification`]
/// so callers know a retry is worthwhile; everything else is opaque.
fn store_error(err: DbErr) -> LedgerError {
    if is_serialization_conflict(&err) {
        LedgerError::ConcurrentModification
    } else {
        LedgerError::Database(err.to_string())
    }
}

/// Returns true for Postgres serialization_failure (40001) and
/// deadlock_detected (40P01).
fn is_serialization_conflict(err: &DbErr) -> bool {
    match err {
        DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
        | DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(e))) => {
            matches!(e.code().as_deref(), Some("40001" | "40P01"))
        }
        _ => false,
    }
}
