//! Ledger operations.
//!
//! [`LedgerService`] is the only writer of wallet balances and transaction
//! rows. Every operation follows the same shape: validate the request, open
//! one unit of work, pre-check the reference, lock the wallets it will
//! touch, apply balance writes and row appends, then commit. Any error rolls
//! the whole unit back; callers see zero partial effects.
//!
//! Amount conventions: deposits move `amount` and credit the balance only
//! when the request is approved. Pay, adjustment, and transfer move `total`
//! (amount plus fee) and always move funds; their status is bookkeeping.

use std::sync::Arc;

use rust_decimal::Decimal;
use tesora_shared::types::{OwnerRef, TxId};
use tracing::{error, info, warn};

use super::allocation::{allocate, deposit_room, withdrawal_room};
use super::balance::{available_balance, balance_of_type, has_sufficient_balance, total_balance};
use super::error::LedgerError;
use super::policy::{LedgerPolicy, StandardPolicy};
use super::request::PaymentRequest;
use super::store::{LedgerStore, LedgerTxn};
use super::types::{
    CryptoTransaction, Currency, CurrencyKind, DepositReceipt, NewCryptoTransaction,
    NewTransaction, NewWallet, PaymentReceipt, Transaction, TransactionType, TransferReceipt,
    Wallet, WalletStatus, WalletType,
};

/// The ledger mutation engine.
///
/// Generic over the [`LedgerStore`] so the same operations run against the
/// in-memory store and the database store. The policy supplies the two
/// configuration-level decisions: per-type capacity caps for multi-wallet
/// deposits and the sink set for transfers.
pub struct LedgerService<S> {
    store: S,
    policy: Arc<dyn LedgerPolicy>,
}

impl<S: LedgerStore> LedgerService<S> {
    /// Creates a service with the standard policy.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_policy(store, Arc::new(StandardPolicy::new()))
    }

    /// Creates a service with an explicit policy.
    #[must_use]
    pub fn with_policy(store: S, policy: Arc<dyn LedgerPolicy>) -> Self {
        Self { store, policy }
    }

    // ========== Provisioning ==========

    /// Opens a wallet for the owner: active, zero balance, kind derived
    /// from the currency.
    ///
    /// # Errors
    ///
    /// Returns `WalletAlreadyExists` when the owner already holds a wallet
    /// of this type, or a store error.
    pub async fn open_wallet(
        &self,
        owner: OwnerRef,
        wallet_type: WalletType,
        currency: Currency,
    ) -> Result<Wallet, LedgerError> {
        let mut txn = self.store.begin().await?;
        let result = Self::open_wallet_in(&mut txn, owner, wallet_type, currency).await;
        match result {
            Ok(wallet) => {
                txn.commit().await?;
                info!(
                    owner = %wallet.owner,
                    wallet_type = %wallet.wallet_type,
                    currency = %wallet.currency,
                    "Wallet opened"
                );
                Ok(wallet)
            }
            Err(err) => Self::reject(txn, "open_wallet", err).await,
        }
    }

    async fn open_wallet_in(
        txn: &mut S::Txn,
        owner: OwnerRef,
        wallet_type: WalletType,
        currency: Currency,
    ) -> Result<Wallet, LedgerError> {
        // Lock the slot first; the store's uniqueness check is the race
        // backstop.
        if txn.lock_wallet(&owner, wallet_type).await?.is_some() {
            return Err(LedgerError::WalletAlreadyExists { owner, wallet_type });
        }
        txn.insert_wallet(NewWallet {
            owner,
            wallet_type,
            currency,
            currency_kind: currency.kind(),
            status: WalletStatus::Active,
            balance: Decimal::ZERO,
        })
        .await
    }

    // ========== Deposit ==========

    /// Records an incoming payment.
    ///
    /// With a wallet type set, credits that wallet. With none set, spreads
    /// the amount across the owner's active wallets in natural order,
    /// bounded by the policy's capacity caps; anything no wallet had room
    /// for comes back as `unallocated` rather than an error. The balance is
    /// credited only when the request is approved; the row is written
    /// either way.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTransaction` when the reference was already used,
    /// `WalletNotFound` in single-wallet mode when the wallet is missing,
    /// `MissingCryptoAddress` when a crypto wallet is credited without a
    /// destination address, or a store error.
    pub async fn deposit(&self, request: PaymentRequest) -> Result<DepositReceipt, LedgerError> {
        request.validate()?;
        let mut txn = self.store.begin().await?;
        let result = self.deposit_in(&mut txn, &request).await;
        match result {
            Ok(receipt) => {
                txn.commit().await?;
                if !receipt.is_fully_allocated() {
                    warn!(
                        owner = %request.owner,
                        txid = %request.txid,
                        unallocated = %receipt.unallocated,
                        "Deposit left funds unallocated"
                    );
                }
                info!(
                    owner = %request.owner,
                    txid = %request.txid,
                    amount = %request.amount,
                    rows = receipt.transactions.len(),
                    "Deposit recorded"
                );
                Ok(receipt)
            }
            Err(err) => Self::reject(txn, "deposit", err).await,
        }
    }

    async fn deposit_in(
        &self,
        txn: &mut S::Txn,
        request: &PaymentRequest,
    ) -> Result<DepositReceipt, LedgerError> {
        Self::ensure_fresh_txid(txn, &request.txid).await?;
        match request.wallet_type {
            Some(wallet_type) => self.deposit_single(txn, request, wallet_type).await,
            None => self.deposit_multi(txn, request).await,
        }
    }

    async fn deposit_single(
        &self,
        txn: &mut S::Txn,
        request: &PaymentRequest,
        wallet_type: WalletType,
    ) -> Result<DepositReceipt, LedgerError> {
        let wallet = txn
            .lock_wallet(&request.owner, wallet_type)
            .await?
            .ok_or_else(|| LedgerError::WalletNotFound {
                owner: request.owner.clone(),
                wallet_type,
            })?;

        if request.status.is_approved() {
            txn.save_balance(wallet.id, wallet.balance + request.amount).await?;
        }
        let transaction = Self::append_with_crypto(
            txn,
            request,
            Self::row(request, &wallet, request.amount, request.platform_fee, request.total),
            TransactionType::Deposit,
        )
        .await?;

        Ok(DepositReceipt { transactions: vec![transaction], unallocated: Decimal::ZERO })
    }

    async fn deposit_multi(
        &self,
        txn: &mut S::Txn,
        request: &PaymentRequest,
    ) -> Result<DepositReceipt, LedgerError> {
        let wallets = txn.lock_wallets(&request.owner).await?;
        let plan = allocate(
            request.amount,
            &wallets,
            |w| deposit_room(self.policy.max_capacity(w), w.balance),
            Wallet::is_active,
        );

        let mut transactions = Vec::with_capacity(plan.allocations.len());
        for allocation in &plan.allocations {
            let wallet = &allocation.wallet;
            if request.status.is_approved() {
                txn.save_balance(wallet.id, wallet.balance + allocation.amount).await?;
            }
            // Each leg records only its own share.
            let transaction = Self::append_with_crypto(
                txn,
                request,
                Self::row(request, wallet, allocation.amount, Decimal::ZERO, allocation.amount),
                TransactionType::Deposit,
            )
            .await?;
            transactions.push(transaction);
        }

        Ok(DepositReceipt { transactions, unallocated: plan.remaining })
    }

    // ========== Pay / Withdraw ==========

    /// Records an outgoing payment, deducting `total` from the owner's
    /// funds.
    ///
    /// With a wallet type set, the wallet must exist, be active, and cover
    /// the total by itself. With none set, the owner's spendable wallets
    /// must cover the total in aggregate; the deduction then spreads across
    /// them in natural order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTransaction` on a reused reference,
    /// `WalletNotFound`/`WalletInactive` on wallet checks,
    /// `InsufficientBalance` when funds do not cover the total,
    /// `MissingCryptoAddress` when a crypto wallet is debited without a
    /// destination address, or a store error.
    pub async fn pay(&self, request: PaymentRequest) -> Result<PaymentReceipt, LedgerError> {
        request.validate()?;
        let mut txn = self.store.begin().await?;
        let result = self.pay_in(&mut txn, &request).await;
        match result {
            Ok(receipt) => {
                txn.commit().await?;
                info!(
                    owner = %request.owner,
                    txid = %request.txid,
                    total = %request.total,
                    rows = receipt.transactions.len(),
                    "Payment recorded"
                );
                Ok(receipt)
            }
            Err(err) => Self::reject(txn, "pay", err).await,
        }
    }

    async fn pay_in(
        &self,
        txn: &mut S::Txn,
        request: &PaymentRequest,
    ) -> Result<PaymentReceipt, LedgerError> {
        Self::ensure_fresh_txid(txn, &request.txid).await?;
        match request.wallet_type {
            Some(wallet_type) => self.pay_single(txn, request, wallet_type).await,
            None => self.pay_multi(txn, request).await,
        }
    }

    async fn pay_single(
        &self,
        txn: &mut S::Txn,
        request: &PaymentRequest,
        wallet_type: WalletType,
    ) -> Result<PaymentReceipt, LedgerError> {
        let wallet = txn
            .lock_wallet(&request.owner, wallet_type)
            .await?
            .ok_or_else(|| LedgerError::WalletNotFound {
                owner: request.owner.clone(),
                wallet_type,
            })?;
        Self::ensure_debitable(&wallet)?;
        if wallet.balance < request.total {
            return Err(LedgerError::InsufficientBalance {
                requested: request.total,
                available: wallet.balance,
            });
        }

        txn.save_balance(wallet.id, wallet.balance - request.total).await?;
        let transaction = Self::append_with_crypto(
            txn,
            request,
            Self::row(request, &wallet, request.amount, request.platform_fee, request.total),
            TransactionType::Withdraw,
        )
        .await?;

        Ok(PaymentReceipt { transactions: vec![transaction] })
    }

    async fn pay_multi(
        &self,
        txn: &mut S::Txn,
        request: &PaymentRequest,
    ) -> Result<PaymentReceipt, LedgerError> {
        let wallets = txn.lock_wallets(&request.owner).await?;
        if !has_sufficient_balance(&wallets, request.total) {
            return Err(LedgerError::InsufficientBalance {
                requested: request.total,
                available: available_balance(&wallets),
            });
        }

        let plan = allocate(request.total, &wallets, withdrawal_room, Wallet::is_spendable);
        if !plan.is_fully_allocated() {
            // Unreachable after the aggregate check unless balances moved
            // under us; the unit of work makes that a store-level race.
            return Err(LedgerError::InsufficientBalance {
                requested: request.total,
                available: plan.total_allocated(),
            });
        }

        let mut transactions = Vec::with_capacity(plan.allocations.len());
        for allocation in &plan.allocations {
            let wallet = &allocation.wallet;
            txn.save_balance(wallet.id, wallet.balance - allocation.amount).await?;
            let transaction = Self::append_with_crypto(
                txn,
                request,
                Self::row(request, wallet, allocation.amount, Decimal::ZERO, allocation.amount),
                TransactionType::Withdraw,
            )
            .await?;
            transactions.push(transaction);
        }

        Ok(PaymentReceipt { transactions })
    }

    // ========== Adjustment ==========

    /// Deducts `total` from one wallet as an administrative correction.
    ///
    /// Skips the aggregate-sufficiency concept of [`pay`](Self::pay) but
    /// still refuses to drive the wallet below zero.
    ///
    /// # Errors
    ///
    /// Returns `MissingWalletType` when no wallet type is set,
    /// `DuplicateTransaction` on a reused reference,
    /// `WalletNotFound`/`WalletInactive`/`InsufficientBalance` on wallet
    /// checks, or a store error.
    pub async fn subtract(&self, request: PaymentRequest) -> Result<PaymentReceipt, LedgerError> {
        request.validate()?;
        let Some(wallet_type) = request.wallet_type else {
            return Err(LedgerError::MissingWalletType);
        };

        let mut txn = self.store.begin().await?;
        let result = self.subtract_in(&mut txn, &request, wallet_type).await;
        match result {
            Ok(receipt) => {
                txn.commit().await?;
                info!(
                    owner = %request.owner,
                    txid = %request.txid,
                    wallet_type = %wallet_type,
                    total = %request.total,
                    "Adjustment recorded"
                );
                Ok(receipt)
            }
            Err(err) => Self::reject(txn, "subtract", err).await,
        }
    }

    async fn subtract_in(
        &self,
        txn: &mut S::Txn,
        request: &PaymentRequest,
        wallet_type: WalletType,
    ) -> Result<PaymentReceipt, LedgerError> {
        Self::ensure_fresh_txid(txn, &request.txid).await?;
        let wallet = txn
            .lock_wallet(&request.owner, wallet_type)
            .await?
            .ok_or_else(|| LedgerError::WalletNotFound {
                owner: request.owner.clone(),
                wallet_type,
            })?;
        Self::ensure_debitable(&wallet)?;
        if wallet.balance < request.total {
            return Err(LedgerError::InsufficientBalance {
                requested: request.total,
                available: wallet.balance,
            });
        }

        txn.save_balance(wallet.id, wallet.balance - request.total).await?;
        let transaction = Self::append_with_crypto(
            txn,
            request,
            Self::row(request, &wallet, request.amount, request.platform_fee, request.total),
            TransactionType::Withdraw,
        )
        .await?;

        Ok(PaymentReceipt { transactions: vec![transaction] })
    }

    // ========== Internal Transfer ==========

    /// Moves `total` between two wallets of the same owner.
    ///
    /// The destination is credited unless the source type is a configured
    /// sink, in which case the funds are absorbed. Writes exactly one row,
    /// carrying the destination type, the source type, and the source
    /// wallet's currency.
    ///
    /// # Errors
    ///
    /// Returns `MissingWalletType` unless both types are set,
    /// `SelfTransfer` when they are equal, `DuplicateTransaction` on a
    /// reused reference, `WalletNotFound` when either wallet is missing,
    /// `InsufficientBalance` when the source cannot cover the total, or a
    /// store error.
    pub async fn transfer(&self, request: PaymentRequest) -> Result<TransferReceipt, LedgerError> {
        request.validate()?;
        let (Some(source_type), Some(dest_type)) = (request.from_wallet_type, request.wallet_type)
        else {
            return Err(LedgerError::MissingWalletType);
        };
        if source_type == dest_type {
            return Err(LedgerError::SelfTransfer);
        }

        let mut txn = self.store.begin().await?;
        let result = self.transfer_in(&mut txn, &request, source_type, dest_type).await;
        match result {
            Ok(receipt) => {
                txn.commit().await?;
                info!(
                    owner = %request.owner,
                    txid = %request.txid,
                    from = %source_type,
                    to = %dest_type,
                    total = %request.total,
                    "Transfer recorded"
                );
                Ok(receipt)
            }
            Err(err) => Self::reject(txn, "transfer", err).await,
        }
    }

    async fn transfer_in(
        &self,
        txn: &mut S::Txn,
        request: &PaymentRequest,
        source_type: WalletType,
        dest_type: WalletType,
    ) -> Result<TransferReceipt, LedgerError> {
        Self::ensure_fresh_txid(txn, &request.txid).await?;

        let source = txn
            .lock_wallet(&request.owner, source_type)
            .await?
            .ok_or_else(|| LedgerError::WalletNotFound {
                owner: request.owner.clone(),
                wallet_type: source_type,
            })?;
        let destination = txn
            .lock_wallet(&request.owner, dest_type)
            .await?
            .ok_or_else(|| LedgerError::WalletNotFound {
                owner: request.owner.clone(),
                wallet_type: dest_type,
            })?;

        if source.balance < request.total {
            return Err(LedgerError::InsufficientBalance {
                requested: request.total,
                available: source.balance,
            });
        }

        txn.save_balance(source.id, source.balance - request.total).await?;
        if !self.policy.is_sink(source_type) {
            txn.save_balance(destination.id, destination.balance + request.total).await?;
        }

        // One row for the whole move, denominated in the source's currency.
        let transaction = txn
            .append_transaction(NewTransaction {
                owner: request.owner.clone(),
                owner_from: request.owner_from.clone(),
                txid: request.txid.clone(),
                amount: request.amount,
                platform_fee: request.platform_fee,
                total: request.total,
                description: request.description.clone(),
                remark: request.remark.clone(),
                is_hidden: request.is_hidden,
                wallet_type: dest_type,
                from_wallet_type: Some(source_type),
                currency: source.currency,
                currency_kind: source.currency_kind,
                transaction_type: request.transaction_type,
                transaction_method: request.transaction_method,
                status: request.status,
                profit_id: request.profit_id,
                recall_txid: request.recall_txid.clone(),
            })
            .await?;

        Ok(TransferReceipt { transaction })
    }

    // ========== Queries ==========

    /// Lists the owner's wallets in natural order.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn wallets(&self, owner: &OwnerRef) -> Result<Vec<Wallet>, LedgerError> {
        let mut txn = self.store.begin().await?;
        match txn.list_wallets(owner).await {
            Ok(wallets) => {
                txn.commit().await?;
                Ok(wallets)
            }
            Err(err) => Self::reject(txn, "wallets", err).await,
        }
    }

    /// Looks up one wallet by (owner, type).
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn wallet(
        &self,
        owner: &OwnerRef,
        wallet_type: WalletType,
    ) -> Result<Option<Wallet>, LedgerError> {
        let mut txn = self.store.begin().await?;
        match txn.find_wallet(owner, wallet_type).await {
            Ok(wallet) => {
                txn.commit().await?;
                Ok(wallet)
            }
            Err(err) => Self::reject(txn, "wallet", err).await,
        }
    }

    /// Sum of every wallet balance, regardless of status.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn balance(&self, owner: &OwnerRef) -> Result<Decimal, LedgerError> {
        Ok(total_balance(&self.wallets(owner).await?))
    }

    /// Sum of the balances a withdrawal could draw on.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn available_balance(&self, owner: &OwnerRef) -> Result<Decimal, LedgerError> {
        Ok(available_balance(&self.wallets(owner).await?))
    }

    /// Balance held in the owner's wallet of one type.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn balance_of(
        &self,
        owner: &OwnerRef,
        wallet_type: WalletType,
    ) -> Result<Decimal, LedgerError> {
        Ok(balance_of_type(&self.wallets(owner).await?, wallet_type))
    }

    /// Finds the first transaction row carrying this reference.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn find_transaction(&self, txid: &TxId) -> Result<Option<Transaction>, LedgerError> {
        let mut txn = self.store.begin().await?;
        match txn.find_transaction(txid).await {
            Ok(transaction) => {
                txn.commit().await?;
                Ok(transaction)
            }
            Err(err) => Self::reject(txn, "find_transaction", err).await,
        }
    }

    /// Lists the owner's transaction rows, newest first.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn transactions(&self, owner: &OwnerRef) -> Result<Vec<Transaction>, LedgerError> {
        let mut txn = self.store.begin().await?;
        match txn.list_transactions(owner).await {
            Ok(transactions) => {
                txn.commit().await?;
                Ok(transactions)
            }
            Err(err) => Self::reject(txn, "transactions", err).await,
        }
    }

    /// Lists the crypto detail rows carrying this reference.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn crypto_transactions(
        &self,
        txid: &TxId,
    ) -> Result<Vec<CryptoTransaction>, LedgerError> {
        let mut txn = self.store.begin().await?;
        match txn.list_crypto_transactions(txid).await {
            Ok(rows) => {
                txn.commit().await?;
                Ok(rows)
            }
            Err(err) => Self::reject(txn, "crypto_transactions", err).await,
        }
    }

    // ========== Shared Plumbing ==========

    async fn ensure_fresh_txid(txn: &mut S::Txn, txid: &TxId) -> Result<(), LedgerError> {
        if txn.txid_exists(txid).await? {
            return Err(LedgerError::DuplicateTransaction(txid.clone()));
        }
        Ok(())
    }

    fn ensure_debitable(wallet: &Wallet) -> Result<(), LedgerError> {
        if wallet.status.allows_debit() {
            Ok(())
        } else {
            Err(LedgerError::WalletInactive {
                wallet_type: wallet.wallet_type,
                status: wallet.status,
            })
        }
    }

    /// Builds the row for an operation touching `wallet`, copying the
    /// wallet's currency rather than the request's to prevent drift.
    fn row(
        request: &PaymentRequest,
        wallet: &Wallet,
        amount: Decimal,
        platform_fee: Decimal,
        total: Decimal,
    ) -> NewTransaction {
        NewTransaction {
            owner: request.owner.clone(),
            owner_from: request.owner_from.clone(),
            txid: request.txid.clone(),
            amount,
            platform_fee,
            total,
            description: request.description.clone(),
            remark: request.remark.clone(),
            is_hidden: request.is_hidden,
            wallet_type: wallet.wallet_type,
            from_wallet_type: request.from_wallet_type,
            currency: wallet.currency,
            currency_kind: wallet.currency_kind,
            transaction_type: request.transaction_type,
            transaction_method: request.transaction_method,
            status: request.status,
            profit_id: request.profit_id,
            recall_txid: request.recall_txid.clone(),
        }
    }

    /// Appends the row, plus the crypto detail row crypto-kind rows carry.
    ///
    /// `crypto_type` is forced by the operation (deposit or withdraw), not
    /// copied from the parent row.
    async fn append_with_crypto(
        txn: &mut S::Txn,
        request: &PaymentRequest,
        row: NewTransaction,
        crypto_type: TransactionType,
    ) -> Result<Transaction, LedgerError> {
        let address = if row.currency_kind == CurrencyKind::Crypto {
            Some(request.crypto_address.clone().ok_or(LedgerError::MissingCryptoAddress)?)
        } else {
            None
        };

        let transaction = txn.append_transaction(row).await?;
        if let Some(address) = address {
            txn.append_crypto_transaction(NewCryptoTransaction {
                transaction_id: transaction.id,
                txid: transaction.txid.clone(),
                address,
                address_from: request.crypto_address_from.clone(),
                price_usd: request.price_usd,
                currency: transaction.currency,
                transaction_type: crypto_type,
            })
            .await?;
        }
        Ok(transaction)
    }

    async fn reject<T>(
        txn: S::Txn,
        operation: &'static str,
        err: LedgerError,
    ) -> Result<T, LedgerError> {
        if let Err(rollback_err) = txn.rollback().await {
            error!(operation, error = %rollback_err, "Rollback failed");
        }
        warn!(operation, error = %err, code = err.error_code(), "Ledger operation rejected");
        Err(err)
    }
}
