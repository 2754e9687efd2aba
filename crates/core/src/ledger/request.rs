//! Payment requests.
//!
//! A [`PaymentRequest`] is the transient input to every ledger operation. It
//! carries the fields the caller wants copied onto the resulting transaction
//! rows plus routing hints: a set `wallet_type` targets one wallet, an unset
//! one spreads the operation across all of the owner's wallets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tesora_shared::types::{OwnerRef, TxId};
use uuid::Uuid;

use super::error::LedgerError;
use super::types::{TransactionMethod, TransactionStatus, TransactionType, WalletType};

/// Input describing one requested ledger effect.
///
/// Built fluently; `total` follows the amount-plus-fee convention until a
/// caller overrides it:
///
/// ```
/// use rust_decimal_macros::dec;
/// use tesora_core::ledger::PaymentRequest;
/// use tesora_shared::OwnerRef;
/// use uuid::Uuid;
///
/// let request = PaymentRequest::withdrawal(OwnerRef::user(Uuid::new_v4()), "wd-1", dec!(100))
///     .with_platform_fee(dec!(2.50));
/// assert_eq!(request.total, dec!(102.50));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Owner whose wallets are touched.
    pub owner: OwnerRef,
    /// Counterparty owner, recorded on transfer rows.
    pub owner_from: Option<OwnerRef>,
    /// Caller-supplied reference; one request per `TxId`.
    pub txid: TxId,
    /// Requested amount.
    pub amount: Decimal,
    /// Fee charged on top of the amount.
    pub platform_fee: Decimal,
    /// Amount plus fee by convention; callers may override.
    pub total: Decimal,
    /// Caller-facing description.
    pub description: Option<String>,
    /// Internal note.
    pub remark: Option<String>,
    /// Keep resulting rows out of owner-facing listings.
    pub is_hidden: bool,
    /// Target wallet type; `None` selects multi-wallet mode.
    pub wallet_type: Option<WalletType>,
    /// Source wallet type, required for transfers.
    pub from_wallet_type: Option<WalletType>,
    /// Kind of effect recorded on the rows.
    pub transaction_type: TransactionType,
    /// How the payment was carried.
    pub transaction_method: TransactionMethod,
    /// Approval state; deposits credit only when approved.
    pub status: TransactionStatus,
    /// Destination crypto address, required when the wallet is crypto-kind.
    pub crypto_address: Option<String>,
    /// Source crypto address, when known.
    pub crypto_address_from: Option<String>,
    /// USD price of the crypto currency at request time.
    pub price_usd: Decimal,
    /// Optional link to a profit distribution.
    pub profit_id: Option<Uuid>,
    /// Reference of a transaction this request reverses.
    pub recall_txid: Option<TxId>,
}

impl PaymentRequest {
    fn base(
        owner: OwnerRef,
        txid: impl Into<TxId>,
        amount: Decimal,
        transaction_type: TransactionType,
        transaction_method: TransactionMethod,
    ) -> Self {
        Self {
            owner,
            owner_from: None,
            txid: txid.into(),
            amount,
            platform_fee: Decimal::ZERO,
            total: amount,
            description: None,
            remark: None,
            is_hidden: false,
            wallet_type: None,
            from_wallet_type: None,
            transaction_type,
            transaction_method,
            status: TransactionStatus::Approved,
            crypto_address: None,
            crypto_address_from: None,
            price_usd: Decimal::ZERO,
            profit_id: None,
            recall_txid: None,
        }
    }

    /// Starts a deposit request. Multi-wallet until a type is set.
    #[must_use]
    pub fn deposit(owner: OwnerRef, txid: impl Into<TxId>, amount: Decimal) -> Self {
        Self::base(owner, txid, amount, TransactionType::Deposit, TransactionMethod::Gateway)
    }

    /// Starts a withdrawal request. Multi-wallet until a type is set.
    #[must_use]
    pub fn withdrawal(owner: OwnerRef, txid: impl Into<TxId>, amount: Decimal) -> Self {
        Self::base(owner, txid, amount, TransactionType::Withdraw, TransactionMethod::Gateway)
    }

    /// Starts an internal transfer request from one wallet type to another.
    #[must_use]
    pub fn transfer(
        owner: OwnerRef,
        txid: impl Into<TxId>,
        amount: Decimal,
        from: WalletType,
        to: WalletType,
    ) -> Self {
        let mut request =
            Self::base(owner, txid, amount, TransactionType::Transfer, TransactionMethod::Internal);
        request.from_wallet_type = Some(from);
        request.wallet_type = Some(to);
        request
    }

    /// Starts an administrative adjustment against one wallet.
    #[must_use]
    pub fn adjustment(
        owner: OwnerRef,
        txid: impl Into<TxId>,
        amount: Decimal,
        wallet_type: WalletType,
    ) -> Self {
        let mut request =
            Self::base(owner, txid, amount, TransactionType::Adjustment, TransactionMethod::Manual);
        request.wallet_type = Some(wallet_type);
        request
    }

    /// Targets a single wallet type.
    #[must_use]
    pub fn with_wallet_type(mut self, wallet_type: WalletType) -> Self {
        self.wallet_type = Some(wallet_type);
        self
    }

    /// Sets the fee and recomputes `total` as amount plus fee.
    ///
    /// Call before [`with_total`](Self::with_total) when overriding both.
    #[must_use]
    pub fn with_platform_fee(mut self, fee: Decimal) -> Self {
        self.platform_fee = fee;
        self.total = self.amount + fee;
        self
    }

    /// Overrides the computed total.
    #[must_use]
    pub fn with_total(mut self, total: Decimal) -> Self {
        self.total = total;
        self
    }

    /// Sets the caller-facing description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the internal note.
    #[must_use]
    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }

    /// Keeps the resulting rows out of owner-facing listings.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    /// Sets the transaction method.
    #[must_use]
    pub fn with_method(mut self, method: TransactionMethod) -> Self {
        self.transaction_method = method;
        self
    }

    /// Sets the approval state recorded on the rows.
    #[must_use]
    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Records the counterparty owner.
    #[must_use]
    pub fn with_owner_from(mut self, owner_from: OwnerRef) -> Self {
        self.owner_from = Some(owner_from);
        self
    }

    /// Sets the destination crypto address.
    #[must_use]
    pub fn with_crypto_address(mut self, address: impl Into<String>) -> Self {
        self.crypto_address = Some(address.into());
        self
    }

    /// Sets the source crypto address.
    #[must_use]
    pub fn with_crypto_address_from(mut self, address: impl Into<String>) -> Self {
        self.crypto_address_from = Some(address.into());
        self
    }

    /// Records the USD price of the crypto currency at request time.
    #[must_use]
    pub fn with_price_usd(mut self, price: Decimal) -> Self {
        self.price_usd = price;
        self
    }

    /// Links the request to a profit distribution.
    #[must_use]
    pub fn with_profit_id(mut self, profit_id: Uuid) -> Self {
        self.profit_id = Some(profit_id);
        self
    }

    /// Marks the request as reversing an earlier transaction.
    #[must_use]
    pub fn with_recall_txid(mut self, txid: impl Into<TxId>) -> Self {
        self.recall_txid = Some(txid.into());
        self
    }

    /// Returns true when no wallet type is set and the operation should
    /// spread across all of the owner's wallets.
    #[must_use]
    pub fn is_multi_wallet(&self) -> bool {
        self.wallet_type.is_none()
    }

    /// Checks the fields every operation requires.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the reference is empty or the amount
    /// or total is not positive.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.txid.is_empty() {
            return Err(LedgerError::EmptyTxid);
        }
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(self.amount));
        }
        if self.total <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveTotal(self.total));
        }
        Ok(())
    }
}
