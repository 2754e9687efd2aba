//! `SeaORM` entity for the wallet_transactions table.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tesora_shared::types::{OwnerRef, TransactionId, TxId};

use super::sea_orm_active_enums::{
    Currency, CurrencyKind, TransactionMethod, TransactionStatus, TransactionType, WalletType,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallet_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_kind: String,
    pub owner_id: Uuid,
    pub owner_from_kind: Option<String>,
    pub owner_from_id: Option<Uuid>,
    pub txid: String,
    pub amount: Decimal,
    pub platform_fee: Decimal,
    pub total: Decimal,
    pub description: Option<String>,
    pub remark: Option<String>,
    pub is_hidden: bool,
    pub wallet_type: WalletType,
    pub from_wallet_type: Option<WalletType>,
    pub currency: Currency,
    pub currency_kind: CurrencyKind,
    pub transaction_type: TransactionType,
    pub transaction_method: TransactionMethod,
    pub status: TransactionStatus,
    pub profit_id: Option<Uuid>,
    pub recall_txid: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::wallet_crypto_transactions::Entity")]
    WalletCryptoTransactions,
}

impl Related<super::wallet_crypto_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WalletCryptoTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for tesora_core::ledger::Transaction {
    fn from(model: Model) -> Self {
        let owner_from = match (model.owner_from_kind, model.owner_from_id) {
            (Some(kind), Some(id)) => Some(OwnerRef::new(kind, id)),
            _ => None,
        };
        Self {
            id: TransactionId::from_uuid(model.id),
            owner: OwnerRef::new(model.owner_kind, model.owner_id),
            owner_from,
            txid: TxId::new(model.txid),
            amount: model.amount,
            platform_fee: model.platform_fee,
            total: model.total,
            description: model.description,
            remark: model.remark,
            is_hidden: model.is_hidden,
            wallet_type: model.wallet_type.into(),
            from_wallet_type: model.from_wallet_type.map(Into::into),
            currency: model.currency.into(),
            currency_kind: model.currency_kind.into(),
            transaction_type: model.transaction_type.into(),
            transaction_method: model.transaction_method.into(),
            status: model.status.into(),
            profit_id: model.profit_id,
            recall_txid: model.recall_txid.map(TxId::new),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
