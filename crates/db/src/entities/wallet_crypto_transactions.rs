//! `SeaORM` entity for the wallet_crypto_transactions table.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tesora_shared::types::{TransactionId, TxId};

use super::sea_orm_active_enums::{Currency, TransactionType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallet_crypto_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub txid: String,
    pub address: String,
    pub address_from: Option<String>,
    pub price_usd: Decimal,
    pub currency: Currency,
    pub transaction_type: TransactionType,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallet_transactions::Entity",
        from = "Column::TransactionId",
        to = "super::wallet_transactions::Column::Id"
    )]
    WalletTransactions,
}

impl Related<super::wallet_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WalletTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for tesora_core::ledger::CryptoTransaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            transaction_id: TransactionId::from_uuid(model.transaction_id),
            txid: TxId::new(model.txid),
            address: model.address,
            address_from: model.address_from,
            price_usd: model.price_usd,
            currency: model.currency.into(),
            transaction_type: model.transaction_type.into(),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
