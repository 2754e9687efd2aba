//! `SeaORM` entity for the wallets table.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use tesora_shared::types::{OwnerRef, WalletId};

use super::sea_orm_active_enums::{Currency, CurrencyKind, WalletStatus, WalletType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_kind: String,
    pub owner_id: Uuid,
    pub wallet_type: WalletType,
    pub currency: Currency,
    pub currency_kind: CurrencyKind,
    pub status: WalletStatus,
    pub balance: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for tesora_core::ledger::Wallet {
    fn from(model: Model) -> Self {
        Self {
            id: WalletId::from_uuid(model.id),
            owner: OwnerRef::new(model.owner_kind, model.owner_id),
            wallet_type: model.wallet_type.into(),
            currency: model.currency.into(),
            currency_kind: model.currency_kind.into(),
            status: model.status.into(),
            balance: model.balance,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
