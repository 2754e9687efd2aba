//! Conversion tests between the persistence models and the domain types.
//!
//! The active enums' `string_value` forms must agree with the domain wire
//! forms, otherwise rows written through one family would not parse back
//! through the other.

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::ActiveEnum;
use tesora_core::ledger;
use uuid::Uuid;

use super::sea_orm_active_enums as db;
use super::{wallet_transactions, wallets};

#[test]
fn test_wallet_type_wire_forms_agree() {
    for &value in ledger::WalletType::values() {
        let stored = db::WalletType::from(value);
        assert_eq!(stored.to_value(), value.to_string());
        assert_eq!(ledger::WalletType::from(stored), value);
    }
}

#[test]
fn test_wallet_status_wire_forms_agree() {
    for &value in ledger::WalletStatus::values() {
        let stored = db::WalletStatus::from(value);
        assert_eq!(stored.to_value(), value.to_string());
        assert_eq!(ledger::WalletStatus::from(stored), value);
    }
}

#[test]
fn test_currency_wire_forms_agree() {
    for &value in ledger::Currency::values() {
        let stored = db::Currency::from(value);
        assert_eq!(stored.to_value(), value.to_string());
        assert_eq!(ledger::Currency::from(stored), value);
    }
}

#[test]
fn test_currency_kind_wire_forms_agree() {
    for &value in ledger::CurrencyKind::values() {
        let stored = db::CurrencyKind::from(value);
        assert_eq!(stored.to_value(), value.to_string());
        assert_eq!(ledger::CurrencyKind::from(stored), value);
    }
}

#[test]
fn test_transaction_type_wire_forms_agree() {
    for &value in ledger::TransactionType::values() {
        let stored = db::TransactionType::from(value);
        assert_eq!(stored.to_value(), value.to_string());
        assert_eq!(ledger::TransactionType::from(stored), value);
    }
}

#[test]
fn test_transaction_method_wire_forms_agree() {
    for &value in ledger::TransactionMethod::values() {
        let stored = db::TransactionMethod::from(value);
        assert_eq!(stored.to_value(), value.to_string());
        assert_eq!(ledger::TransactionMethod::from(stored), value);
    }
}

#[test]
fn test_transaction_status_wire_forms_agree() {
    for &value in ledger::TransactionStatus::values() {
        let stored = db::TransactionStatus::from(value);
        assert_eq!(stored.to_value(), value.to_string());
        assert_eq!(ledger::TransactionStatus::from(stored), value);
    }
}

#[test]
fn test_wallet_model_converts_to_domain() {
    let id = Uuid::now_v7();
    let owner_id = Uuid::new_v4();
    let now = Utc::now().fixed_offset();
    let model = wallets::Model {
        id,
        owner_kind: "merchant".to_string(),
        owner_id,
        wallet_type: db::WalletType::Trading,
        currency: db::Currency::Btc,
        currency_kind: db::CurrencyKind::Crypto,
        status: db::WalletStatus::Suspended,
        balance: dec!(1.25),
        created_at: now,
        updated_at: now,
    };

    let wallet = ledger::Wallet::from(model);
    assert_eq!(wallet.id.into_inner(), id);
    assert_eq!(wallet.owner.kind, "merchant");
    assert_eq!(wallet.owner.id, owner_id);
    assert_eq!(wallet.wallet_type, ledger::WalletType::Trading);
    assert_eq!(wallet.currency, ledger::Currency::Btc);
    assert_eq!(wallet.currency_kind, ledger::CurrencyKind::Crypto);
    assert_eq!(wallet.status, ledger::WalletStatus::Suspended);
    assert_eq!(wallet.balance, dec!(1.25));
}

fn transaction_model() -> wallet_transactions::Model {
    wallet_transactions::Model {
        id: Uuid::now_v7(),
        owner_kind: "user".to_string(),
        owner_id: Uuid::new_v4(),
        owner_from_kind: None,
        owner_from_id: None,
        txid: "conv-1".to_string(),
        amount: dec!(10),
        platform_fee: dec!(0),
        total: dec!(10),
        description: None,
        remark: None,
        is_hidden: false,
        wallet_type: db::WalletType::Cash,
        from_wallet_type: None,
        currency: db::Currency::Usd,
        currency_kind: db::CurrencyKind::Fiat,
        transaction_type: db::TransactionType::Deposit,
        transaction_method: db::TransactionMethod::Gateway,
        status: db::TransactionStatus::Approved,
        profit_id: None,
        recall_txid: None,
        created_at: Utc::now().fixed_offset(),
    }
}

#[test]
fn test_transaction_counterparty_needs_both_columns() {
    // A half-written (kind, id) pair is treated as no counterparty.
    let mut model = transaction_model();
    model.owner_from_kind = Some("user".to_string());
    let converted = ledger::Transaction::from(model);
    assert!(converted.owner_from.is_none());

    let from_id = Uuid::new_v4();
    let mut model = transaction_model();
    model.owner_from_kind = Some("user".to_string());
    model.owner_from_id = Some(from_id);
    let converted = ledger::Transaction::from(model);
    let counterparty = converted.owner_from.unwrap();
    assert_eq!(counterparty.kind, "user");
    assert_eq!(counterparty.id, from_id);
}

#[test]
fn test_transaction_model_keeps_optional_fields() {
    let mut model = transaction_model();
    model.from_wallet_type = Some(db::WalletType::Risk);
    model.recall_txid = Some("conv-0".to_string());
    model.transaction_type = db::TransactionType::Transfer;

    let converted = ledger::Transaction::from(model);
    assert_eq!(converted.from_wallet_type, Some(ledger::WalletType::Risk));
    assert_eq!(converted.recall_txid.as_ref().map(|t| t.as_str()), Some("conv-0"));
    assert_eq!(converted.transaction_type, ledger::TransactionType::Transfer);
    assert_eq!(converted.txid.as_str(), "conv-1");
}
