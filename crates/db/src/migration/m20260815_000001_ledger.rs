//! Initial ledger migration.
//!
//! Creates the enum types and the three ledger tables, with the constraints
//! the operations lean on: one wallet per (owner, type), one transaction row
//! per (txid, wallet type), and non-negative balances.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(WALLETS_SQL).await?;
        db.execute_unprepared(WALLET_TRANSACTIONS_SQL).await?;
        db.execute_unprepared(WALLET_CRYPTO_TRANSACTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Wallet buckets
CREATE TYPE wallet_type AS ENUM (
    'cash',
    'trading',
    'swing_trading',
    'risk',
    'commission'
);

-- Wallet lifecycle
CREATE TYPE wallet_status AS ENUM ('active', 'suspended', 'closed');

-- Recorded currencies (the ledger never converts)
CREATE TYPE currency AS ENUM ('USD', 'EUR', 'GBP', 'BTC', 'ETH', 'USDT');

-- Fiat vs crypto denomination
CREATE TYPE currency_kind AS ENUM ('fiat', 'crypto');

-- Ledger effect kind
CREATE TYPE transaction_type AS ENUM (
    'deposit',
    'withdraw',
    'transfer',
    'adjustment'
);

-- Payment channel
CREATE TYPE transaction_method AS ENUM (
    'manual',
    'gateway',
    'bank_transfer',
    'internal',
    'crypto'
);

-- Approval state
CREATE TYPE transaction_status AS ENUM ('pending', 'approved', 'declined');
";

const WALLETS_SQL: &str = r"
CREATE TABLE wallets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_kind VARCHAR(50) NOT NULL,
    owner_id UUID NOT NULL,
    wallet_type wallet_type NOT NULL,
    currency currency NOT NULL,
    currency_kind currency_kind NOT NULL,
    status wallet_status NOT NULL DEFAULT 'active',
    balance NUMERIC(28, 8) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_wallet_owner_type UNIQUE (owner_kind, owner_id, wallet_type),
    CONSTRAINT chk_balance_non_negative CHECK (balance >= 0)
);

CREATE INDEX idx_wallets_owner ON wallets(owner_kind, owner_id);
";

const WALLET_TRANSACTIONS_SQL: &str = r"
CREATE TABLE wallet_transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_kind VARCHAR(50) NOT NULL,
    owner_id UUID NOT NULL,
    owner_from_kind VARCHAR(50),
    owner_from_id UUID,
    txid VARCHAR(100) NOT NULL,
    amount NUMERIC(28, 8) NOT NULL,
    platform_fee NUMERIC(28, 8) NOT NULL DEFAULT 0,
    total NUMERIC(28, 8) NOT NULL,
    description TEXT,
    remark TEXT,
    is_hidden BOOLEAN NOT NULL DEFAULT false,
    wallet_type wallet_type NOT NULL,
    from_wallet_type wallet_type,
    currency currency NOT NULL,
    currency_kind currency_kind NOT NULL,
    transaction_type transaction_type NOT NULL,
    transaction_method transaction_method NOT NULL,
    status transaction_status NOT NULL DEFAULT 'approved',
    profit_id UUID,
    recall_txid VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_wtxn_txid_wallet UNIQUE (txid, wallet_type),
    CONSTRAINT chk_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_total_positive CHECK (total > 0)
);

CREATE INDEX idx_wtxn_owner_created ON wallet_transactions(owner_kind, owner_id, created_at DESC);
CREATE INDEX idx_wtxn_txid ON wallet_transactions(txid);
";

const WALLET_CRYPTO_TRANSACTIONS_SQL: &str = r"
CREATE TABLE wallet_crypto_transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    transaction_id UUID NOT NULL REFERENCES wallet_transactions(id) ON DELETE CASCADE,
    txid VARCHAR(100) NOT NULL,
    address VARCHAR(255) NOT NULL,
    address_from VARCHAR(255),
    price_usd NUMERIC(19, 4) NOT NULL DEFAULT 0,
    currency currency NOT NULL,
    transaction_type transaction_type NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_wctxn_transaction ON wallet_crypto_transactions(transaction_id);
CREATE INDEX idx_wctxn_txid ON wallet_crypto_transactions(txid);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS wallet_crypto_transactions CASCADE;
DROP TABLE IF EXISTS wallet_transactions CASCADE;
DROP TABLE IF EXISTS wallets CASCADE;

DROP TYPE IF EXISTS transaction_status;
DROP TYPE IF EXISTS transaction_method;
DROP TYPE IF EXISTS transaction_type;
DROP TYPE IF EXISTS currency_kind;
DROP TYPE IF EXISTS currency;
DROP TYPE IF EXISTS wallet_status;
DROP TYPE IF EXISTS wallet_type;
";
