//! Pluggable wallet policies.
//!
//! Two decisions are configuration, not core logic: how much a wallet of a
//! given type may hold (bounding multi-wallet deposit allocation), and which
//! wallet types are one-way sinks whose outbound transfers are absorbed
//! instead of credited. [`LedgerPolicy`] is the seam; [`StandardPolicy`] is
//! the table-driven implementation fed from [`LedgerConfig`].

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use tesora_shared::config::LedgerConfig;

use super::types::{Wallet, WalletType};

/// Policy hooks consulted by the ledger operations.
pub trait LedgerPolicy: Send + Sync {
    /// Maximum balance this wallet may hold; `None` means uncapped.
    fn max_capacity(&self, wallet: &Wallet) -> Option<Decimal>;

    /// Returns true when transfers out of this type absorb the funds
    /// instead of crediting the destination.
    fn is_sink(&self, wallet_type: WalletType) -> bool;
}

/// Table-driven policy: per-type caps and a sink set.
#[derive(Debug, Clone)]
pub struct StandardPolicy {
    caps: HashMap<WalletType, Decimal>,
    sink_types: HashSet<WalletType>,
}

impl StandardPolicy {
    /// Policy with the stock sink set (swing-trading and risk) and no caps.
    #[must_use]
    pub fn new() -> Self {
        Self {
            caps: HashMap::new(),
            sink_types: [WalletType::SwingTrading, WalletType::Risk].into_iter().collect(),
        }
    }

    /// Builds the policy from configuration.
    ///
    /// Type names that do not parse are skipped; a typo in configuration
    /// narrows the policy instead of failing startup.
    #[must_use]
    pub fn from_config(config: &LedgerConfig) -> Self {
        let sink_types = config
            .sink_wallet_types
            .iter()
            .filter_map(|s| s.parse::<WalletType>().ok())
            .collect();
        let caps = config
            .wallet_caps
            .iter()
            .filter_map(|(name, cap)| name.parse::<WalletType>().ok().map(|t| (t, *cap)))
            .collect();
        Self { caps, sink_types }
    }

    /// Caps one wallet type.
    #[must_use]
    pub fn with_cap(mut self, wallet_type: WalletType, cap: Decimal) -> Self {
        self.caps.insert(wallet_type, cap);
        self
    }

    /// Adds a sink type.
    #[must_use]
    pub fn with_sink(mut self, wallet_type: WalletType) -> Self {
        self.sink_types.insert(wallet_type);
        self
    }

    /// Replaces the sink set entirely.
    #[must_use]
    pub fn with_sinks(mut self, sinks: impl IntoIterator<Item = WalletType>) -> Self {
        self.sink_types = sinks.into_iter().collect();
        self
    }
}

impl Default for StandardPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerPolicy for StandardPolicy {
    fn max_capacity(&self, wallet: &Wallet) -> Option<Decimal> {
        self.caps.get(&wallet.wallet_type).copied()
    }

    fn is_sink(&self, wallet_type: WalletType) -> bool {
        self.sink_types.contains(&wallet_type)
    }
}
