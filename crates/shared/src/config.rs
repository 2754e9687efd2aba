//! Application configuration management.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger policy configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger policy configuration.
///
/// Drives the pluggable wallet policies: which wallet types absorb outbound
/// transfers without crediting a counterpart, and the per-type balance caps
/// that bound multi-wallet deposit allocation. Types are spelled in their
/// snake_case wire form (`"swing_trading"`); unknown names are ignored by the
/// policy layer rather than failing startup.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Wallet types that consume transferred-out funds (one-way sinks).
    #[serde(default = "default_sink_wallet_types")]
    pub sink_wallet_types: Vec<String>,
    /// Maximum balance per wallet type; types absent here are uncapped.
    #[serde(default)]
    pub wallet_caps: HashMap<String, Decimal>,
}

fn default_sink_wallet_types() -> Vec<String> {
    vec!["swing_trading".to_string(), "risk".to_string()]
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            sink_wallet_types: default_sink_wallet_types(),
            wallet_caps: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TESORA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ledger_config_defaults() {
        let cfg = LedgerConfig::default();
        assert_eq!(cfg.sink_wallet_types, vec!["swing_trading", "risk"]);
        assert!(cfg.wallet_caps.is_empty());
    }

    #[test]
    fn test_ledger_config_deserializes_caps() {
        let toml = r#"
            sink_wallet_types = ["risk"]

            [wallet_caps]
            cash = "5000.00"
            trading = "10000.00"
        "#;
        let cfg: LedgerConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.sink_wallet_types, vec!["risk"]);
        assert_eq!(cfg.wallet_caps.get("cash"), Some(&dec!(5000.00)));
        assert_eq!(cfg.wallet_caps.get("trading"), Some(&dec!(10000.00)));
    }

    #[test]
    fn test_database_config_defaults() {
        let toml = r#"url = "postgres://localhost/tesora_dev""#;
        let cfg: DatabaseConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.min_connections, 1);
    }
}
