use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::{Address, U256};
use msig_wallet::OwnerRegistry;
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

/// Default value for `address` in [`WalletConfig`].
const DEFAULT_WALLET_ADDRESS: Address = Address::repeat_byte(0xaa);

fn default_wallet_address() -> Address {
    DEFAULT_WALLET_ADDRESS
}

fn default_initial_funds() -> U256 {
    U256::ZERO
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Identity the wallet is deployed under. Calls targeting it are treated as
    /// governance calls.
    #[serde(default = "default_wallet_address")]
    pub address: Address,

    /// Owner identities, in registry order.
    pub owners: Vec<Address>,

    /// Confirmations needed before a transaction may run.
    pub threshold: usize,

    /// Balance credited at construction, in base units. Written as a decimal or
    /// `0x` string so it survives the 64-bit TOML integer limit.
    #[serde(default = "default_initial_funds")]
    pub initial_funds: U256,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Service label to append to the service name (e.g., "prod", "dev").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_label: Option<String>,

    /// Directory path for file-based logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Prefix for log file names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file_prefix: Option<String>,

    /// How often the log file rolls over. Only used with `log_dir`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_rotation: Option<LogRotation>,

    /// Use JSON format for logs instead of compact format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_format: Option<bool>,
}

/// Log file rotation schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub wallet: WalletConfig,

    /// Logging configuration (optional section in TOML).
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Reads, parses and validates a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the owner set and threshold before anything is deployed.
    pub fn validate(&self) -> ConfigResult<()> {
        OwnerRegistry::new(self.wallet.owners.clone(), self.wallet.threshold)?;
        Ok(())
    }
}
