//! TOML configuration for wallet deployments.

mod config;
mod errors;

pub use config::{Config, LogRotation, LoggingConfig, WalletConfig};
pub use errors::{ConfigError, ConfigResult};
