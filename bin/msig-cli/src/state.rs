//! On-disk wallet state shared between invocations.

use std::{fs, path::Path};

use anyhow::Context;
use msig_config::LoggingConfig;
use msig_wallet::{SimulatedLedger, Wallet};
use serde::{Deserialize, Serialize};

/// Everything a subcommand needs: the wallet, the ledger it pays into and the
/// logging setup chosen at `init`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CliState {
    pub(crate) wallet: Wallet,
    pub(crate) ledger: SimulatedLedger,
    #[serde(default)]
    pub(crate) logging: LoggingConfig,
}

impl CliState {
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read state file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("corrupt state file {}", path.display()))
    }

    /// Writes the state next to `path` first and renames it over, so an
    /// interrupted write never leaves a truncated file behind.
    pub(crate) fn save(&self, path: &Path) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("failed to replace state file {}", path.display()))?;
        Ok(())
    }
}
