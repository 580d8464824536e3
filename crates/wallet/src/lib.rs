//! Multi-owner custody wallet.
//!
//! A fixed set of owners controls a balance and can make arbitrary outbound
//! calls once enough of them confirm. The flow for any action is:
//!
//! 1. an owner proposes it with [`Wallet::add_transaction`],
//! 2. owners vote with [`Wallet::confirm_transaction`] (and may take their vote
//!    back with [`Wallet::cancel_confirmation`]),
//! 3. any owner runs [`Wallet::execute_transaction`] once the threshold is met.
//!
//! Execution happens exactly once per transaction. The record is finalized
//! before the call is handed to the [`CallExecutor`], so a callee that calls
//! back into the wallet can't execute the same transaction again.
//!
//! Owner set and threshold changes are proposed like any other call, targeting
//! the wallet's own address, see [`RegistryChange`](msig_wallet_types::RegistryChange).

mod errors;
mod executor;
mod governance;
mod ledger;
mod output;
mod registry;
mod sim;
mod wallet;

#[cfg(test)]
mod test_utils;

pub use errors::{RegistryError, SnapshotError, WalletError, WalletResult};
pub use executor::{CallExecutor, CallStatus};
pub use ledger::TransactionRecord;
pub use registry::OwnerRegistry;
pub use sim::SimulatedLedger;
pub use wallet::{Wallet, WalletParams};
