//! Shared types for the multi-owner wallet.
//!
//! Everything here is plain data: identifiers, call descriptions, events and
//! the registry-change call encoding. The state machine lives in
//! `msig-wallet`.

mod call;
mod events;
mod governance;
mod id;
mod macros;

pub use alloy_primitives::{Address, Bytes, U256};
pub use call::{ExecutionOutcome, OutboundCall};
pub use events::{WalletEvent, abi};
pub use governance::{IWalletGovernance, RegistryChange};
pub use id::{TxId, compute_tx_id};
