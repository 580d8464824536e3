//! In-memory stand-in for the hosting ledger.

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{Address, U256};
use msig_wallet_types::OutboundCall;
use serde::{Deserialize, Serialize};
use tracing::*;

use crate::{
    executor::{CallExecutor, CallStatus},
    wallet::Wallet,
};

/// Tracks balances of the accounts a wallet pays out to.
///
/// Every call to a target not marked as rejecting succeeds and credits the
/// target with the call's value. Payloads are recorded but not interpreted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimulatedLedger {
    balances: BTreeMap<Address, U256>,
    rejecting: BTreeSet<Address>,
    delivered: Vec<OutboundCall>,
}

impl SimulatedLedger {
    pub fn balance_of(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Makes every later call to `target` revert.
    pub fn reject_calls_to(&mut self, target: Address) {
        self.rejecting.insert(target);
    }

    pub fn accept_calls_to(&mut self, target: &Address) {
        self.rejecting.remove(target);
    }

    /// Calls that went through, in order.
    pub fn delivered(&self) -> &[OutboundCall] {
        &self.delivered
    }
}

impl CallExecutor for SimulatedLedger {
    fn perform_call(&mut self, _wallet: &mut Wallet, call: &OutboundCall) -> CallStatus {
        let target = call.target();
        if self.rejecting.contains(&target) {
            debug!(dest = %target, "simulated call reverted");
            return CallStatus::Reverted;
        }

        let balance = self.balances.entry(target).or_default();
        let Some(credited) = balance.checked_add(call.value()) else {
            return CallStatus::Reverted;
        };
        *balance = credited;

        self.delivered.push(call.clone());
        CallStatus::Success
    }
}
