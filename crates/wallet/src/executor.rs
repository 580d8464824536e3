//! The seam between the wallet and whatever actually carries out calls.

use msig_wallet_types::{ExecutionOutcome, OutboundCall};

use crate::wallet::Wallet;

/// Status reported by the hosting environment for an outbound call.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CallStatus {
    Success,
    Reverted,
}

impl CallStatus {
    pub fn is_reverted(&self) -> bool {
        matches!(self, Self::Reverted)
    }
}

impl From<CallStatus> for ExecutionOutcome {
    fn from(value: CallStatus) -> Self {
        match value {
            CallStatus::Success => ExecutionOutcome::Success,
            CallStatus::Reverted => ExecutionOutcome::Failure,
        }
    }
}

/// Performs outbound calls for a wallet.
///
/// By the time this is invoked the wallet has already finalized the
/// transaction and debited `call.value()` from its balance. The executor gets
/// the wallet back mutably so the callee can call into it again before
/// returning, just like a contract call can reenter its caller.
///
/// Failures are reported through [`CallStatus::Reverted`], never by
/// panicking.
pub trait CallExecutor {
    fn perform_call(&mut self, wallet: &mut Wallet, call: &OutboundCall) -> CallStatus;
}
