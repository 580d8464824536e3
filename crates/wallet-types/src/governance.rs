//! Registry changes carried as self-calls.
//!
//! Owners change the owner set or the threshold by proposing a transaction
//! that targets the wallet itself with one of these calls as payload, so every
//! registry change goes through the same quorum as any other action.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolInterface, sol};
use serde::{Deserialize, Serialize};

sol! {
    /// Calls the wallet accepts from itself.
    interface IWalletGovernance {
        function addOwner(address owner);
        function removeOwner(address owner);
        function replaceOwner(address owner, address newOwner);
        function changeRequirement(uint256 required);
    }
}

use IWalletGovernance::IWalletGovernanceCalls;

/// Decoded registry change.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RegistryChange {
    AddOwner(Address),
    RemoveOwner(Address),
    ReplaceOwner { old: Address, new: Address },
    ChangeRequirement(usize),
}

impl RegistryChange {
    /// Decodes a self-call payload, returning `None` if it isn't one of the
    /// governance calls.
    pub fn decode(payload: &[u8]) -> Option<Self> {
        let call = IWalletGovernanceCalls::abi_decode(payload).ok()?;
        Some(match call {
            IWalletGovernanceCalls::addOwner(c) => Self::AddOwner(c.owner),
            IWalletGovernanceCalls::removeOwner(c) => Self::RemoveOwner(c.owner),
            IWalletGovernanceCalls::replaceOwner(c) => Self::ReplaceOwner {
                old: c.owner,
                new: c.newOwner,
            },
            // Anything that doesn't fit can never be a valid threshold anyway.
            IWalletGovernanceCalls::changeRequirement(c) => {
                Self::ChangeRequirement(c.required.saturating_to::<usize>())
            }
        })
    }

    /// Encodes the change as call data for a self-targeted proposal.
    pub fn encode(&self) -> Bytes {
        let raw = match *self {
            Self::AddOwner(owner) => IWalletGovernance::addOwnerCall { owner }.abi_encode(),
            Self::RemoveOwner(owner) => IWalletGovernance::removeOwnerCall { owner }.abi_encode(),
            Self::ReplaceOwner { old, new } => IWalletGovernance::replaceOwnerCall {
                owner: old,
                newOwner: new,
            }
            .abi_encode(),
            Self::ChangeRequirement(required) => IWalletGovernance::changeRequirementCall {
                required: U256::from(required),
            }
            .abi_encode(),
        };
        Bytes::from(raw)
    }
}
