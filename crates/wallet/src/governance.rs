//! Registry changes applied through quorum-approved self-calls.

use alloy_primitives::Address;
use msig_wallet_types::{RegistryChange, WalletEvent};
use tracing::*;

use crate::{errors::RegistryError, executor::CallStatus, wallet::Wallet};

impl Wallet {
    /// Decodes and applies a self-call payload.
    ///
    /// Undecodable payloads and changes that would break the registry
    /// invariant revert, leaving the registry as it was.
    pub(crate) fn apply_governance_payload(&mut self, payload: &[u8]) -> CallStatus {
        let Some(change) = RegistryChange::decode(payload) else {
            warn!(len = payload.len(), "unrecognized self-call payload");
            return CallStatus::Reverted;
        };

        match self.apply_registry_change(change) {
            Ok(()) => {
                info!(?change, "applied registry change");
                CallStatus::Success
            }
            Err(e) => {
                warn!(?change, %e, "rejected registry change");
                CallStatus::Reverted
            }
        }
    }

    fn apply_registry_change(&mut self, change: RegistryChange) -> Result<(), RegistryError> {
        match change {
            RegistryChange::AddOwner(owner) => {
                self.registry_mut().add_owner(owner)?;
                self.emit(WalletEvent::OwnerAddition(owner));
            }

            RegistryChange::RemoveOwner(owner) => {
                self.registry_mut().remove_owner(owner)?;
                self.drop_confirmations_of(owner);
                self.emit(WalletEvent::OwnerRemoval(owner));
            }

            RegistryChange::ReplaceOwner { old, new } => {
                self.registry_mut().replace_owner(old, new)?;
                self.drop_confirmations_of(old);
                self.emit(WalletEvent::OwnerRemoval(old));
                self.emit(WalletEvent::OwnerAddition(new));
            }

            RegistryChange::ChangeRequirement(required) => {
                self.registry_mut().change_threshold(required)?;
                self.emit(WalletEvent::RequirementChange(required));
            }
        }

        Ok(())
    }

    /// Former owners must not keep counting towards pending transactions.
    fn drop_confirmations_of(&mut self, owner: Address) {
        let dropped = self.ledger_mut().drop_pending_confirmations_by(&owner);
        if dropped > 0 {
            debug!(%owner, dropped, "dropped confirmations of removed owner");
        }
    }
}
