//! Owner set and confirmation threshold.

use std::collections::HashSet;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::errors::RegistryError;

/// The owners of a wallet and how many of them have to agree.
///
/// Invariant: owners are distinct and nonzero, there is at least one, and
/// `1 <= threshold <= owners.len()`. Every constructor and mutator checks the
/// resulting state before committing it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RegistrySnapshot", into = "RegistrySnapshot")]
pub struct OwnerRegistry {
    /// Owners in the order they were added.
    owners: Vec<Address>,
    index: HashSet<Address>,
    threshold: usize,
}

impl OwnerRegistry {
    pub fn new(owners: Vec<Address>, threshold: usize) -> Result<Self, RegistryError> {
        if owners.is_empty() {
            return Err(RegistryError::NoOwners);
        }

        let mut index = HashSet::with_capacity(owners.len());
        for owner in &owners {
            if owner.is_zero() {
                return Err(RegistryError::ZeroAddressOwner);
            }
            if !index.insert(*owner) {
                return Err(RegistryError::DuplicateOwner(*owner));
            }
        }

        check_threshold(threshold, owners.len())?;

        Ok(Self {
            owners,
            index,
            threshold,
        })
    }

    pub fn is_owner(&self, id: &Address) -> bool {
        self.index.contains(id)
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn owners(&self) -> &[Address] {
        &self.owners
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether the registry has no owners.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub(crate) fn add_owner(&mut self, owner: Address) -> Result<(), RegistryError> {
        if owner.is_zero() {
            return Err(RegistryError::ZeroAddressOwner);
        }
        if self.is_owner(&owner) {
            return Err(RegistryError::DuplicateOwner(owner));
        }

        self.owners.push(owner);
        self.index.insert(owner);
        Ok(())
    }

    pub(crate) fn remove_owner(&mut self, owner: Address) -> Result<(), RegistryError> {
        if !self.is_owner(&owner) {
            return Err(RegistryError::UnknownOwner(owner));
        }
        check_threshold(self.threshold, self.owners.len() - 1)?;

        self.owners.retain(|o| *o != owner);
        self.index.remove(&owner);
        Ok(())
    }

    /// Swaps `old` for `new` in place, keeping its position.
    pub(crate) fn replace_owner(&mut self, old: Address, new: Address) -> Result<(), RegistryError> {
        if !self.is_owner(&old) {
            return Err(RegistryError::UnknownOwner(old));
        }
        if new.is_zero() {
            return Err(RegistryError::ZeroAddressOwner);
        }
        if self.is_owner(&new) {
            return Err(RegistryError::DuplicateOwner(new));
        }

        for slot in self.owners.iter_mut().filter(|o| **o == old) {
            *slot = new;
        }
        self.index.remove(&old);
        self.index.insert(new);
        Ok(())
    }

    pub(crate) fn change_threshold(&mut self, threshold: usize) -> Result<(), RegistryError> {
        check_threshold(threshold, self.owners.len())?;
        self.threshold = threshold;
        Ok(())
    }
}

fn check_threshold(threshold: usize, owners: usize) -> Result<(), RegistryError> {
    if threshold == 0 || threshold > owners {
        return Err(RegistryError::InvalidThreshold { threshold, owners });
    }
    Ok(())
}

/// Serialized form, the index is rebuilt on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RegistrySnapshot {
    owners: Vec<Address>,
    threshold: usize,
}

impl TryFrom<RegistrySnapshot> for OwnerRegistry {
    type Error = RegistryError;

    fn try_from(value: RegistrySnapshot) -> Result<Self, Self::Error> {
        Self::new(value.owners, value.threshold)
    }
}

impl From<OwnerRegistry> for RegistrySnapshot {
    fn from(value: OwnerRegistry) -> Self {
        Self {
            owners: value.owners,
            threshold: value.threshold,
        }
    }
}
