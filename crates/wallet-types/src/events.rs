//! Notifications emitted by the wallet.

use std::fmt;

use alloy_primitives::{Address, LogData, U256};
use alloy_sol_types::SolEvent;
use serde::{Deserialize, Serialize};

use crate::id::TxId;

/// EVM log layouts for [`WalletEvent`].
pub mod abi {
    use alloy_sol_types::sol;

    sol! {
        /// A new proposal was recorded.
        event TransactionAdded(bytes32 indexed transactionId);

        /// Funds arrived through the plain transfer path.
        event Deposit(address indexed sender, uint256 value);

        /// The call behind a proposal went through.
        event ExecutionSuccess(bytes32 indexed transactionId);

        /// The call behind a proposal was rejected.
        event ExecutionFailure(bytes32 indexed transactionId);

        event OwnerAddition(address indexed owner);

        event OwnerRemoval(address indexed owner);

        event RequirementChange(uint256 required);
    }
}

/// Something observable the wallet did.
///
/// Each state-changing operation emits its events exactly once, in order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum WalletEvent {
    TransactionAdded(TxId),
    Deposit { sender: Address, amount: U256 },
    ExecutionSuccess(TxId),
    ExecutionFailure(TxId),
    OwnerAddition(Address),
    OwnerRemoval(Address),
    RequirementChange(usize),
}

impl WalletEvent {
    /// Returns the transaction this event is about, if any.
    pub fn tx_id(&self) -> Option<TxId> {
        match self {
            Self::TransactionAdded(id) | Self::ExecutionSuccess(id) | Self::ExecutionFailure(id) => {
                Some(*id)
            }
            _ => None,
        }
    }

    /// Encodes the event as EVM log topics and data.
    pub fn to_log_data(&self) -> LogData {
        match self {
            Self::TransactionAdded(id) => abi::TransactionAdded {
                transactionId: *id.inner(),
            }
            .encode_log_data(),
            Self::Deposit { sender, amount } => abi::Deposit {
                sender: *sender,
                value: *amount,
            }
            .encode_log_data(),
            Self::ExecutionSuccess(id) => abi::ExecutionSuccess {
                transactionId: *id.inner(),
            }
            .encode_log_data(),
            Self::ExecutionFailure(id) => abi::ExecutionFailure {
                transactionId: *id.inner(),
            }
            .encode_log_data(),
            Self::OwnerAddition(owner) => abi::OwnerAddition { owner: *owner }.encode_log_data(),
            Self::OwnerRemoval(owner) => abi::OwnerRemoval { owner: *owner }.encode_log_data(),
            Self::RequirementChange(required) => abi::RequirementChange {
                required: U256::from(*required),
            }
            .encode_log_data(),
        }
    }
}

impl fmt::Display for WalletEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransactionAdded(id) => write!(f, "TransactionAdded({id})"),
            Self::Deposit { sender, amount } => write!(f, "Deposit({sender}, {amount})"),
            Self::ExecutionSuccess(id) => write!(f, "ExecutionSuccess({id})"),
            Self::ExecutionFailure(id) => write!(f, "ExecutionFailure({id})"),
            Self::OwnerAddition(owner) => write!(f, "OwnerAddition({owner})"),
            Self::OwnerRemoval(owner) => write!(f, "OwnerRemoval({owner})"),
            Self::RequirementChange(required) => write!(f, "RequirementChange({required})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;

    use super::*;

    #[test]
    fn test_transaction_added_log_layout() {
        let id = TxId::from([7u8; 32]);
        let log = WalletEvent::TransactionAdded(id).to_log_data();

        assert_eq!(
            log.topics(),
            &[abi::TransactionAdded::SIGNATURE_HASH, *id.inner()]
        );
        assert!(log.data.is_empty());
    }

    #[test]
    fn test_deposit_log_layout() {
        let sender = Address::repeat_byte(0x11);
        let amount = U256::from(1234u64);
        let log = WalletEvent::Deposit { sender, amount }.to_log_data();

        assert_eq!(log.topics()[0], abi::Deposit::SIGNATURE_HASH);
        assert_eq!(log.topics()[1], B256::left_padding_from(sender.as_slice()));
        assert_eq!(log.data.as_ref(), &amount.to_be_bytes::<32>());
    }

    #[test]
    fn test_outcome_events_have_distinct_signatures() {
        let id = TxId::from([1u8; 32]);
        let ok = WalletEvent::ExecutionSuccess(id).to_log_data();
        let failed = WalletEvent::ExecutionFailure(id).to_log_data();

        assert_ne!(ok.topics()[0], failed.topics()[0]);
        assert_eq!(ok.topics()[1], failed.topics()[1]);
    }

    #[test]
    fn test_tx_id_only_for_transaction_events() {
        let id = TxId::from([2u8; 32]);
        assert_eq!(WalletEvent::ExecutionFailure(id).tx_id(), Some(id));
        assert_eq!(WalletEvent::OwnerRemoval(Address::ZERO).tx_id(), None);
    }
}
