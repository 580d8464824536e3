//! Outbound call descriptions and their outcomes.

use std::fmt;

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::id::{TxId, compute_tx_id};

/// A call the wallet makes on behalf of its owners once a proposal executes.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct OutboundCall {
    target: Address,
    value: U256,
    payload: Bytes,
}

impl OutboundCall {
    pub fn new(target: Address, value: U256, payload: Bytes) -> Self {
        Self {
            target,
            value,
            payload,
        }
    }

    /// Plain value transfer with no call data.
    pub fn transfer(target: Address, value: U256) -> Self {
        Self::new(target, value, Bytes::new())
    }

    pub fn target(&self) -> Address {
        self.target
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Computes the id this call would be proposed under at `timestamp`.
    pub fn compute_id(&self, timestamp: u64) -> TxId {
        compute_tx_id(&self.target, &self.value, &self.payload, timestamp)
    }
}

/// Terminal outcome of an executed transaction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ExecutionOutcome {
    /// The underlying call went through.
    Success,

    /// The underlying call was rejected or could not be funded.
    Failure,
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Failure => f.write_str("failure"),
        }
    }
}
