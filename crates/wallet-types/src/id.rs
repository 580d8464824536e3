//! Transaction identifiers.

use std::{fmt, str::FromStr};

use alloy_primitives::{Address, B256, U256, hex::FromHexError, keccak256};
use serde::{Deserialize, Serialize};

use crate::impl_thin_wrapper;

/// Length of the packed preimage excluding the payload.
const FIXED_PREIMAGE_LEN: usize = 20 + 32 + 32;

/// Identifier of a proposed transaction.
///
/// This is both the ledger key and a commitment to the proposal contents, see
/// [`compute_tx_id`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(B256);

impl_thin_wrapper!(TxId => B256);

impl From<[u8; 32]> for TxId {
    fn from(value: [u8; 32]) -> Self {
        Self(B256::from(value))
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TxId {
    type Err = FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s).map(Self)
    }
}

/// Computes the id of a proposal.
///
/// The preimage is the tight packing of `target ‖ value ‖ payload ‖ timestamp`
/// with `value` and `timestamp` as 32-byte big-endian words, so the result is
/// the same as `keccak256(abi.encodePacked(target, value, payload, timestamp))`
/// over `(address, uint256, bytes, uint256)`.
///
/// Timestamps are taken as `u64` seconds and zero-extended to the 256-bit
/// word, so ids agree with the contract encoding for every timestamp up to
/// `u64::MAX`.
pub fn compute_tx_id(target: &Address, value: &U256, payload: &[u8], timestamp: u64) -> TxId {
    let mut buf = Vec::with_capacity(FIXED_PREIMAGE_LEN + payload.len());
    buf.extend_from_slice(target.as_slice());
    buf.extend_from_slice(&value.to_be_bytes::<32>());
    buf.extend_from_slice(payload);
    buf.extend_from_slice(&U256::from(timestamp).to_be_bytes::<32>());
    TxId(keccak256(&buf))
}
