//! Error types for wallet operations.

use alloy_primitives::Address;
use msig_wallet_types::TxId;
use thiserror::Error;

pub type WalletResult<T> = Result<T, WalletError>;

/// Rejections of a requested operation.
///
/// Every variant is returned before any state is touched. A call that fails
/// during execution is not an error, see
/// [`ExecutionOutcome::Failure`](msig_wallet_types::ExecutionOutcome::Failure).
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("onlyOwner: not an owner!")]
    Unauthorized(Address),

    #[error("unknown transaction {0}")]
    NotFound(TxId),

    #[error("transaction {0} already executed")]
    AlreadyFinalized(TxId),

    /// Same proposal contents at the same timestamp.
    #[error("transaction {0} already proposed")]
    AlreadyProposed(TxId),

    #[error("owner {owner} already confirmed transaction {id}")]
    AlreadyConfirmed { id: TxId, owner: Address },

    #[error("owner {owner} has not confirmed transaction {id}")]
    NotConfirmed { id: TxId, owner: Address },

    #[error("transaction {id} has {have} of {need} required confirmations")]
    QuorumNotMet { id: TxId, have: usize, need: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] RegistryError),

    #[error("wallet balance overflow")]
    BalanceOverflow,
}

/// Violations of the owner set / threshold invariant.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RegistryError {
    #[error("owner set is empty")]
    NoOwners,

    #[error("zero address cannot be an owner")]
    ZeroAddressOwner,

    #[error("duplicate owner {0}")]
    DuplicateOwner(Address),

    #[error("{0} is not an owner")]
    UnknownOwner(Address),

    #[error("threshold {threshold} outside 1..={owners}")]
    InvalidThreshold { threshold: usize, owners: usize },
}

/// Inconsistencies found when loading a persisted wallet.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SnapshotError {
    #[error("transaction {0} stored more than once")]
    DuplicateTransaction(TxId),

    #[error("stored id {0} does not match the transaction contents")]
    IdMismatch(TxId),

    #[error("transaction {id} counts {count} confirmations but lists {confirmers}")]
    CountMismatch {
        id: TxId,
        count: usize,
        confirmers: usize,
    },

    #[error("transaction {0} has an outcome but is not executed")]
    OutcomeWithoutExecution(TxId),

    #[error("pending transaction {id} confirmed by non-owner {owner}")]
    NonOwnerConfirmation { id: TxId, owner: Address },
}
