//! Transaction records and confirmation bookkeeping.

use std::collections::{BTreeSet, HashMap};

use alloy_primitives::{Address, Bytes, U256};
use msig_wallet_types::{ExecutionOutcome, OutboundCall, TxId};
use serde::{Deserialize, Serialize};

use crate::errors::{SnapshotError, WalletError, WalletResult};

/// A proposed call plus its confirmation and execution state.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    id: TxId,
    call: OutboundCall,
    proposal_timestamp: u64,
    executed: bool,
    confirmation_count: usize,
    outcome: Option<ExecutionOutcome>,
}

impl TransactionRecord {
    pub(crate) fn new_proposed(call: OutboundCall, proposal_timestamp: u64) -> Self {
        Self {
            id: call.compute_id(proposal_timestamp),
            call,
            proposal_timestamp,
            executed: false,
            confirmation_count: 0,
            outcome: None,
        }
    }

    pub fn id(&self) -> TxId {
        self.id
    }

    pub fn call(&self) -> &OutboundCall {
        &self.call
    }

    pub fn target(&self) -> Address {
        self.call.target()
    }

    pub fn value(&self) -> U256 {
        self.call.value()
    }

    pub fn payload(&self) -> &Bytes {
        self.call.payload()
    }

    pub fn proposal_timestamp(&self) -> u64 {
        self.proposal_timestamp
    }

    pub fn executed(&self) -> bool {
        self.executed
    }

    pub fn confirmation_count(&self) -> usize {
        self.confirmation_count
    }

    /// Terminal outcome, set once the external call has returned.
    ///
    /// This can be `None` on an executed record only while its call is still
    /// in flight.
    pub fn outcome(&self) -> Option<ExecutionOutcome> {
        self.outcome
    }

    pub(crate) fn mark_executed(&mut self) {
        self.executed = true;
    }
}

/// One slot in the ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct LedgerEntry {
    record: TransactionRecord,
    confirmers: BTreeSet<Address>,
}

/// All transactions ever proposed to a wallet, in proposal order.
///
/// Records are never removed. For every entry the record's confirmation count
/// equals the number of confirmers.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<LedgerEntry>", into = "Vec<LedgerEntry>")]
pub(crate) struct Ledger {
    entries: Vec<LedgerEntry>,
    index: HashMap<TxId, usize>,
}

impl Ledger {
    /// Stores a fresh record, rejecting an id that is already taken.
    pub(crate) fn insert(&mut self, record: TransactionRecord) -> WalletResult<TxId> {
        let id = record.id();
        if self.index.contains_key(&id) {
            return Err(WalletError::AlreadyProposed(id));
        }

        self.index.insert(id, self.entries.len());
        self.entries.push(LedgerEntry {
            record,
            confirmers: BTreeSet::new(),
        });
        Ok(id)
    }

    pub(crate) fn get(&self, id: &TxId) -> Option<&TransactionRecord> {
        self.entry(id).map(|e| &e.record)
    }

    /// Gets a record that can still be acted upon.
    pub(crate) fn pending_mut(&mut self, id: &TxId) -> WalletResult<&mut TransactionRecord> {
        Ok(&mut self.pending_entry_mut(id)?.record)
    }

    pub(crate) fn set_outcome(&mut self, id: &TxId, outcome: ExecutionOutcome) {
        if let Some(entry) = self.entry_mut(id) {
            entry.record.outcome = Some(outcome);
        }
    }

    pub(crate) fn is_confirmed_by(&self, id: &TxId, owner: &Address) -> bool {
        self.entry(id).is_some_and(|e| e.confirmers.contains(owner))
    }

    /// Records a vote, returning the new count.
    pub(crate) fn add_confirmation(&mut self, id: &TxId, owner: Address) -> WalletResult<usize> {
        let entry = self.pending_entry_mut(id)?;
        if !entry.confirmers.insert(owner) {
            return Err(WalletError::AlreadyConfirmed { id: *id, owner });
        }

        entry.record.confirmation_count += 1;
        Ok(entry.record.confirmation_count)
    }

    /// Withdraws a vote, returning the new count.
    pub(crate) fn remove_confirmation(&mut self, id: &TxId, owner: Address) -> WalletResult<usize> {
        let entry = self.pending_entry_mut(id)?;
        if !entry.confirmers.remove(&owner) {
            return Err(WalletError::NotConfirmed { id: *id, owner });
        }

        entry.record.confirmation_count -= 1;
        Ok(entry.record.confirmation_count)
    }

    /// Withdraws every vote `owner` has on transactions that are still
    /// pending, returning how many were dropped.
    pub(crate) fn drop_pending_confirmations_by(&mut self, owner: &Address) -> usize {
        let mut dropped = 0;
        for entry in self.entries.iter_mut().filter(|e| !e.record.executed) {
            if entry.confirmers.remove(owner) {
                entry.record.confirmation_count -= 1;
                dropped += 1;
            }
        }
        dropped
    }

    pub(crate) fn confirmers(&self, id: &TxId) -> Vec<Address> {
        self.entry(id)
            .map(|e| e.confirmers.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Confirmations on transactions that are still pending, as `(id, owner)`.
    pub(crate) fn pending_confirmations(&self) -> impl Iterator<Item = (TxId, Address)> + '_ {
        self.entries
            .iter()
            .filter(|e| !e.record.executed)
            .flat_map(|e| e.confirmers.iter().map(move |owner| (e.record.id, *owner)))
    }

    /// Iterates over records in proposal order.
    pub(crate) fn records(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    fn entry(&self, id: &TxId) -> Option<&LedgerEntry> {
        self.index.get(id).map(|i| &self.entries[*i])
    }

    fn entry_mut(&mut self, id: &TxId) -> Option<&mut LedgerEntry> {
        self.index.get(id).map(|i| &mut self.entries[*i])
    }

    fn pending_entry_mut(&mut self, id: &TxId) -> WalletResult<&mut LedgerEntry> {
        let entry = self.entry_mut(id).ok_or(WalletError::NotFound(*id))?;
        if entry.record.executed {
            return Err(WalletError::AlreadyFinalized(*id));
        }
        Ok(entry)
    }
}

impl TryFrom<Vec<LedgerEntry>> for Ledger {
    type Error = SnapshotError;

    fn try_from(entries: Vec<LedgerEntry>) -> Result<Self, Self::Error> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let record = &entry.record;
            let id = record.id;

            if record.call.compute_id(record.proposal_timestamp) != id {
                return Err(SnapshotError::IdMismatch(id));
            }
            if record.confirmation_count != entry.confirmers.len() {
                return Err(SnapshotError::CountMismatch {
                    id,
                    count: record.confirmation_count,
                    confirmers: entry.confirmers.len(),
                });
            }
            if record.outcome.is_some() && !record.executed {
                return Err(SnapshotError::OutcomeWithoutExecution(id));
            }
            if index.insert(id, i).is_some() {
                return Err(SnapshotError::DuplicateTransaction(id));
            }
        }

        Ok(Self { entries, index })
    }
}

impl From<Ledger> for Vec<LedgerEntry> {
    fn from(value: Ledger) -> Self {
        value.entries
    }
}
