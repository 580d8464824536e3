//! The wallet aggregate and its operations.

use alloy_primitives::{Address, Bytes, U256};
use msig_wallet_types::{ExecutionOutcome, OutboundCall, TxId, WalletEvent};
use serde::{Deserialize, Serialize};
use tracing::*;

use crate::{
    errors::{SnapshotError, WalletError, WalletResult},
    executor::{CallExecutor, CallStatus},
    ledger::{Ledger, TransactionRecord},
    output::EventBuffer,
    registry::OwnerRegistry,
};

/// Parameters a wallet is created with.
#[derive(Clone, Debug)]
pub struct WalletParams {
    /// The wallet's own address, calls targeting it are registry changes.
    pub address: Address,

    pub owners: Vec<Address>,

    /// Confirmations needed before a transaction may execute.
    pub threshold: usize,
}

/// A multi-owner wallet: owner registry, transaction ledger and balance.
///
/// Every operation either fails without changing anything or applies all of
/// its effects. Events are buffered until the host drains them with
/// [`Self::take_events`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "WalletSnapshot", into = "WalletSnapshot")]
pub struct Wallet {
    address: Address,
    registry: OwnerRegistry,
    ledger: Ledger,
    balance: U256,
    events: EventBuffer,
}

/// Persisted form of a [`Wallet`]. Buffered events are not part of it.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct WalletSnapshot {
    address: Address,
    registry: OwnerRegistry,
    ledger: Ledger,
    balance: U256,
}

impl TryFrom<WalletSnapshot> for Wallet {
    type Error = SnapshotError;

    fn try_from(value: WalletSnapshot) -> Result<Self, Self::Error> {
        let WalletSnapshot {
            address,
            registry,
            ledger,
            balance,
        } = value;

        // Votes of former owners are dropped from pending transactions when
        // they leave, so any left over mean the snapshot was altered.
        if let Some((id, owner)) = ledger
            .pending_confirmations()
            .find(|(_, owner)| !registry.is_owner(owner))
        {
            return Err(SnapshotError::NonOwnerConfirmation { id, owner });
        }

        Ok(Self {
            address,
            registry,
            ledger,
            balance,
            events: EventBuffer::default(),
        })
    }
}

impl From<Wallet> for WalletSnapshot {
    fn from(value: Wallet) -> Self {
        Self {
            address: value.address,
            registry: value.registry,
            ledger: value.ledger,
            balance: value.balance,
        }
    }
}

impl Wallet {
    /// Creates a wallet funded with `initial_funds`.
    pub fn new(params: WalletParams, initial_funds: U256) -> WalletResult<Self> {
        let registry = OwnerRegistry::new(params.owners, params.threshold)?;

        info!(
            address = %params.address,
            owners = registry.len(),
            threshold = registry.threshold(),
            %initial_funds,
            "created wallet"
        );

        Ok(Self {
            address: params.address,
            registry,
            ledger: Ledger::default(),
            balance: initial_funds,
            events: EventBuffer::default(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn balance(&self) -> U256 {
        self.balance
    }

    pub fn registry(&self) -> &OwnerRegistry {
        &self.registry
    }

    pub fn owners(&self) -> &[Address] {
        self.registry.owners()
    }

    pub fn is_owner(&self, id: &Address) -> bool {
        self.registry.is_owner(id)
    }

    pub fn confirmations_required(&self) -> usize {
        self.registry.threshold()
    }

    pub fn transaction(&self, id: &TxId) -> Option<&TransactionRecord> {
        self.ledger.get(id)
    }

    /// Whether `owner` currently confirms `id`.
    pub fn confirmations(&self, id: &TxId, owner: &Address) -> bool {
        self.ledger.is_confirmed_by(id, owner)
    }

    /// Owners currently confirming `id`.
    pub fn confirmers(&self, id: &TxId) -> Vec<Address> {
        self.ledger.confirmers(id)
    }

    /// Whether `id` has enough confirmations to execute right now.
    pub fn is_confirmed(&self, id: &TxId) -> bool {
        self.ledger
            .get(id)
            .is_some_and(|r| r.confirmation_count() >= self.registry.threshold())
    }

    /// Ids of proposals in the order they were made, filtered by state.
    pub fn transaction_ids(&self, include_pending: bool, include_executed: bool) -> Vec<TxId> {
        self.ledger
            .records()
            .filter(|r| (include_pending && !r.executed()) || (include_executed && r.executed()))
            .map(|r| r.id())
            .collect()
    }

    pub fn transaction_count(&self, include_pending: bool, include_executed: bool) -> usize {
        self.transaction_ids(include_pending, include_executed).len()
    }

    /// Events emitted since the last drain.
    pub fn pending_events(&self) -> &[WalletEvent] {
        self.events.pending()
    }

    pub fn take_events(&mut self) -> Vec<WalletEvent> {
        self.events.take()
    }

    /// Accepts an inbound transfer from anyone.
    pub fn receive(&mut self, sender: Address, amount: U256) -> WalletResult<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(WalletError::BalanceOverflow)?;

        debug!(%sender, %amount, balance = %self.balance, "received deposit");
        self.events.emit(WalletEvent::Deposit { sender, amount });
        Ok(())
    }

    /// Proposes a call. The proposer still has to confirm it separately.
    pub fn add_transaction(
        &mut self,
        caller: Address,
        target: Address,
        value: U256,
        payload: Bytes,
        proposal_timestamp: u64,
    ) -> WalletResult<TxId> {
        self.ensure_owner(&caller)?;

        let call = OutboundCall::new(target, value, payload);
        let record = TransactionRecord::new_proposed(call, proposal_timestamp);
        let id = self.ledger.insert(record)?;

        info!(%id, %caller, dest = %target, %value, "added transaction");
        self.events.emit(WalletEvent::TransactionAdded(id));
        Ok(id)
    }

    pub fn confirm_transaction(&mut self, caller: Address, id: TxId) -> WalletResult<()> {
        self.ensure_owner(&caller)?;

        let count = self.ledger.add_confirmation(&id, caller)?;
        debug!(%id, %caller, count, need = self.registry.threshold(), "confirmed transaction");
        Ok(())
    }

    pub fn cancel_confirmation(&mut self, caller: Address, id: TxId) -> WalletResult<()> {
        self.ensure_owner(&caller)?;

        let count = self.ledger.remove_confirmation(&id, caller)?;
        debug!(%id, %caller, count, "revoked confirmation");
        Ok(())
    }

    /// Executes a confirmed transaction.
    ///
    /// Once the quorum check passes the transaction is finalized for good,
    /// whatever the call does. A rejected call is reported as
    /// [`ExecutionOutcome::Failure`], not as an error.
    pub fn execute_transaction<E: CallExecutor + ?Sized>(
        &mut self,
        caller: Address,
        id: TxId,
        executor: &mut E,
    ) -> WalletResult<ExecutionOutcome> {
        self.ensure_owner(&caller)?;

        let need = self.registry.threshold();
        let record = self.ledger.pending_mut(&id)?;
        let have = record.confirmation_count();
        if have < need {
            return Err(WalletError::QuorumNotMet { id, have, need });
        }

        // Must be committed before the call goes out, reentrant executions of
        // the same id are rejected on this flag.
        record.mark_executed();
        let call = record.call().clone();

        let outcome = self.dispatch_call(&call, executor);
        self.ledger.set_outcome(&id, outcome);

        match outcome {
            ExecutionOutcome::Success => {
                info!(%id, %caller, "transaction executed");
                self.events.emit(WalletEvent::ExecutionSuccess(id));
            }
            ExecutionOutcome::Failure => {
                warn!(%id, %caller, "transaction execution failed");
                self.events.emit(WalletEvent::ExecutionFailure(id));
            }
        }

        Ok(outcome)
    }

    fn ensure_owner(&self, caller: &Address) -> WalletResult<()> {
        if !self.registry.is_owner(caller) {
            debug!(%caller, "rejected call from non-owner");
            return Err(WalletError::Unauthorized(*caller));
        }
        Ok(())
    }

    /// Moves the value out and performs the call, putting the value back if
    /// the call doesn't go through.
    fn dispatch_call<E: CallExecutor + ?Sized>(
        &mut self,
        call: &OutboundCall,
        executor: &mut E,
    ) -> ExecutionOutcome {
        let Some(remaining) = self.balance.checked_sub(call.value()) else {
            warn!(
                dest = %call.target(),
                value = %call.value(),
                balance = %self.balance,
                "insufficient balance, call not attempted"
            );
            return ExecutionOutcome::Failure;
        };
        self.balance = remaining;

        let status = if call.target() == self.address {
            self.perform_self_call(call)
        } else {
            executor.perform_call(self, call)
        };

        if status.is_reverted() {
            self.credit(call.value());
        }

        status.into()
    }

    /// Handles calls the wallet makes to itself.
    ///
    /// An empty payload is a plain transfer and goes through the deposit path,
    /// anything else has to be a registry change.
    fn perform_self_call(&mut self, call: &OutboundCall) -> CallStatus {
        if call.payload().is_empty() {
            self.credit(call.value());
            self.events.emit(WalletEvent::Deposit {
                sender: self.address,
                amount: call.value(),
            });
            return CallStatus::Success;
        }

        let status = self.apply_governance_payload(call.payload());
        if !status.is_reverted() {
            self.credit(call.value());
        }
        status
    }

    /// Returns value that was debited for a call. Can't overflow in practice
    /// since the amount was part of the balance moments ago.
    fn credit(&mut self, amount: U256) {
        self.balance = self.balance.saturating_add(amount);
    }

    pub(crate) fn registry_mut(&mut self) -> &mut OwnerRegistry {
        &mut self.registry
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub(crate) fn emit(&mut self, event: WalletEvent) {
        self.events.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_new_reports_registry() {
        let wallet = make_wallet(2, 100);

        assert_eq!(wallet.confirmations_required(), 2);
        assert!(wallet.is_owner(&owner(1)));
        assert!(wallet.is_owner(&owner(3)));
        assert!(!wallet.is_owner(&outsider()));
        assert_eq!(wallet.balance(), U256::from(100u64));
        assert!(wallet.pending_events().is_empty());
    }

    #[test]
    fn test_new_rejects_bad_threshold() {
        let params = WalletParams {
            address: wallet_address(),
            owners: vec![owner(1), owner(2)],
            threshold: 3,
        };
        assert!(matches!(
            Wallet::new(params, U256::ZERO),
            Err(WalletError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_add_transaction_stores_record() {
        let mut wallet = make_wallet(2, 100);
        let payload = Bytes::from_static(b"\x12\x34");
        let id = wallet
            .add_transaction(owner(1), recipient(), U256::from(1u64), payload.clone(), 77)
            .unwrap();

        let rec = wallet.transaction(&id).unwrap();
        assert_eq!(rec.target(), recipient());
        assert_eq!(rec.value(), U256::from(1u64));
        assert_eq!(rec.payload(), &payload);
        assert_eq!(rec.proposal_timestamp(), 77);
        assert!(!rec.executed());
        assert_eq!(rec.confirmation_count(), 0);
        assert_eq!(rec.outcome(), None);
        assert!(!wallet.confirmations(&id, &owner(1)));

        assert_eq!(wallet.take_events(), vec![WalletEvent::TransactionAdded(id)]);
        assert!(wallet.take_events().is_empty());
    }

    #[test]
    fn test_duplicate_proposal_rejected() {
        let mut wallet = make_wallet(2, 100);
        let id = propose_transfer(&mut wallet, 1, 5);
        wallet.take_events();

        let res = wallet.add_transaction(owner(2), recipient(), U256::from(1u64), Bytes::new(), 5);
        assert!(matches!(res, Err(WalletError::AlreadyProposed(dup)) if dup == id));
        assert!(wallet.pending_events().is_empty());
        assert_eq!(wallet.transaction_count(true, true), 1);
    }

    #[test]
    fn test_confirm_and_cancel() {
        let mut wallet = make_wallet(2, 100);
        let id = propose_transfer(&mut wallet, 1, 1);

        wallet.confirm_transaction(owner(2), id).unwrap();
        assert!(wallet.confirmations(&id, &owner(2)));
        assert_eq!(wallet.transaction(&id).unwrap().confirmation_count(), 1);
        assert!(!wallet.is_confirmed(&id));

        assert!(matches!(
            wallet.confirm_transaction(owner(2), id),
            Err(WalletError::AlreadyConfirmed { .. })
        ));

        wallet.cancel_confirmation(owner(2), id).unwrap();
        assert!(!wallet.confirmations(&id, &owner(2)));
        assert_eq!(wallet.transaction(&id).unwrap().confirmation_count(), 0);

        assert!(matches!(
            wallet.cancel_confirmation(owner(2), id),
            Err(WalletError::NotConfirmed { .. })
        ));
    }

    #[test]
    fn test_unknown_transaction() {
        let mut wallet = make_wallet(1, 0);
        let id = TxId::from([0x42; 32]);
        let mut ledger = SimulatedLedger::default();

        assert!(matches!(
            wallet.confirm_transaction(owner(1), id),
            Err(WalletError::NotFound(_))
        ));
        assert!(matches!(
            wallet.cancel_confirmation(owner(1), id),
            Err(WalletError::NotFound(_))
        ));
        assert!(matches!(
            wallet.execute_transaction(owner(1), id, &mut ledger),
            Err(WalletError::NotFound(_))
        ));
    }

    #[test]
    fn test_transaction_filters() {
        let mut wallet = make_wallet(1, 100);
        let mut ledger = SimulatedLedger::default();
        let a = propose_transfer(&mut wallet, 1, 1);
        let b = propose_transfer(&mut wallet, 1, 2);
        wallet.confirm_transaction(owner(1), b).unwrap();
        wallet.execute_transaction(owner(1), b, &mut ledger).unwrap();

        assert_eq!(wallet.transaction_ids(true, false), vec![a]);
        assert_eq!(wallet.transaction_ids(false, true), vec![b]);
        assert_eq!(wallet.transaction_ids(true, true), vec![a, b]);
        assert_eq!(wallet.transaction_count(false, false), 0);
    }

    #[test]
    fn test_serde_roundtrip_drops_events() {
        let mut wallet = make_wallet(2, 100);
        let id = propose_transfer(&mut wallet, 1, 1);
        wallet.confirm_transaction(owner(3), id).unwrap();

        let json = serde_json::to_string(&wallet).unwrap();
        let back: Wallet = serde_json::from_str(&json).unwrap();

        assert_eq!(back.balance(), wallet.balance());
        assert_eq!(back.owners(), wallet.owners());
        assert_eq!(back.transaction(&id), wallet.transaction(&id));
        assert!(back.confirmations(&id, &owner(3)));
        assert!(back.pending_events().is_empty());
    }

    fn snapshot_with(edit: impl FnOnce(&mut serde_json::Value)) -> Result<Wallet, serde_json::Error> {
        let mut wallet = make_wallet(2, 100);
        let id = propose_transfer(&mut wallet, 1, 1);
        wallet.confirm_transaction(owner(2), id).unwrap();

        let mut json = serde_json::to_value(&wallet).unwrap();
        edit(&mut json);
        serde_json::from_value(json)
    }

    #[test]
    fn test_load_rejects_outsider_confirmation() {
        let err = snapshot_with(|json| {
            let entry = &mut json["ledger"][0];
            entry["confirmers"] = serde_json::json!([owner(2), outsider()]);
            entry["record"]["confirmation_count"] = 2.into();
        })
        .unwrap_err();
        assert!(err.to_string().contains("confirmed by non-owner"));
    }

    #[test]
    fn test_load_rejects_miscounted_votes() {
        // A zero count next to a live vote would underflow on the next revoke.
        let err = snapshot_with(|json| {
            json["ledger"][0]["record"]["confirmation_count"] = 0.into();
        })
        .unwrap_err();
        assert!(err.to_string().contains("counts 0 confirmations but lists 1"));
    }

    #[test]
    fn test_load_rejects_broken_registry() {
        let err = snapshot_with(|json| {
            json["registry"]["threshold"] = 4.into();
        })
        .unwrap_err();
        assert!(err.to_string().contains("threshold 4"));
    }

    #[test]
    fn test_load_keeps_votes_on_executed_records() {
        let mut wallet = make_wallet(1, 100);
        let mut ledger = SimulatedLedger::default();
        let id = propose_transfer(&mut wallet, 1, 1);
        wallet.confirm_transaction(owner(3), id).unwrap();
        wallet.execute_transaction(owner(1), id, &mut ledger).unwrap();

        // owner(3) leaves later; its vote on the executed record stays.
        let mut json = serde_json::to_value(&wallet).unwrap();
        json["registry"]["owners"] = serde_json::json!([owner(1), owner(2)]);

        let back: Wallet = serde_json::from_value(json).unwrap();
        assert!(back.confirmations(&id, &owner(3)));
        assert!(!back.is_owner(&owner(3)));
    }
}
