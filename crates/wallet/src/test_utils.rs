//! Fixtures for unit tests.

use alloy_primitives::{Address, Bytes, U256};
use msig_wallet_types::TxId;

pub(crate) use crate::sim::SimulatedLedger;
use crate::wallet::{Wallet, WalletParams};

pub(crate) fn owner(n: u8) -> Address {
    Address::with_last_byte(n)
}

pub(crate) fn outsider() -> Address {
    Address::repeat_byte(0x0f)
}

pub(crate) fn recipient() -> Address {
    Address::repeat_byte(0xcc)
}

pub(crate) fn wallet_address() -> Address {
    Address::repeat_byte(0xaa)
}

/// Wallet owned by `owner(1..=3)`.
pub(crate) fn make_wallet(threshold: usize, funds: u64) -> Wallet {
    let params = WalletParams {
        address: wallet_address(),
        owners: vec![owner(1), owner(2), owner(3)],
        threshold,
    };
    Wallet::new(params, U256::from(funds)).expect("test: valid params")
}

/// Proposes a transfer of one unit to [`recipient`].
pub(crate) fn propose_transfer(wallet: &mut Wallet, proposer: u8, timestamp: u64) -> TxId {
    wallet
        .add_transaction(
            owner(proposer),
            recipient(),
            U256::from(1u64),
            Bytes::new(),
            timestamp,
        )
        .expect("test: propose")
}
