//! Shared fixtures for wallet integration tests.

#![allow(dead_code, unreachable_pub, reason = "not every test binary uses every fixture")]

use alloy_primitives::{Address, Bytes, U256};
use msig_wallet::{SimulatedLedger, Wallet, WalletParams};
use msig_wallet_types::TxId;

pub const REQUIRED: usize = 2;

/// 10^18, one whole unit in base denomination.
pub fn units(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

pub fn owner1() -> Address {
    Address::with_last_byte(1)
}

pub fn owner2() -> Address {
    Address::with_last_byte(2)
}

pub fn owner3() -> Address {
    Address::with_last_byte(3)
}

pub fn other_account() -> Address {
    Address::repeat_byte(0x44)
}

pub fn wallet_address() -> Address {
    Address::repeat_byte(0xaa)
}

pub fn external_address() -> Address {
    Address::repeat_byte(0x77)
}

/// Three owners, two confirmations, funded with 100 units.
pub struct Fixture {
    pub wallet: Wallet,
    pub ledger: SimulatedLedger,
}

impl Fixture {
    pub fn new() -> Self {
        let params = WalletParams {
            address: wallet_address(),
            owners: vec![owner1(), owner2(), owner3()],
            threshold: REQUIRED,
        };
        let wallet = Wallet::new(params, units(100)).expect("fixture: wallet");
        Self {
            wallet,
            ledger: SimulatedLedger::default(),
        }
    }

    pub fn propose(&mut self, target: Address, value: U256, payload: Bytes, ts: u64) -> TxId {
        self.wallet
            .add_transaction(owner1(), target, value, payload, ts)
            .expect("fixture: propose")
    }

    pub fn confirm_by(&mut self, id: TxId, owners: &[Address]) {
        for owner in owners {
            self.wallet
                .confirm_transaction(*owner, id)
                .expect("fixture: confirm");
        }
    }
}
