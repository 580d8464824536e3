//! Command line arguments for the `msig-cli` binary.

use std::path::PathBuf;

use alloy_primitives::{Address, Bytes, U256};
use argh::FromArgs;
use msig_wallet_types::TxId;

/// State file used when `--state` is not given.
pub(crate) const DEFAULT_STATE_FILE: &str = "msig-state.json";

/// Args.
#[derive(FromArgs)]
pub(crate) struct Args {
    #[argh(
        option,
        description = "wallet state file (default msig-state.json)",
        short = 's',
        default = "PathBuf::from(DEFAULT_STATE_FILE)"
    )]
    pub(crate) state: PathBuf,

    #[argh(switch, description = "enable debug logging", short = 'v')]
    pub(crate) verbose: bool,

    #[argh(subcommand)]
    pub(crate) subc: Subcommand,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
pub(crate) enum Subcommand {
    Init(SubcInit),
    Deposit(SubcDeposit),
    Propose(SubcPropose),
    Confirm(SubcConfirm),
    Revoke(SubcRevoke),
    Execute(SubcExecute),
    Show(SubcShow),
    Reject(SubcReject),
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "init",
    description = "creates a wallet from a TOML config"
)]
pub(crate) struct SubcInit {
    #[argh(option, description = "wallet config path", short = 'c')]
    pub(crate) config: PathBuf,

    #[argh(switch, description = "overwrite an existing state file", short = 'f')]
    pub(crate) force: bool,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "deposit",
    description = "sends funds to the wallet"
)]
pub(crate) struct SubcDeposit {
    #[argh(option, description = "sender address")]
    pub(crate) from: Address,

    #[argh(option, description = "amount in base units")]
    pub(crate) amount: U256,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "propose",
    description = "proposes a transaction"
)]
pub(crate) struct SubcPropose {
    #[argh(option, description = "proposing owner")]
    pub(crate) caller: Address,

    #[argh(option, description = "call target")]
    pub(crate) target: Address,

    #[argh(option, description = "value in base units (default 0)", default = "U256::ZERO")]
    pub(crate) value: U256,

    #[argh(option, description = "hex call payload (default empty)")]
    pub(crate) data: Option<Bytes>,

    #[argh(
        option,
        description = "proposal timestamp in unix seconds (default now)"
    )]
    pub(crate) timestamp: Option<u64>,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "confirm",
    description = "confirms a pending transaction"
)]
pub(crate) struct SubcConfirm {
    #[argh(option, description = "confirming owner")]
    pub(crate) caller: Address,

    #[argh(option, description = "transaction id")]
    pub(crate) id: TxId,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "revoke",
    description = "withdraws a confirmation"
)]
pub(crate) struct SubcRevoke {
    #[argh(option, description = "owner withdrawing the vote")]
    pub(crate) caller: Address,

    #[argh(option, description = "transaction id")]
    pub(crate) id: TxId,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "execute",
    description = "executes a confirmed transaction"
)]
pub(crate) struct SubcExecute {
    #[argh(option, description = "executing owner")]
    pub(crate) caller: Address,

    #[argh(option, description = "transaction id")]
    pub(crate) id: TxId,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "show",
    description = "prints the wallet or a single transaction"
)]
pub(crate) struct SubcShow {
    #[argh(option, description = "transaction id")]
    pub(crate) id: Option<TxId>,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "reject",
    description = "makes the simulated ledger revert calls to a target"
)]
pub(crate) struct SubcReject {
    #[argh(option, description = "target address")]
    pub(crate) target: Address,

    #[argh(switch, description = "accept calls to the target again")]
    pub(crate) undo: bool,
}
