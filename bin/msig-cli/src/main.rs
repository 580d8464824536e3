//! Command line front end for a multi-owner wallet.
//!
//! Wallet state lives in a JSON file next to a simulated ledger that stands in
//! for the chain, so every subcommand loads the file, applies one operation
//! and writes it back.

mod args;
mod cmd;
mod state;

use std::process;

use args::Args;
use cmd::exec_subc;

fn main() {
    let args: Args = argh::from_env();
    let inner = || -> anyhow::Result<()> {
        exec_subc(args)?;
        Ok(())
    };
    if let Err(e) = inner() {
        eprintln!("ERROR\n{e:?}");
        process::exit(1);
    }
}
