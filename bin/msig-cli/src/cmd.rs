//! Subcommand handlers.

use std::{
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, bail};
use msig_common::logging::{self, FileLoggingConfig, LoggerConfig, LoggingGuard, Rotation};
use msig_config::{Config, LogRotation, LoggingConfig};
use msig_wallet::{SimulatedLedger, TransactionRecord, Wallet, WalletParams};
use msig_wallet_types::TxId;
use serde::Serialize;
use tracing::*;

use crate::{
    args::{
        Args, SubcConfirm, SubcDeposit, SubcExecute, SubcInit, SubcPropose, SubcReject,
        SubcRevoke, SubcShow, Subcommand,
    },
    state::CliState,
};

const SERVICE_NAME: &str = "msig-cli";

/// Runs one subcommand against the state file named in `args`.
pub(crate) fn exec_subc(args: Args) -> anyhow::Result<()> {
    let Args {
        state: path,
        verbose,
        subc,
    } = args;

    match subc {
        Subcommand::Init(subc) => exec_init(subc, &path, verbose),
        Subcommand::Show(subc) => with_state(&path, verbose, false, |st| exec_show(subc, st)),
        Subcommand::Deposit(subc) => with_state(&path, verbose, true, |st| exec_deposit(subc, st)),
        Subcommand::Propose(subc) => with_state(&path, verbose, true, |st| exec_propose(subc, st)),
        Subcommand::Confirm(subc) => with_state(&path, verbose, true, |st| exec_confirm(subc, st)),
        Subcommand::Revoke(subc) => with_state(&path, verbose, true, |st| exec_revoke(subc, st)),
        Subcommand::Execute(subc) => with_state(&path, verbose, true, |st| exec_execute(subc, st)),
        Subcommand::Reject(subc) => with_state(&path, verbose, true, |st| exec_reject(subc, st)),
    }
}

/// Loads the state, runs `f` and, when `persist` is set and `f` succeeded,
/// prints the events it produced and writes the state back.
fn with_state(
    path: &Path,
    verbose: bool,
    persist: bool,
    f: impl FnOnce(&mut CliState) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let mut state = CliState::load(path)?;
    let guard = init_logging(&state.logging, verbose);

    let res = f(&mut state).and_then(|()| {
        if !persist {
            return Ok(());
        }
        print_events(&mut state.wallet);
        state.save(path)
    });

    logging::finalize(guard);
    res
}

fn init_logging(config: &LoggingConfig, verbose: bool) -> LoggingGuard {
    logging::init(logger_config(config, verbose))
}

fn logger_config(config: &LoggingConfig, verbose: bool) -> LoggerConfig {
    let service = logging::format_service_name(SERVICE_NAME, config.service_label.as_deref());
    let json = config.json_format.unwrap_or(false);

    let mut lconfig = LoggerConfig::new(service).with_json_logging(json);
    if verbose {
        lconfig = lconfig.with_default_level(Level::DEBUG);
    }
    if let Some(dir) = &config.log_dir {
        let prefix = config
            .log_file_prefix
            .clone()
            .unwrap_or_else(|| SERVICE_NAME.to_owned());
        let rotation = match config.log_rotation.unwrap_or_default() {
            LogRotation::Minutely => Rotation::MINUTELY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        };
        lconfig = lconfig.with_file_logging(
            FileLoggingConfig::new(dir.clone(), prefix)
                .with_rotation(rotation)
                .with_json_format(json),
        );
    }

    lconfig
}

fn exec_init(subc: SubcInit, path: &Path, verbose: bool) -> anyhow::Result<()> {
    let config = Config::load(&subc.config)
        .with_context(|| format!("loading {}", subc.config.display()))?;
    let guard = init_logging(&config.logging, verbose);
    let res = create_state(&config, path, subc.force);
    logging::finalize(guard);
    res
}

fn create_state(config: &Config, path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!(
            "state file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let params = WalletParams {
        address: config.wallet.address,
        owners: config.wallet.owners.clone(),
        threshold: config.wallet.threshold,
    };
    let wallet = Wallet::new(params, config.wallet.initial_funds)?;
    let state = CliState {
        wallet,
        ledger: SimulatedLedger::default(),
        logging: config.logging.clone(),
    };
    state.save(path)?;

    info!(state = %path.display(), "wallet initialized");
    println!("{}", state.wallet.address());
    Ok(())
}

fn exec_deposit(subc: SubcDeposit, state: &mut CliState) -> anyhow::Result<()> {
    state.wallet.receive(subc.from, subc.amount)?;
    Ok(())
}

fn exec_propose(subc: SubcPropose, state: &mut CliState) -> anyhow::Result<()> {
    let timestamp = match subc.timestamp {
        Some(ts) => ts,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs(),
    };
    state.wallet.add_transaction(
        subc.caller,
        subc.target,
        subc.value,
        subc.data.unwrap_or_default(),
        timestamp,
    )?;
    Ok(())
}

fn exec_confirm(subc: SubcConfirm, state: &mut CliState) -> anyhow::Result<()> {
    state.wallet.confirm_transaction(subc.caller, subc.id)?;
    Ok(())
}

fn exec_revoke(subc: SubcRevoke, state: &mut CliState) -> anyhow::Result<()> {
    state.wallet.cancel_confirmation(subc.caller, subc.id)?;
    Ok(())
}

fn exec_execute(subc: SubcExecute, state: &mut CliState) -> anyhow::Result<()> {
    let outcome = state
        .wallet
        .execute_transaction(subc.caller, subc.id, &mut state.ledger)?;
    debug!(id = %subc.id, %outcome, "execute finished");
    Ok(())
}

fn exec_reject(subc: SubcReject, state: &mut CliState) -> anyhow::Result<()> {
    if subc.undo {
        state.ledger.accept_calls_to(&subc.target);
    } else {
        state.ledger.reject_calls_to(subc.target);
    }
    Ok(())
}

fn exec_show(subc: SubcShow, state: &CliState) -> anyhow::Result<()> {
    let out = match subc.id {
        Some(id) => {
            let Some(view) = TxView::build(&state.wallet, &id) else {
                bail!("unknown transaction {id}");
            };
            serde_json::to_string_pretty(&view)?
        }
        None => serde_json::to_string_pretty(&WalletView::build(state))?,
    };
    println!("{out}");
    Ok(())
}

fn print_events(wallet: &mut Wallet) {
    for ev in wallet.take_events() {
        println!("{ev}");
    }
}

#[derive(Debug, Serialize)]
struct WalletView {
    address: String,
    balance: String,
    threshold: usize,
    owners: Vec<String>,
    transactions: Vec<TxView>,
}

impl WalletView {
    fn build(state: &CliState) -> Self {
        let wallet = &state.wallet;
        Self {
            address: wallet.address().to_string(),
            balance: wallet.balance().to_string(),
            threshold: wallet.confirmations_required(),
            owners: wallet.owners().iter().map(ToString::to_string).collect(),
            transactions: wallet
                .transaction_ids(true, true)
                .iter()
                .filter_map(|id| TxView::build(wallet, id))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TxView {
    id: String,
    target: String,
    value: String,
    payload: String,
    proposal_timestamp: u64,
    status: &'static str,
    confirmations: usize,
    confirmed_by: Vec<String>,
}

impl TxView {
    fn build(wallet: &Wallet, id: &TxId) -> Option<Self> {
        let record: &TransactionRecord = wallet.transaction(id)?;
        let status = match record.outcome() {
            Some(outcome) if outcome.is_success() => "executed",
            Some(_) => "failed",
            None if wallet.is_confirmed(id) => "ready",
            None => "pending",
        };

        Some(Self {
            id: record.id().to_string(),
            target: record.target().to_string(),
            value: record.value().to_string(),
            payload: record.payload().to_string(),
            proposal_timestamp: record.proposal_timestamp(),
            status,
            confirmations: record.confirmation_count(),
            confirmed_by: wallet
                .confirmers(id)
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use alloy_primitives::{Address, U256};
    use argh::FromArgs;
    use msig_wallet_types::ExecutionOutcome;

    use super::*;

    const CONFIG: &str = r#"
        [wallet]
        address = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
        owners = [
            "0x0000000000000000000000000000000000000001",
            "0x0000000000000000000000000000000000000002",
            "0x0000000000000000000000000000000000000003",
        ]
        threshold = 2
        initial_funds = "1000"
    "#;

    const OWNER1: &str = "0x0000000000000000000000000000000000000001";
    const OWNER2: &str = "0x0000000000000000000000000000000000000002";
    const TARGET: &str = "0x7777777777777777777777777777777777777777";

    fn run(state: &Path, args: &[&str]) -> anyhow::Result<()> {
        let state = state.to_str().unwrap();
        let mut full = vec!["-s", state];
        full.extend_from_slice(args);
        let args = Args::from_args(&["msig-cli"], &full).expect("valid args");
        exec_subc(args)
    }

    fn setup() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("wallet.toml");
        fs::write(&config, CONFIG).unwrap();
        let state = dir.path().join("state.json");
        run(&state, &["init", "-c", config.to_str().unwrap()]).unwrap();
        (dir, state)
    }

    fn only_id(state: &Path) -> TxId {
        let loaded = CliState::load(state).unwrap();
        let ids = loaded.wallet.transaction_ids(true, true);
        assert_eq!(ids.len(), 1);
        ids[0]
    }

    #[test]
    fn test_full_flow() {
        let (_dir, state) = setup();

        run(
            &state,
            &[
                "propose", "--caller", OWNER1, "--target", TARGET, "--value", "400",
                "--timestamp", "7",
            ],
        )
        .unwrap();
        let id = only_id(&state).to_string();

        // Not enough votes yet.
        run(&state, &["confirm", "--caller", OWNER1, "--id", &id]).unwrap();
        assert!(run(&state, &["execute", "--caller", OWNER1, "--id", &id]).is_err());

        run(&state, &["confirm", "--caller", OWNER2, "--id", &id]).unwrap();
        run(&state, &["execute", "--caller", OWNER2, "--id", &id]).unwrap();
        run(&state, &["show", "--id", &id]).unwrap();

        let loaded = CliState::load(&state).unwrap();
        assert_eq!(loaded.wallet.balance(), U256::from(600u64));
        assert_eq!(
            loaded.ledger.balance_of(&Address::repeat_byte(0x77)),
            U256::from(400u64)
        );
        assert!(loaded.wallet.transaction(&only_id(&state)).unwrap().executed());
    }

    #[test]
    fn test_rejected_target_fails_execution() {
        let (_dir, state) = setup();

        run(&state, &["reject", "--target", TARGET]).unwrap();
        run(
            &state,
            &[
                "propose", "--caller", OWNER1, "--target", TARGET, "--value", "10",
                "--timestamp", "1",
            ],
        )
        .unwrap();
        let id = only_id(&state).to_string();
        run(&state, &["confirm", "--caller", OWNER1, "--id", &id]).unwrap();
        run(&state, &["confirm", "--caller", OWNER2, "--id", &id]).unwrap();
        run(&state, &["execute", "--caller", OWNER1, "--id", &id]).unwrap();

        let loaded = CliState::load(&state).unwrap();
        let record = loaded.wallet.transaction(&only_id(&state)).unwrap().clone();
        assert!(record.executed());
        assert_eq!(record.outcome(), Some(ExecutionOutcome::Failure));
        assert_eq!(loaded.wallet.balance(), U256::from(1000u64));
    }

    #[test]
    fn test_outsider_cannot_propose() {
        let (_dir, state) = setup();
        let err = run(
            &state,
            &[
                "propose",
                "--caller",
                "0x4444444444444444444444444444444444444444",
                "--target",
                TARGET,
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("onlyOwner: not an owner!"));
        assert_eq!(CliState::load(&state).unwrap().wallet.transaction_count(true, true), 0);
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let (dir, state) = setup();
        let config = dir.path().join("wallet.toml");
        let res = run(&state, &["init", "-c", config.to_str().unwrap()]);
        assert!(res.is_err());
        run(&state, &["init", "-c", config.to_str().unwrap(), "--force"]).unwrap();
    }

    #[test]
    fn test_logger_config_from_logging_table() {
        let table = LoggingConfig {
            service_label: Some("dev".to_owned()),
            log_dir: Some(PathBuf::from("/tmp/msig-logs")),
            log_file_prefix: None,
            log_rotation: Some(LogRotation::Never),
            json_format: Some(true),
        };

        let lconfig = logger_config(&table, true);
        assert_eq!(lconfig.service_name, "msig-cli%dev");
        assert_eq!(lconfig.default_level, Level::DEBUG);
        assert!(lconfig.stdout_config.json_format);

        let file = lconfig.file_logging_config.expect("file logging configured");
        assert_eq!(file.directory, PathBuf::from("/tmp/msig-logs"));
        assert_eq!(file.file_name_prefix, SERVICE_NAME);
        assert_eq!(file.rotation, Rotation::NEVER);
        assert!(file.json_format);

        // Without a directory there is no file layer, rotation or not.
        let plain = logger_config(&LoggingConfig::default(), false);
        assert_eq!(plain.default_level, Level::INFO);
        assert!(plain.file_logging_config.is_none());
    }

    #[test]
    fn test_deposit() {
        let (_dir, state) = setup();
        run(&state, &["deposit", "--from", TARGET, "--amount", "25"]).unwrap();
        let loaded = CliState::load(&state).unwrap();
        assert_eq!(loaded.wallet.balance(), U256::from(1025u64));
    }
}
