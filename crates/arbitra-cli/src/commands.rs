//! # Escrow Subcommands
//!
//! Every subcommand opens the session's host, performs one call, and
//! persists the host only when the call succeeded. Handlers return the text
//! to print so that tests can inspect it.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use arbitra_core::{Address, Amount, Asset, Timestamp, TxId};
use arbitra_escrow::{payload, EscrowError};
use arbitra_host::{CallContext, Intent};

use crate::session::Session;

/// Escrow subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Credit a test balance.
    Fund(FundArgs),
    /// Open an escrow funded by the sender.
    Create(CreateArgs),
    /// Record the sender's vote on an escrow.
    Decide(DecideArgs),
    /// Print an escrow snapshot as JSON.
    Get(GetArgs),
    /// Show custody balances of an address.
    Balance(BalanceArgs),
}

/// Arguments for `arbitra fund`.
#[derive(Args, Debug)]
pub struct FundArgs {
    /// Account to credit.
    pub address: String,
    /// Decimal amount, e.g. `10.000`.
    pub amount: String,
    /// Asset (`hive` or `hbd`).
    pub asset: String,
}

/// Arguments for `arbitra create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Creator address.
    #[arg(long)]
    pub sender: String,
    /// `Name|Receiver|Arbitrator`.
    #[arg(long)]
    pub payload: String,
    /// Limit of the attached `transfer.allow` intent.
    #[arg(long)]
    pub limit: String,
    /// Token of the attached `transfer.allow` intent.
    #[arg(long)]
    pub token: String,
    /// Lock this amount instead of the full limit.
    #[arg(long)]
    pub amount: Option<String>,
    /// Transaction reference. Generated when omitted.
    #[arg(long)]
    pub tx: Option<String>,
}

/// Arguments for `arbitra decide`.
#[derive(Args, Debug)]
pub struct DecideArgs {
    /// Voting party.
    #[arg(long)]
    pub sender: String,
    /// `EscrowId|Decision`.
    #[arg(long)]
    pub payload: String,
    /// Transaction reference. Generated when omitted.
    #[arg(long)]
    pub tx: Option<String>,
}

/// Arguments for `arbitra get`.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Escrow identifier.
    pub id: String,
}

/// Arguments for `arbitra balance`.
#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Account to inspect.
    pub address: String,
    /// Restrict to one asset.
    #[arg(long)]
    pub asset: Option<String>,
}

/// Execute a subcommand against the session's host.
pub fn run(command: &Command, session: &Session) -> Result<String> {
    match command {
        Command::Fund(args) => cmd_fund(args, session),
        Command::Create(args) => cmd_create(args, session),
        Command::Decide(args) => cmd_decide(args, session),
        Command::Get(args) => cmd_get(args, session),
        Command::Balance(args) => cmd_balance(args, session),
    }
}

fn address(value: &str, field: &str) -> Result<Address> {
    Address::parse(value, field).with_context(|| format!("invalid --{field}"))
}

fn tx_id(explicit: Option<&str>) -> TxId {
    match explicit {
        Some(tx) => TxId::new(tx),
        None => TxId::new(format!("cli-{}", Timestamp::now())),
    }
}

fn cmd_fund(args: &FundArgs, session: &Session) -> Result<String> {
    let account = address(&args.address, "address")?;
    let amount = Amount::parse_decimal(&args.amount).context("invalid amount")?;
    let asset: Asset = args.asset.parse().context("invalid asset")?;

    let mut contract = session.open()?;
    contract
        .custody_mut()
        .credit(&account, amount, asset)
        .context("failed to credit account")?;
    let balance = contract.custody().balance(&account, asset);
    session.persist(contract)?;

    Ok(format!("OK: credited {amount} {asset} to {account} (balance {balance} {asset})"))
}

fn cmd_create(args: &CreateArgs, session: &Session) -> Result<String> {
    let sender = address(&args.sender, "sender")?;
    let mut request = payload::parse_create(&args.payload).map_err(EscrowError::from)?;
    if let Some(raw) = &args.amount {
        request = request.with_amount(Amount::parse_decimal(raw).context("invalid --amount")?);
    }
    let ctx = CallContext::new(sender, tx_id(args.tx.as_deref()))
        .with_intent(Intent::transfer_allow(args.limit.as_str(), args.token.as_str()));

    let mut contract = session.open()?;
    let id = contract.create(&ctx, request)?;
    session.persist(contract)?;
    Ok(id.to_string())
}

fn cmd_decide(args: &DecideArgs, session: &Session) -> Result<String> {
    let sender = address(&args.sender, "sender")?;
    let ctx = CallContext::new(sender, tx_id(args.tx.as_deref()));

    let mut contract = session.open()?;
    let receipt = contract.decide_from_payload(&ctx, &args.payload)?;
    session.persist(contract)?;

    let mut out = format!(
        "OK: {} voted {} on escrow {}",
        receipt.role, receipt.vote, receipt.escrow_id
    );
    if let Some(payout) = &receipt.payout {
        out.push_str(&format!(
            "\nclosed: paid {} {} to {} ({})",
            payout.amount, payout.asset, payout.recipient, payout.role
        ));
    }
    Ok(out)
}

fn cmd_get(args: &GetArgs, session: &Session) -> Result<String> {
    let contract = session.open()?;
    Ok(contract.get_from_payload(&args.id)?)
}

fn cmd_balance(args: &BalanceArgs, session: &Session) -> Result<String> {
    let account = address(&args.address, "address")?;
    let assets = match &args.asset {
        Some(raw) => vec![raw.parse::<Asset>().context("invalid --asset")?],
        None => Asset::ALL.to_vec(),
    };
    let contract = session.open()?;
    let lines: Vec<String> = assets
        .into_iter()
        .map(|asset| format!("{} {asset}", contract.custody().balance(&account, asset)))
        .collect();
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbitra_escrow::{ErrorKind, EscrowConfig, EscrowView};
    use tempfile::TempDir;

    fn session() -> (TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path().join("state.json"), EscrowConfig::default());
        (dir, session)
    }

    fn fund(session: &Session, who: &str, amount: &str) {
        run(
            &Command::Fund(FundArgs {
                address: who.to_string(),
                amount: amount.to_string(),
                asset: "hive".to_string(),
            }),
            session,
        )
        .unwrap();
    }

    fn create_cmd(sender: &str, payload: &str, limit: &str) -> Command {
        Command::Create(CreateArgs {
            sender: sender.to_string(),
            payload: payload.to_string(),
            limit: limit.to_string(),
            token: "hive".to_string(),
            amount: None,
            tx: Some("tx-create".to_string()),
        })
    }

    fn decide_cmd(sender: &str, payload: &str) -> Command {
        Command::Decide(DecideArgs {
            sender: sender.to_string(),
            payload: payload.to_string(),
            tx: None,
        })
    }

    fn balance(session: &Session, who: &str) -> String {
        run(
            &Command::Balance(BalanceArgs {
                address: who.to_string(),
                asset: Some("hive".to_string()),
            }),
            session,
        )
        .unwrap()
    }

    fn view(session: &Session, id: &str) -> EscrowView {
        let json = run(&Command::Get(GetArgs { id: id.to_string() }), session).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn full_lifecycle_across_invocations() {
        let (_dir, s) = session();
        fund(&s, "hive:alice", "5.000");
        let id = run(&create_cmd("hive:alice", "deal|hive:bob|hive:carol", "2.000"), &s).unwrap();
        assert_eq!(id, "0");
        assert_eq!(balance(&s, "hive:alice"), "3.000 hive");

        let out = run(&decide_cmd("hive:alice", "0|release"), &s).unwrap();
        assert_eq!(out, "OK: creator voted release on escrow 0");
        let out = run(&decide_cmd("hive:carol", "0|1"), &s).unwrap();
        assert!(out.contains("closed: paid 2.000 hive to hive:bob"), "{out}");

        assert_eq!(balance(&s, "hive:bob"), "2.000 hive");
        let v = view(&s, "0");
        assert!(v.closed);
        assert_eq!(v.name, "deal");
    }

    #[test]
    fn rejected_call_leaves_snapshot_untouched() {
        let (_dir, s) = session();
        fund(&s, "hive:alice", "1.000");
        let before = std::fs::read_to_string(s.state_path()).unwrap();
        let err = run(&create_cmd("hive:alice", "deal|hive:alice|hive:carol", "1.000"), &s)
            .unwrap_err();
        let escrow_err = err.downcast_ref::<EscrowError>().unwrap();
        assert_eq!(escrow_err.kind(), ErrorKind::Validation);
        assert_eq!(std::fs::read_to_string(s.state_path()).unwrap(), before);
    }

    #[test]
    fn explicit_amount_is_honoured() {
        let (_dir, s) = session();
        fund(&s, "hive:alice", "5.000");
        let mut cmd = create_cmd("hive:alice", "deal|hive:bob|hive:carol", "2.000");
        if let Command::Create(args) = &mut cmd {
            args.amount = Some("0.750".to_string());
        }
        run(&cmd, &s).unwrap();
        assert_eq!(balance(&s, "hive:alice"), "4.250 hive");
    }

    #[test]
    fn get_unknown_escrow_fails() {
        let (_dir, s) = session();
        let err = run(&Command::Get(GetArgs { id: "4".to_string() }), &s).unwrap_err();
        assert_eq!(
            err.downcast_ref::<EscrowError>().map(EscrowError::kind),
            Some(ErrorKind::NotFound)
        );
    }

    #[test]
    fn balance_lists_all_assets_by_default() {
        let (_dir, s) = session();
        fund(&s, "hive:alice", "1.500");
        let out = run(
            &Command::Balance(BalanceArgs {
                address: "hive:alice".to_string(),
                asset: None,
            }),
            &s,
        )
        .unwrap();
        assert_eq!(out, "1.500 hive\n0.000 hbd");
    }

    #[test]
    fn fund_rejects_bad_input() {
        let (_dir, s) = session();
        let cmd = Command::Fund(FundArgs {
            address: "hive:alice".to_string(),
            amount: "-1".to_string(),
            asset: "hive".to_string(),
        });
        assert!(run(&cmd, &s).is_err());
        assert!(!s.state_path().exists());
    }
}
