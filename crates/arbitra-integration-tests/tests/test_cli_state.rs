//! CLI subcommands against an on-disk host snapshot.
//!
//! Every invocation reloads the snapshot, so these tests check that a full
//! escrow lifecycle survives process boundaries.

use std::path::Path;

use arbitra_cli::commands::{run, BalanceArgs, Command, CreateArgs, DecideArgs, FundArgs, GetArgs};
use arbitra_cli::session::Session;
use arbitra_escrow::{EscrowConfig, EscrowView, Outcome, VotePolicy};
use arbitra_host::HostSnapshot;

/// Outcome of a subcommand, with the error chain flattened to text.
type CallResult = Result<String, String>;

fn session(dir: &Path, config: EscrowConfig) -> Session {
    Session::new(dir.join("arbitra-state.json"), config)
}

fn fund(s: &Session, who: &str, amount: &str, asset: &str) -> String {
    run(
        &Command::Fund(FundArgs {
            address: who.to_string(),
            amount: amount.to_string(),
            asset: asset.to_string(),
        }),
        s,
    )
    .unwrap()
}

fn create(s: &Session, sender: &str, payload: &str, limit: &str, token: &str) -> CallResult {
    run(
        &Command::Create(CreateArgs {
            sender: sender.to_string(),
            payload: payload.to_string(),
            limit: limit.to_string(),
            token: token.to_string(),
            amount: None,
            tx: None,
        }),
        s,
    )
    .map_err(|e| format!("{e:#}"))
}

fn decide(s: &Session, sender: &str, payload: &str) -> CallResult {
    run(
        &Command::Decide(DecideArgs {
            sender: sender.to_string(),
            payload: payload.to_string(),
            tx: Some("tx-decide".to_string()),
        }),
        s,
    )
    .map_err(|e| format!("{e:#}"))
}

fn get(s: &Session, id: &str) -> EscrowView {
    let json = run(&Command::Get(GetArgs { id: id.to_string() }), s).unwrap();
    serde_json::from_str(&json).unwrap()
}

fn balance(s: &Session, who: &str, asset: &str) -> String {
    run(
        &Command::Balance(BalanceArgs {
            address: who.to_string(),
            asset: Some(asset.to_string()),
        }),
        s,
    )
    .unwrap()
}

#[test]
fn refund_lifecycle_across_invocations() {
    let dir = tempfile::tempdir().unwrap();
    let s = session(dir.path(), EscrowConfig::default());

    assert!(fund(&s, "hive:alice", "3.000", "hbd").contains("balance 3.000 hbd"));
    assert_eq!(create(&s, "hive:alice", "rent|hive:bob|hive:carol", "2.000", "hbd").unwrap(), "0");
    assert_eq!(balance(&s, "hive:alice", "hbd"), "1.000 hbd");

    decide(&s, "hive:bob", "0|refund").unwrap();
    let out = decide(&s, "hive:carol", "0|f").unwrap();
    assert!(out.contains("closed: paid 2.000 hbd to hive:alice"), "{out}");

    let view = get(&s, "0");
    assert_eq!(view.outcome, Outcome::Refund);
    assert_eq!(balance(&s, "hive:alice", "hbd"), "3.000 hbd");

    let err = decide(&s, "hive:alice", "0|release").unwrap_err();
    assert!(err.contains("already closed"), "{err}");

    let snapshot = HostSnapshot::load(s.state_path()).unwrap();
    assert_eq!(snapshot.store.get("e:0|d").map(String::as_str), Some("011"));
}

#[test]
fn failed_calls_do_not_touch_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let s = session(dir.path(), EscrowConfig::default());
    fund(&s, "hive:alice", "1.000", "hive");
    let before = std::fs::read(s.state_path()).unwrap();

    assert!(create(&s, "hive:alice", "x|hive:bob", "1.000", "hive").is_err());
    assert!(create(&s, "hive:alice", "x|hive:bob|hive:carol", "1.000", "btc").is_err());
    assert!(create(&s, "hive:alice", "x|hive:bob|hive:carol", "5.000", "hive").is_err());
    assert!(decide(&s, "hive:alice", "0|release").is_err());

    assert_eq!(std::fs::read(s.state_path()).unwrap(), before);
}

#[test]
fn final_vote_policy_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("escrow.yaml");
    std::fs::write(&config_path, "vote_policy: final_once_cast\n").unwrap();
    let config = EscrowConfig::from_yaml_file(&config_path).unwrap();
    assert_eq!(config.vote_policy, VotePolicy::FinalOnceCast);

    let s = session(dir.path(), config);
    fund(&s, "hive:alice", "1.000", "hive");
    create(&s, "hive:alice", "x|hive:bob|hive:carol", "1.000", "hive").unwrap();
    decide(&s, "hive:bob", "0|refund").unwrap();
    let err = decide(&s, "hive:bob", "0|release").unwrap_err();
    assert!(err.contains("already decided"), "{err}");
}
