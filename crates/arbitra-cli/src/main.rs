//! # arbitra CLI entry point
//!
//! Parses command-line arguments, installs logging, loads configuration and
//! dispatches to the escrow subcommands.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use arbitra_cli::commands::{run, Command};
use arbitra_cli::session::{load_config, Session};
use arbitra_cli::DEFAULT_STATE_FILE;

/// Two-of-three arbitrated escrow, driven from the command line.
///
/// State (store entries and custody balances) is kept in a JSON snapshot
/// between invocations.
#[derive(Parser, Debug)]
#[command(name = "arbitra", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to a YAML escrow configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the host state snapshot.
    #[arg(long, global = true, env = "ARBITRA_STATE", default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::debug!(state = %cli.state.display(), "arbitra CLI starting");

    let result = load_config(cli.config.as_deref())
        .map(|config| Session::new(cli.state.clone(), config))
        .and_then(|session| run(&cli.command, &session));

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
