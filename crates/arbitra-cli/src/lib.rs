//! # arbitra-cli: Command-Line Host for the Escrow Contract
//!
//! Provides the `arbitra` binary. Each invocation loads the host state (store
//! entries and custody balances) from a JSON snapshot, runs one contract
//! call, and writes the snapshot back if the call succeeded.
//!
//! ## Subcommands
//!
//! - `arbitra fund`: credit a test balance.
//! - `arbitra create`: open an escrow funded by `--sender`.
//! - `arbitra decide`: record a vote.
//! - `arbitra get`: print an escrow snapshot as JSON.
//! - `arbitra balance`: show custody balances.
//!
//! ```bash
//! arbitra fund hive:alice 10.000 hive
//! arbitra create --sender hive:alice --payload "deal|hive:bob|hive:carol" --limit 1.000 --token hive
//! arbitra decide --sender hive:bob --payload "0|release"
//! arbitra get 0
//! ```

pub mod commands;
pub mod session;

/// Default location of the host snapshot.
pub const DEFAULT_STATE_FILE: &str = "arbitra-state.json";
