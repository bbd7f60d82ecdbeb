//! Command-line interface.

pub mod output;
pub mod setup;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::core::config::Config;
use crate::core::constants::{DEFAULT_PROBE_TIMEOUT_MS, ENV_FILE};
use crate::core::runner::ProcessRunner;

/// authsetup - Generate auth keys and secrets, and sync them to Convex.
#[derive(Parser, Debug)]
#[command(
    name = "authsetup",
    about = "Generate auth signing keys and secrets for local development",
    long_about = "Generate an RS256 signing key, its JWKS and two random secrets.\n\n\
                  Without flags the values are printed. --write stores them in the env file, \
                  --sync-convex pushes auth variables to the Convex deployment.",
    version,
    after_help = "Examples:\n  authsetup --setup            write secrets and preview the sync\n  authsetup --setup --apply    write secrets and push them to convex"
)]
pub struct Cli {
    /// Write generated secrets to the env file
    #[arg(long)]
    pub write: bool,

    /// Push auth variables from the env file to the Convex deployment
    #[arg(long)]
    pub sync_convex: bool,

    /// Shorthand for --write --sync-convex
    #[arg(long)]
    pub setup: bool,

    /// Run `convex env set` for real instead of printing the plan
    #[arg(long)]
    pub apply: bool,

    /// Env file to read and update
    #[arg(long, env = "AUTHSETUP_ENV_FILE", default_value = ENV_FILE)]
    pub env_file: PathBuf,

    /// Milliseconds to wait when checking that the deployment is up
    #[arg(long, env = "AUTHSETUP_PROBE_TIMEOUT_MS", default_value_t = DEFAULT_PROBE_TIMEOUT_MS)]
    pub probe_timeout_ms: u64,

    /// Path to the convex CLI (default: node_modules/.bin/convex, then npx convex)
    #[arg(long, env = "AUTHSETUP_CONVEX_BIN")]
    pub convex_bin: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            write: cli.write || cli.setup,
            sync: cli.sync_convex || cli.setup,
            apply: cli.apply,
            env_file: cli.env_file,
            probe_timeout: Duration::from_millis(cli.probe_timeout_ms),
            convex_bin: cli.convex_bin,
        }
    }
}

/// Execute a parsed command line.
pub fn execute(cli: Cli) -> crate::error::Result<()> {
    let config = Config::from(cli);
    setup::execute(&config, &mut ProcessRunner)
}
