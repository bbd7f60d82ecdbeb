//! Run configuration.
//!
//! Built once from the command line and passed down explicitly.

use std::path::PathBuf;
use std::time::Duration;

use crate::core::constants::{DEFAULT_PROBE_TIMEOUT_MS, ENV_FILE};

/// What a single run does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upsert generated secrets into `env_file`.
    pub write: bool,
    /// Push allow-listed variables to Convex.
    pub sync: bool,
    /// Run `convex env set` instead of printing a plan.
    pub apply: bool,
    pub env_file: PathBuf,
    pub probe_timeout: Duration,
    /// Explicit convex binary; resolved from the project when unset.
    pub convex_bin: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            write: false,
            sync: false,
            apply: false,
            env_file: PathBuf::from(ENV_FILE),
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            convex_bin: None,
        }
    }
}

impl Config {
    /// No persistence or sync requested: secrets go to stdout.
    pub fn print_only(&self) -> bool {
        !self.write && !self.sync
    }
}
