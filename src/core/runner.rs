//! External command execution.
//!
//! The sync flow talks to the outside world only through [`CommandRunner`],
//! so tests can swap in a recording fake.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::core::constants::LOCAL_CONVEX_BIN;

/// A single command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

/// Result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Exit code, `None` if terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Outcome {
    /// Whether the command exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs commands to completion.
pub trait CommandRunner {
    /// Run `invocation` and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns the spawn error if the program could not be started.
    fn run(&mut self, invocation: &Invocation) -> std::io::Result<Outcome>;
}

/// Runs commands as child processes of this one.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> std::io::Result<Outcome> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);

        let output = cmd.output()?;
        debug!(
            program = %invocation.program.display(),
            code = ?output.status.code(),
            "command finished"
        );

        Ok(Outcome {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// How to reach the `convex` CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvexCli {
    program: PathBuf,
    prefix: Vec<OsString>,
}

impl ConvexCli {
    /// Use an explicit binary.
    pub fn binary(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            prefix: Vec::new(),
        }
    }

    /// Locate the CLI for a project rooted at `dir`.
    ///
    /// Prefers the project's `node_modules/.bin/convex`, falling back to
    /// `npx convex`.
    pub fn resolve(dir: &Path) -> Self {
        let local_bin = dir.join(LOCAL_CONVEX_BIN);
        let bin_dir = local_bin.parent().unwrap_or(dir);

        if let Ok(program) = which::which_in("convex", Some(bin_dir), dir) {
            debug!(program = %program.display(), "using local convex binary");
            return Self::binary(program);
        }

        let npx = which::which("npx").unwrap_or_else(|_| PathBuf::from("npx"));
        debug!(program = %npx.display(), "falling back to npx convex");
        Self {
            program: npx,
            prefix: vec![OsString::from("convex")],
        }
    }

    /// `convex env set KEY VALUE`.
    pub fn env_set(&self, key: &str, value: &str) -> Invocation {
        let mut args = self.prefix.clone();
        args.extend(["env", "set", key, value].map(OsString::from));
        Invocation {
            program: self.program.clone(),
            args,
        }
    }

    /// The program that will be spawned.
    pub fn program(&self) -> &Path {
        &self.program
    }
}
