//! Command helper methods for Test.

use super::{Test, FAKE_CONVEX};
use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use std::process::Output;

impl Test {
    /// Create an authsetup command running in the project directory.
    ///
    /// Configuration env vars are cleared so the host environment cannot
    /// leak into the run.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("authsetup").expect("failed to find authsetup binary");
        cmd.current_dir(self.dir.path());
        cmd.env("NO_COLOR", "1");
        for var in [
            "AUTHSETUP_LOG",
            "AUTHSETUP_ENV_FILE",
            "AUTHSETUP_PROBE_TIMEOUT_MS",
            "AUTHSETUP_CONVEX_BIN",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Run authsetup with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run authsetup")
    }

    /// Install the fake convex CLI at `node_modules/.bin/convex`.
    #[cfg(unix)]
    pub fn install_fake_convex(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let bin_dir = self.dir.path().join("node_modules/.bin");
        fs::create_dir_all(&bin_dir).expect("failed to create node_modules/.bin");
        let bin = bin_dir.join("convex");
        fs::write(&bin, FAKE_CONVEX).expect("failed to write fake convex");
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755))
            .expect("failed to make fake convex executable");
        bin
    }

    /// Keys the fake convex CLI was called with, in order.
    pub fn convex_calls(&self) -> Vec<String> {
        let log = self.dir.path().join("node_modules/.bin/calls.log");
        fs::read_to_string(log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
