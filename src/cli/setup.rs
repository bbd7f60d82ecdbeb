//! Setup flow.
//!
//! Generates fresh auth material, then prints it, writes it to the env
//! file, and/or syncs the env file to Convex depending on the config.

use tracing::info;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::env::{self, EnvFile};
use crate::core::keys::GeneratedSecrets;
use crate::core::runner::{CommandRunner, ConvexCli};
use crate::core::sync;
use crate::error::Result;

/// Run one setup pass with `runner` handling any `convex` invocations.
pub fn execute<R>(config: &Config, runner: &mut R) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    info!(
        write = config.write,
        sync = config.sync,
        apply = config.apply,
        "running setup"
    );

    let secrets = GeneratedSecrets::generate()?;
    let quoted = secrets.quoted_entries();
    let entries: Vec<(&str, &str)> = quoted.iter().map(|(k, v)| (*k, v.as_str())).collect();

    if config.write {
        let mut file = EnvFile::load(&config.env_file)?;
        file.upsert(&entries);
        file.save(&config.env_file)?;
        output::success(&format!(
            "wrote {}",
            output::path(&config.env_file.display().to_string())
        ));
    }

    if config.print_only() {
        for (key, value) in &entries {
            println!("{}={}", key, value);
        }
    }

    if config.sync {
        sync_convex(config, runner)?;
    }

    Ok(())
}

fn sync_convex<R>(config: &Config, runner: &mut R) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    let content = env::read_content(&config.env_file)?;

    sync::check_backend(&content, config.probe_timeout)?;

    let candidates = sync::candidates(&content);
    if candidates.is_empty() {
        output::dimmed("nothing to sync");
        return Ok(());
    }

    if !config.apply {
        output::header("would set on convex:");
        for candidate in &candidates {
            output::list_item(&candidate.key);
        }
        output::hint("rerun with --apply to push these values");
        return Ok(());
    }

    let cli = match &config.convex_bin {
        Some(bin) => ConvexCli::binary(bin),
        None => ConvexCli::resolve(&std::env::current_dir()?),
    };

    let count = sync::apply(&candidates, &cli, runner)?;
    output::success(&format!("synced {} variables to convex", count));

    Ok(())
}
