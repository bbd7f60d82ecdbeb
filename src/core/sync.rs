//! Convex environment sync.
//!
//! Picks the auth variables out of the env file, checks the deployment is
//! up, and pushes each one with `convex env set`.

use std::io::Write;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};
use url::Url;

use crate::core::constants::{CONVEX_SITE_URL, CONVEX_URL, SYNC_KEYS};
use crate::core::env::lookup;
use crate::core::probe;
use crate::core::runner::{CommandRunner, ConvexCli};
use crate::error::{Error, Result};

lazy_static! {
    static ref CLOUD_SUFFIX: Regex = Regex::new(r"\.cloud/?$").expect("suffix pattern is valid");
}

/// A variable to set on the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub key: String,
    pub value: String,
}

impl Candidate {
    fn new(key: &str, value: String) -> Self {
        Self {
            key: key.to_string(),
            value,
        }
    }
}

/// The deployment URL declared in the env file, if any.
pub fn convex_url(content: &str) -> Option<String> {
    lookup(content, CONVEX_URL).filter(|url| !url.is_empty())
}

/// Host and explicit port to probe for `url`.
///
/// `None` when the URL does not parse or has no non-zero port; such
/// deployments are not probed.
pub fn probe_target(url: &str) -> Option<(String, u16)> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(url, error = %e, "ignoring unparseable convex url");
            return None;
        }
    };

    let port = parsed.port().filter(|port| *port > 0)?;
    let host = parsed
        .host_str()?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string();

    Some((host, port))
}

/// `https://x.convex.cloud` to `https://x.convex.site`.
///
/// `None` unless the URL ends in `.cloud`.
pub fn site_url(url: &str) -> Option<String> {
    let site = CLOUD_SUFFIX.replace(url, ".site");
    (site != url).then(|| site.into_owned())
}

/// Fail if the deployment declared in `content` does not accept connections.
///
/// # Errors
///
/// Returns `Error::Unreachable` when a probeable URL is declared but the
/// probe fails.
pub fn check_backend(content: &str, timeout: Duration) -> Result<()> {
    let Some(url) = convex_url(content) else {
        return Ok(());
    };
    let Some((host, port)) = probe_target(&url) else {
        return Ok(());
    };

    if probe::is_reachable(&host, port, timeout) {
        Ok(())
    } else {
        Err(Error::Unreachable { url })
    }
}

/// Variables to push, in push order.
///
/// The derived site URL comes first, followed by each allow-listed key that
/// has a non-empty value.
pub fn candidates(content: &str) -> Vec<Candidate> {
    let mut out = Vec::new();

    if let Some(site) = convex_url(content).as_deref().and_then(site_url) {
        out.push(Candidate::new(CONVEX_SITE_URL, site));
    }

    for key in SYNC_KEYS {
        if let Some(value) = lookup(content, key).filter(|v| !v.is_empty()) {
            out.push(Candidate::new(key, value));
        }
    }

    debug!(count = out.len(), "collected sync candidates");
    out
}

/// Push every candidate, stopping at the first failure.
///
/// Child output is forwarded to this process's stdout and stderr.
///
/// # Errors
///
/// Returns `Error::Spawn` if the CLI cannot be started and
/// `Error::CommandFailed` if it exits unsuccessfully.
pub fn apply<R>(candidates: &[Candidate], cli: &ConvexCli, runner: &mut R) -> Result<usize>
where
    R: CommandRunner + ?Sized,
{
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();

    for candidate in candidates {
        info!(key = %candidate.key, "setting convex env var");
        let invocation = cli.env_set(&candidate.key, &candidate.value);

        let outcome = runner.run(&invocation).map_err(|source| Error::Spawn {
            program: cli.program().display().to_string(),
            source,
        })?;

        stdout.write_all(&outcome.stdout)?;
        stderr.write_all(&outcome.stderr)?;

        if !outcome.success() {
            return Err(Error::CommandFailed {
                key: candidate.key.clone(),
                code: outcome.code.filter(|code| *code != 0).unwrap_or(1),
            });
        }
    }

    stdout.flush()?;
    Ok(candidates.len())
}
