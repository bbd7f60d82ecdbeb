//! TCP reachability probe.

use std::time::Duration;

use tokio::net::TcpStream;
use tracing::{debug, warn};

/// Check whether `host:port` accepts a TCP connection within `timeout`.
///
/// Never fails: connection errors, resolution errors and timeouts all
/// report `false`.
pub fn is_reachable(host: &str, port: u16, timeout: Duration) -> bool {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            warn!(error = %e, "failed to create runtime for reachability probe");
            return false;
        }
    };

    rt.block_on(probe(host, port, timeout))
}

/// Async probe. The socket is dropped on every path, including timeout,
/// where the pending connect is cancelled.
pub async fn probe(host: &str, port: u16, timeout: Duration) -> bool {
    debug!(host, port, timeout_ms = timeout.as_millis() as u64, "probing");

    let reachable = match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => {
            drop(stream);
            true
        }
        Ok(Err(e)) => {
            debug!(host, port, error = %e, "connect failed");
            false
        }
        Err(_) => {
            debug!(host, port, "connect timed out");
            false
        }
    };

    debug!(host, port, reachable, "probe finished");
    reachable
}
