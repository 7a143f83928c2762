//! Single-protocol connectivity probes.
//!
//! Every probe shares one contract: one attempt, bounded by a timeout, converting
//! whatever goes wrong into a [`ProbeError`]. Nothing in here retries or decides what
//! to try next; that is the cascade's job.

use std::error::Error as StdError;
use std::future::Future;
use std::io;
use std::time::Duration;

use probr_common::error::ProbeError;

pub mod alpn;
pub mod http;
pub mod srv;
pub mod tls;
pub mod websocket;

/// Runs `fut` under `limit`, turning an elapsed timer into [`ProbeError::Timeout`].
pub(crate) async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, ProbeError>
where
    F: Future<Output = Result<T, ProbeError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_elapsed) => Err(ProbeError::Timeout),
    }
}

/// Maps a socket level error onto the probe taxonomy.
pub(crate) fn from_io(err: &io::Error) -> ProbeError {
    if let Some(tls) = rustls_cause(err) {
        return ProbeError::Tls(tls.to_string());
    }
    match err.kind() {
        io::ErrorKind::ConnectionRefused => ProbeError::ConnectionRefused,
        io::ErrorKind::TimedOut => ProbeError::Timeout,
        _ => {
            let msg = err.to_string();
            if looks_like_dns_failure(&msg) {
                ProbeError::Dns(msg)
            } else {
                ProbeError::Transport(msg)
            }
        }
    }
}

// hyper wraps the rustls error in more than one io::Error layer
fn rustls_cause(err: &io::Error) -> Option<&tokio_rustls::rustls::Error> {
    let inner = err.get_ref()?;
    match inner.downcast_ref::<tokio_rustls::rustls::Error>() {
        Some(tls) => Some(tls),
        None => inner.downcast_ref::<io::Error>().and_then(rustls_cause),
    }
}

/// Walks an error's source chain looking for the most specific cause.
pub(crate) fn from_chain(err: &(dyn StdError + 'static)) -> ProbeError {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(cause) = current {
        if let Some(tls) = cause.downcast_ref::<tokio_rustls::rustls::Error>() {
            return ProbeError::Tls(tls.to_string());
        }
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return from_io(io_err);
        }
        if looks_like_dns_failure(&cause.to_string()) {
            return ProbeError::Dns(innermost(cause).to_string());
        }
        current = cause.source();
    }
    ProbeError::Transport(innermost(err).to_string())
}

fn innermost<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    let mut current = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current
}

// getaddrinfo wording differs per platform
fn looks_like_dns_failure(msg: &str) -> bool {
    let msg = msg.to_ascii_lowercase();
    msg.contains("dns error")
        || msg.contains("failed to lookup address")
        || msg.contains("name or service not known")
        || msg.contains("nodename nor servname")
        || msg.contains("no such host")
        || msg.contains("name resolution")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
