//! DNS SRV discovery for `_http._tcp.<domain>`.

use std::time::Duration;

use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;

use probr_common::config::Config;
use probr_common::debug;
use probr_common::error::ProbeError;
use probr_common::network::probe::{ProbeResult, SrvRecord};

pub const SERVICE_PREFIX: &str = "_http._tcp";

/// An SRV answer before selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvCandidate {
    pub priority: u16,
    pub weight: u16,
    pub target: String,
    pub port: u16,
}

/// Resolves the HTTP service record for `domain` with the system resolver.
pub async fn probe(domain: &str, cfg: &Config) -> ProbeResult<SrvRecord> {
    let resolver = build_resolver(cfg.timeout);
    probe_with(&resolver, domain, cfg).await
}

pub async fn probe_with(
    resolver: &TokioAsyncResolver,
    domain: &str,
    cfg: &Config,
) -> ProbeResult<SrvRecord> {
    let name = service_name(domain);
    debug!("SRV lookup {name}");

    crate::bounded(cfg.timeout, async {
        let lookup = resolver
            .srv_lookup(name.as_str())
            .await
            .map_err(|e| from_resolve_error(&e))?;

        let candidates = lookup.iter().map(|srv| SrvCandidate {
            priority: srv.priority(),
            weight: srv.weight(),
            target: srv.target().to_utf8(),
            port: srv.port(),
        });

        select_record(candidates).ok_or(ProbeError::NoAnswer)
    })
    .await
}

pub fn service_name(domain: &str) -> String {
    format!("{SERVICE_PREFIX}.{}.", domain.trim_end_matches('.'))
}

/// Picks the lowest priority, then the highest weight.
///
/// A lone record whose target is `.` means the service is decidedly not offered.
pub fn select_record(candidates: impl IntoIterator<Item = SrvCandidate>) -> Option<SrvRecord> {
    candidates
        .into_iter()
        .filter(|c| !c.target.is_empty() && c.target != ".")
        .min_by(|a, b| a.priority.cmp(&b.priority).then(b.weight.cmp(&a.weight)))
        .map(|c| SrvRecord {
            target: c.target.trim_end_matches('.').to_string(),
            port: c.port,
        })
}

pub fn build_resolver(timeout: Duration) -> TokioAsyncResolver {
    let (config, mut opts) = hickory_resolver::system_conf::read_system_conf()
        .unwrap_or_else(|_| (ResolverConfig::default(), ResolverOpts::default()));
    opts.timeout = timeout;
    opts.attempts = 1;
    TokioAsyncResolver::tokio(config, opts)
}

fn from_resolve_error(err: &ResolveError) -> ProbeError {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if *response_code == ResponseCode::NXDomain =>
        {
            ProbeError::NxDomain
        }
        ResolveErrorKind::NoRecordsFound { .. } => ProbeError::NoAnswer,
        ResolveErrorKind::Timeout => ProbeError::Timeout,
        ResolveErrorKind::Io(io_err) => crate::from_io(io_err),
        _ => ProbeError::Dns(err.to_string()),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
