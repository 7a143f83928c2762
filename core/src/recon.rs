//! # Fallback Reconnaissance
//!
//! What runs once the cascade has run out of protocols to try. Reconnaissance is
//! best effort: its failures are logged by whoever runs it and never change the
//! outcome of the cascade.

use std::net::IpAddr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use probr_common::network::target::Target;
use probr_common::warn;

mod local;
mod sweep;

pub use local::LocalNetworkRecon;
pub use sweep::{PortState, PortSweepRecon};

#[async_trait]
pub trait Reconnaissance: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &'static str;

    async fn run(&self, target: &Target) -> anyhow::Result<()>;
}

/// Does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRecon;

#[async_trait]
impl Reconnaissance for NoRecon {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn run(&self, _target: &Target) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Runs several procedures in order. One failing does not stop the next.
#[derive(Default)]
pub struct ChainedRecon {
    steps: Vec<Box<dyn Reconnaissance>>,
}

impl ChainedRecon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, step: impl Reconnaissance + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[async_trait]
impl Reconnaissance for ChainedRecon {
    fn name(&self) -> &'static str {
        "chained"
    }

    async fn run(&self, target: &Target) -> anyhow::Result<()> {
        for step in &self.steps {
            if let Err(e) = step.run(target).await {
                warn!("{} reconnaissance failed: {e:#}", step.name());
            }
        }
        Ok(())
    }
}

const RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Addresses the target's host stands for. IP literals are returned as is.
pub async fn resolve_addrs(target: &Target) -> anyhow::Result<Vec<IpAddr>> {
    if let Some(ip) = target.ip() {
        return Ok(vec![ip]);
    }

    let lookup = tokio::net::lookup_host((target.host(), 0));
    let mut addrs: Vec<IpAddr> = tokio::time::timeout(RESOLVE_TIMEOUT, lookup)
        .await
        .with_context(|| format!("resolving '{}' timed out", target.host()))?
        .with_context(|| format!("could not resolve '{}'", target.host()))?
        .map(|addr| addr.ip())
        .collect();

    addrs.sort();
    addrs.dedup();
    Ok(addrs)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
