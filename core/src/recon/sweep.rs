use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tokio::time::timeout;

use probr_common::network::target::Target;
use probr_common::{info, success};

use super::{Reconnaissance, resolve_addrs};

pub const COMMON_PORTS: &[u16] = &[
    21, 22, 25, 53, 80, 110, 143, 443, 465, 587, 993, 995, 3306, 5432, 6379, 8000, 8080, 8443,
];

const PORT_TIMEOUT: Duration = Duration::from_millis(750);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    Open,
    /// Actively refused: the host is up, the port is not.
    Closed,
    /// No answer within the timeout, or an error other than a refusal.
    Filtered,
}

/// TCP connect sweep over a short list of well known ports.
pub struct PortSweepRecon {
    ports: Vec<u16>,
    port_timeout: Duration,
}

impl Default for PortSweepRecon {
    fn default() -> Self {
        Self {
            ports: COMMON_PORTS.to_vec(),
            port_timeout: PORT_TIMEOUT,
        }
    }
}

impl PortSweepRecon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ports(mut self, ports: impl Into<Vec<u16>>) -> Self {
        self.ports = ports.into();
        self
    }

    pub fn with_timeout(mut self, port_timeout: Duration) -> Self {
        self.port_timeout = port_timeout;
        self
    }

    /// Probes every configured port on `addr` at once. Results are sorted by port.
    pub async fn sweep(&self, addr: IpAddr) -> Vec<(u16, PortState)> {
        let mut probes = JoinSet::new();
        for &port in &self.ports {
            let limit = self.port_timeout;
            probes.spawn(async move {
                (port, handshake_probe(SocketAddr::new(addr, port), limit).await)
            });
        }

        let mut results = Vec::with_capacity(self.ports.len());
        while let Some(joined) = probes.join_next().await {
            if let Ok(result) = joined {
                results.push(result);
            }
        }
        results.sort_by_key(|(port, _)| *port);
        results
    }
}

#[async_trait]
impl Reconnaissance for PortSweepRecon {
    fn name(&self) -> &'static str {
        "port sweep"
    }

    async fn run(&self, target: &Target) -> anyhow::Result<()> {
        let addrs = resolve_addrs(target).await?;
        if addrs.is_empty() {
            anyhow::bail!("'{}' resolved to no address", target.host());
        }

        for addr in addrs {
            let results = self.sweep(addr).await;
            let open: Vec<String> = results
                .iter()
                .filter(|(_, state)| *state == PortState::Open)
                .map(|(port, _)| port.to_string())
                .collect();
            let closed = results
                .iter()
                .filter(|(_, state)| *state == PortState::Closed)
                .count();

            if open.is_empty() {
                info!(
                    "{addr}: no open port among {} ({closed} refused, {} silent)",
                    results.len(),
                    results.len() - closed
                );
            } else {
                success!("{addr}: open TCP port(s) {}", open.join(", "));
            }
        }

        Ok(())
    }
}

pub async fn handshake_probe(addr: SocketAddr, limit: Duration) -> PortState {
    match timeout(limit, TcpStream::connect(addr)).await {
        Ok(Ok(_stream)) => PortState::Open,
        Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => PortState::Closed,
        Ok(Err(_)) | Err(_) => PortState::Filtered,
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
