//! The seam between the cascade and the network.
//!
//! [`Prober`] names the five single-shot probes the cascade can run. The cascade only
//! ever talks to this trait, so tests can script every outcome without a socket.

use async_trait::async_trait;

use probr_common::config::Config;
use probr_common::network::probe::{HttpMeta, ProbeResult, SrvRecord};
use probr_common::network::target::{Scheme, Target};
use probr_protocols::{alpn, http, srv, websocket};

#[async_trait]
pub trait Prober: Send + Sync {
    async fn http(&self, target: &Target) -> ProbeResult<HttpMeta>;

    async fn https(&self, target: &Target) -> ProbeResult<HttpMeta>;

    /// Looks up `_http._tcp.<domain>`.
    async fn srv(&self, domain: &str) -> ProbeResult<SrvRecord>;

    /// Returns the negotiated application protocol.
    async fn alpn(&self, domain: &str) -> ProbeResult<String>;

    async fn websocket(&self, target: &Target) -> ProbeResult<()>;
}

/// Probes real hosts through the `probr-protocols` crate.
pub struct NetworkProber {
    cfg: Config,
}

impl NetworkProber {
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl Prober for NetworkProber {
    async fn http(&self, target: &Target) -> ProbeResult<HttpMeta> {
        http::probe(target, Scheme::Http, &self.cfg).await
    }

    async fn https(&self, target: &Target) -> ProbeResult<HttpMeta> {
        http::probe(target, Scheme::Https, &self.cfg).await
    }

    async fn srv(&self, domain: &str) -> ProbeResult<SrvRecord> {
        srv::probe(domain, &self.cfg).await
    }

    async fn alpn(&self, domain: &str) -> ProbeResult<String> {
        alpn::probe(domain, &self.cfg).await
    }

    async fn websocket(&self, target: &Target) -> ProbeResult<()> {
        websocket::probe(target, &self.cfg).await
    }
}
