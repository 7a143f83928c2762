//! TLS handshake that reports which application protocol the server picked.

use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use probr_common::config::Config;
use probr_common::debug;
use probr_common::error::ProbeError;
use probr_common::network::probe::ProbeResult;

use crate::tls;

pub const ALPN_PORT: u16 = 443;
pub const OFFERED_PROTOCOLS: [&str; 2] = ["h2", "http/1.1"];

/// Negotiates ALPN with `domain` on port 443.
pub async fn probe(domain: &str, cfg: &Config) -> ProbeResult<String> {
    probe_at(domain, ALPN_PORT, cfg).await
}

pub async fn probe_at(domain: &str, port: u16, cfg: &Config) -> ProbeResult<String> {
    let config = tls::client_config(&OFFERED_PROTOCOLS)?;
    let server_name = tls::server_name(domain)?;
    let addr = (domain.trim_end_matches('.'), port);

    crate::bounded(cfg.timeout, async {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| crate::from_io(&e))?;

        let connector = TlsConnector::from(config);
        let tls_stream = connector
            .connect(server_name, stream)
            .await
            .map_err(|e| crate::from_io(&e))?;

        let (_, session) = tls_stream.get_ref();
        let negotiated = session
            .alpn_protocol()
            .map(|proto| String::from_utf8_lossy(proto).into_owned());

        debug!("ALPN {domain}:{port} negotiated {negotiated:?}");
        negotiated.ok_or(ProbeError::NoAlpn)
    })
    .await
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
