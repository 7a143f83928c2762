//! Client TLS configuration shared by the ALPN and WebSocket probes.
//!
//! Certificates are always verified against the bundled webpki roots; there is no
//! switch to turn verification off.

use std::sync::Arc;

use tokio_rustls::rustls::crypto::ring;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};

use probr_common::error::ProbeError;

/// Builds a verifying client config offering `alpn` (in preference order).
pub fn client_config(alpn: &[&str]) -> Result<Arc<ClientConfig>, ProbeError> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let mut config = ClientConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(|e| ProbeError::Tls(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth();

    config.alpn_protocols = alpn.iter().map(|p| p.as_bytes().to_vec()).collect();
    Ok(Arc::new(config))
}

/// SNI name for `host`. IP literals are accepted and verified against IP SANs.
pub fn server_name(host: &str) -> Result<ServerName<'static>, ProbeError> {
    ServerName::try_from(host.trim_end_matches('.').to_string())
        .map_err(|e| ProbeError::Tls(format!("invalid server name '{host}': {e}")))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_config_offers_protocols_in_order() {
        let config = client_config(&["h2", "http/1.1"]).unwrap();
        assert_eq!(
            config.alpn_protocols,
            vec![b"h2".to_vec(), b"http/1.1".to_vec()]
        );
    }

    #[test]
    fn client_config_without_alpn_offers_nothing() {
        let config = client_config(&[]).unwrap();
        assert!(config.alpn_protocols.is_empty());
    }

    #[test]
    fn server_name_accepts_domains_and_ips() {
        assert!(matches!(server_name("example.com."), Ok(ServerName::DnsName(_))));
        assert!(matches!(server_name("192.0.2.1"), Ok(ServerName::IpAddress(_))));
        assert!(server_name("not a host").is_err());
    }
}
