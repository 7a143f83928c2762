//! WebSocket upgrade handshake over TLS.

use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::{Connector, connect_async_tls_with_config};

use probr_common::config::Config;
use probr_common::debug;
use probr_common::error::ProbeError;
use probr_common::network::probe::ProbeResult;
use probr_common::network::target::Target;

use crate::tls;

/// `wss://` URL for `target`, keeping its port and path.
pub fn ws_url(target: &Target) -> String {
    format!("wss://{}{}", target.authority(), target.path())
}

/// Attempts the upgrade and closes the socket as soon as the server switched protocols.
pub async fn probe(target: &Target, cfg: &Config) -> ProbeResult<()> {
    let url = ws_url(target);
    debug!("WebSocket upgrade {url}");

    let connector = Connector::Rustls(tls::client_config(&[])?);

    crate::bounded(cfg.timeout, async {
        let (mut stream, response) =
            connect_async_tls_with_config(url.as_str(), None, false, Some(connector))
                .await
                .map_err(from_ws_error)?;

        debug!("WebSocket upgrade answered {}", response.status());
        let _ = stream.close(None).await;
        Ok(())
    })
    .await
}

fn from_ws_error(err: WsError) -> ProbeError {
    match err {
        WsError::Http(response) => {
            ProbeError::UpgradeRejected(format!("HTTP {}", response.status().as_u16()))
        }
        WsError::Io(io_err) => crate::from_io(&io_err),
        WsError::Tls(tls_err) => ProbeError::Tls(tls_err.to_string()),
        WsError::Protocol(protocol_err) => ProbeError::UpgradeRejected(protocol_err.to_string()),
        WsError::Url(url_err) => ProbeError::Transport(url_err.to_string()),
        other => ProbeError::Transport(other.to_string()),
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::time::Duration;
    use tokio::net::TcpListener;

    #[test]
    fn ws_url_keeps_port_and_path() {
        let target = Target::from_str("https://example.com:8443/socket").unwrap();
        assert_eq!(ws_url(&target), "wss://example.com:8443/socket");

        let bare = Target::from_str("example.com").unwrap();
        assert_eq!(ws_url(&bare), "wss://example.com/");
    }

    #[test]
    fn io_errors_keep_their_cause() {
        let err = WsError::Io(std::io::Error::from(std::io::ErrorKind::ConnectionRefused));
        assert_eq!(from_ws_error(err), ProbeError::ConnectionRefused);
    }

    #[test]
    fn refused_upgrade_names_the_status() {
        use tokio_tungstenite::tungstenite::http::Response;

        let not_found: Response<Option<Vec<u8>>> =
            Response::builder().status(404).body(None).unwrap();
        let err = WsError::Http(not_found.into());
        assert_eq!(
            from_ws_error(err),
            ProbeError::UpgradeRejected("HTTP 404".to_string())
        );
    }

    #[tokio::test]
    async fn closed_port_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let target = Target::from_str(&format!("127.0.0.1:{port}")).unwrap();
        let cfg = Config {
            timeout: Duration::from_millis(500),
            ..Config::default()
        };
        let result = probe(&target, &cfg).await;
        assert_eq!(result, Err(ProbeError::ConnectionRefused));
    }
}
