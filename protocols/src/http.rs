//! Plain and TLS-secured HTTP probes, plus the OPTIONS request the classifier uses.

use std::collections::BTreeSet;

use reqwest::{Client, Method, Response, redirect};

use probr_common::config::Config;
use probr_common::debug;
use probr_common::error::{EnrichmentError, ProbeError};
use probr_common::network::probe::{Headers, HttpMeta, ProbeResult};
use probr_common::network::target::{Scheme, Target};

const MAX_REDIRECTS: usize = 10;

/// Issues one GET against `target` using `scheme`.
///
/// Any completed response counts as connectivity, whatever its status code.
pub async fn probe(target: &Target, scheme: Scheme, cfg: &Config) -> ProbeResult<HttpMeta> {
    let url = target.url(scheme);
    debug!("GET {url}");

    crate::bounded(cfg.timeout, async {
        let client = build_client(cfg)?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(from_reqwest)?;
        Ok(to_meta(response))
    })
    .await
}

/// Sends OPTIONS to the target's effective URL and returns the parsed `Allow` header.
pub async fn options(target: &Target, cfg: &Config) -> Result<BTreeSet<String>, EnrichmentError> {
    let url = target.effective_url();
    debug!("OPTIONS {url}");

    let request = async {
        let client = build_client(cfg).map_err(|e| EnrichmentError::Options(e.to_string()))?;
        let response = client
            .request(Method::OPTIONS, &url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Options(from_reqwest(e).to_string()))?;
        let allow = response
            .headers()
            .get(reqwest::header::ALLOW)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        Ok(parse_allow(allow))
    };

    match tokio::time::timeout(cfg.timeout, request).await {
        Ok(result) => result,
        Err(_elapsed) => Err(EnrichmentError::Timeout),
    }
}

/// Splits an `Allow` header value into upper-cased method names.
pub fn parse_allow(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|method| !method.is_empty())
        .map(str::to_ascii_uppercase)
        .collect()
}

// A fresh client per probe: no pooled connection outlives the probe that opened it.
// Proxies are ignored, the probe is about direct reachability.
fn build_client(cfg: &Config) -> Result<Client, ProbeError> {
    Client::builder()
        .use_rustls_tls()
        .no_proxy()
        .user_agent(&cfg.user_agent)
        .timeout(cfg.timeout)
        .connect_timeout(cfg.timeout)
        .redirect(redirect::Policy::limited(MAX_REDIRECTS))
        .pool_max_idle_per_host(0)
        .build()
        .map_err(|e| ProbeError::Transport(e.to_string()))
}

fn from_reqwest(err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout
    } else {
        crate::from_chain(&err)
    }
}

fn to_meta(response: Response) -> HttpMeta {
    let headers: Headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    HttpMeta {
        url: response.url().to_string(),
        status: response.status().as_u16(),
        headers,
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
