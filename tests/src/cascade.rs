use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use probr_common::config::Config;
use probr_common::error::ProbeError;
use probr_common::network::outcome::{Step, StepStatus, TerminalOutcome};
use probr_common::network::probe::{HttpMeta, ProbeResult, SrvRecord};
use probr_common::network::response::ContentCategory;
use probr_common::network::target::{Scheme, Target};
use probr_core::classifier::ResponseClassifier;
use probr_core::{Cascade, NetworkProber, Prober};
use probr_protocols::http;

use crate::support::{self, CountingRecon, Recorder};

const HTML_PAGE: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

/// Plain HTTP goes to a port that never answers; HTTPS is scripted to return JSON.
struct SlowPlainFastTls {
    silent_port: u16,
    cfg: Config,
    later_steps: Arc<AtomicUsize>,
}

#[async_trait]
impl Prober for SlowPlainFastTls {
    async fn http(&self, _target: &Target) -> ProbeResult<HttpMeta> {
        let silent = support::target(&format!("127.0.0.1:{}", self.silent_port));
        http::probe(&silent, Scheme::Http, &self.cfg).await
    }

    async fn https(&self, target: &Target) -> ProbeResult<HttpMeta> {
        Ok(HttpMeta {
            url: target.url(Scheme::Https),
            status: 200,
            headers: [("Content-Type", "application/json")].into_iter().collect(),
        })
    }

    async fn srv(&self, _domain: &str) -> ProbeResult<SrvRecord> {
        self.later_steps.fetch_add(1, Ordering::SeqCst);
        Err(ProbeError::NoAnswer)
    }

    async fn alpn(&self, _domain: &str) -> ProbeResult<String> {
        self.later_steps.fetch_add(1, Ordering::SeqCst);
        Err(ProbeError::NoAlpn)
    }

    async fn websocket(&self, _target: &Target) -> ProbeResult<()> {
        self.later_steps.fetch_add(1, Ordering::SeqCst);
        Err(ProbeError::UpgradeRejected("HTTP 404".into()))
    }
}

#[tokio::test]
async fn html_site_connects_over_plain_http() {
    let port = support::serve(HTML_PAGE, "GET, HEAD, OPTIONS").await;
    let cfg = support::quick_config();
    let recorder = Recorder::default();

    let cascade = Cascade::new(NetworkProber::new(cfg.clone()))
        .with_classifier(ResponseClassifier::standard(&cfg))
        .with_reporter(recorder.clone());
    let discovery = cascade.run(&support::target(&format!("127.0.0.1:{port}"))).await;

    assert_eq!(discovery.outcome, TerminalOutcome::ConnectedHttp);
    let classified = discovery.classification.unwrap();
    assert_eq!(classified.category, ContentCategory::Html);
    assert_eq!(
        classified.allowed_methods.into_iter().collect::<Vec<_>>(),
        ["GET", "HEAD", "OPTIONS"]
    );

    let reports = recorder.reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].step, Step::Http);
    assert_eq!(reports[0].status, StepStatus::Connected);
    assert_eq!(reports[0].detail, "HTTP 200");
}

#[tokio::test]
async fn api_host_times_out_on_http_and_answers_json_over_https() {
    let cfg = Config {
        timeout: std::time::Duration::from_millis(300),
        ..Config::default()
    };
    let later_steps = Arc::new(AtomicUsize::new(0));
    let prober = SlowPlainFastTls {
        silent_port: support::silent_port().await,
        cfg,
        later_steps: later_steps.clone(),
    };
    let recorder = Recorder::default();

    let cascade = Cascade::new(prober).with_reporter(recorder.clone());
    let discovery = cascade.run(&support::target("api.example.com")).await;

    assert_eq!(discovery.outcome, TerminalOutcome::ConnectedHttps);
    assert_eq!(
        discovery.classification.map(|c| c.category),
        Some(ContentCategory::Json)
    );
    assert_eq!(
        discovery.response.map(|meta| meta.url),
        Some("https://api.example.com/".to_string())
    );

    let reports = recorder.reports.lock().unwrap();
    assert_eq!(reports[0].detail, "timeout");
    assert_eq!(reports.len(), 2);
    assert_eq!(later_steps.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn closed_local_port_exhausts_every_step() {
    let port = support::closed_port().await;
    let recorder = Recorder::default();
    let recon_runs = Arc::new(AtomicUsize::new(0));

    let cascade = Cascade::new(NetworkProber::new(support::quick_config()))
        .with_reporter(recorder.clone())
        .with_recon(Arc::new(CountingRecon(recon_runs.clone())));
    let outcome = cascade.discover(&support::target(&format!("127.0.0.1:{port}"))).await;

    assert_eq!(outcome, TerminalOutcome::NoConnectivity);
    assert_eq!(
        recorder.failures(),
        [Step::Http, Step::Https, Step::SrvAlpn, Step::WebSocket]
    );
    assert_eq!(recorder.fallback_count(), 1);
    assert_eq!(recon_runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unreachable_target_gives_the_same_outcome_twice() {
    let port = support::closed_port().await;
    let cascade = Cascade::new(NetworkProber::new(support::quick_config()))
        .with_reporter(Recorder::default());
    let unreachable = support::target(&format!("127.0.0.1:{port}"));

    let first = cascade.discover(&unreachable).await;
    let second = cascade.discover(&unreachable).await;

    assert_eq!(first, TerminalOutcome::NoConnectivity);
    assert_eq!(first, second);
}

#[tokio::test]
#[ignore]
async fn nonexistent_domain_reports_four_failures() {
    let recorder = Recorder::default();
    let cascade = Cascade::new(NetworkProber::new(Config::default())).with_reporter(recorder.clone());

    let outcome = cascade.discover(&support::target("nonexistent.invalid")).await;

    assert_eq!(outcome, TerminalOutcome::NoConnectivity);
    assert_eq!(recorder.failures().len(), 4);
    assert_eq!(recorder.fallback_count(), 1);
}
