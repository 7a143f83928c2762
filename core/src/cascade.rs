//! # Discovery Cascade
//!
//! Walks a fixed ladder of protocols against one target and stops at the first
//! one that answers:
//!
//! 1. plain HTTP
//! 2. HTTPS
//! 3. SRV lookup, then ALPN negotiation when SRV has nothing usable
//! 4. WebSocket upgrade over TLS
//!
//! When all four steps fail the target has no connectivity and the configured
//! [`Reconnaissance`] runs once. Every step produces exactly one [`StepReport`],
//! handed to the [`Reporter`] as soon as it is known.
//!
//! The cascade never fails: probe errors are values and end up in reports.
//! Reconnaissance is bounded by its own budget and is aborted together with the
//! cascade when the caller drops it.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use probr_common::config::{Config, DEFAULT_RECON_TIMEOUT};
use probr_common::network::outcome::{Step, StepReport, StepStatus, TerminalOutcome};
use probr_common::network::probe::{HttpMeta, ProbeKind};
use probr_common::network::response::ClassifiedResponse;
use probr_common::network::target::{Scheme, Target};
use probr_common::{debug, info, success, warn};

use crate::classifier::ResponseClassifier;
use crate::prober::Prober;
use crate::recon::{NoRecon, Reconnaissance};

/// Receives the cascade's progress.
pub trait Reporter: Send + Sync {
    fn step(&self, report: &StepReport);

    /// Called once, right before reconnaissance starts.
    fn fallback(&self, target: &Target);
}

/// Logs each report through the `probr` tracing targets.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn step(&self, report: &StepReport) {
        match report.status {
            StepStatus::Connected => success!("{report}"),
            StepStatus::Failed => warn!("{report}"),
            StepStatus::Skipped => info!("{report}"),
        }
    }

    fn fallback(&self, target: &Target) {
        warn!("No connectivity to {target}, falling back to reconnaissance");
    }
}

/// What one run of the cascade established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub outcome: TerminalOutcome,
    /// Present when HTTP or HTTPS answered.
    pub classification: Option<ClassifiedResponse>,
    /// Final URL and status of the HTTP(S) response that was classified.
    pub response: Option<HttpMeta>,
}

impl Discovery {
    fn connected(outcome: TerminalOutcome) -> Self {
        Self { outcome, classification: None, response: None }
    }
}

/// Result of the single plain HTTP decision.
#[derive(Debug)]
enum SchemeDecision {
    /// Plain HTTP answered; nothing else needs trying.
    Plain(HttpMeta),
    /// Go straight to TLS, either by request or because plain HTTP failed.
    ForceHttps,
}

pub struct Cascade<P: Prober> {
    prober: P,
    classifier: ResponseClassifier,
    recon: Arc<dyn Reconnaissance>,
    recon_timeout: Duration,
    no_fallback: bool,
    reporter: Box<dyn Reporter>,
}

impl<P: Prober> Cascade<P> {
    /// A cascade with no enrichment, no reconnaissance and a [`TracingReporter`].
    pub fn new(prober: P) -> Self {
        Self {
            prober,
            classifier: ResponseClassifier::default(),
            recon: Arc::new(NoRecon),
            recon_timeout: DEFAULT_RECON_TIMEOUT,
            no_fallback: false,
            reporter: Box::new(TracingReporter),
        }
    }

    /// Takes the reconnaissance budget and `no_fallback` from `cfg`.
    pub fn with_config(mut self, cfg: &Config) -> Self {
        self.recon_timeout = cfg.recon_timeout;
        self.no_fallback = cfg.no_fallback;
        self
    }

    pub fn with_classifier(mut self, classifier: ResponseClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_recon(mut self, recon: Arc<dyn Reconnaissance>) -> Self {
        self.recon = recon;
        self
    }

    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Runs the cascade and returns only its outcome.
    pub async fn discover(&self, target: &Target) -> TerminalOutcome {
        self.run(target).await.outcome
    }

    pub async fn run(&self, target: &Target) -> Discovery {
        let https_target = match self.decide_scheme(target).await {
            SchemeDecision::Plain(meta) => {
                return self.classified(TerminalOutcome::ConnectedHttp, target, meta).await;
            }
            SchemeDecision::ForceHttps => target.with_scheme(Scheme::Https),
        };

        match self.prober.https(&https_target).await {
            Ok(meta) => {
                self.report(StepReport::connected(Step::Https, format!("HTTP {}", meta.status)));
                return self
                    .classified(TerminalOutcome::ConnectedHttps, &https_target, meta)
                    .await;
            }
            Err(e) => self.report(StepReport::failed(Step::Https, &e)),
        }

        if let Some(outcome) = self.srv_or_alpn(target.host()).await {
            return Discovery::connected(outcome);
        }

        match self.prober.websocket(&https_target).await {
            Ok(()) => {
                self.report(StepReport::connected(Step::WebSocket, "101 Switching Protocols"));
                return Discovery::connected(TerminalOutcome::ConnectedWebSocket);
            }
            Err(e) => self.report(StepReport::failed(Step::WebSocket, &e)),
        }

        self.fall_back(target).await;
        Discovery::connected(TerminalOutcome::NoConnectivity)
    }

    /// The only place plain HTTP is ever attempted.
    async fn decide_scheme(&self, target: &Target) -> SchemeDecision {
        if target.scheme() == Some(Scheme::Https) {
            self.report(StepReport::skipped(Step::Http, "target requested HTTPS"));
            return SchemeDecision::ForceHttps;
        }

        match self.prober.http(target).await {
            Ok(meta) => {
                self.report(StepReport::connected(Step::Http, format!("HTTP {}", meta.status)));
                SchemeDecision::Plain(meta)
            }
            Err(e) => {
                self.report(StepReport::failed(Step::Http, &e));
                SchemeDecision::ForceHttps
            }
        }
    }

    /// SRV first; ALPN only when SRV produced no usable record. One report for both.
    async fn srv_or_alpn(&self, domain: &str) -> Option<TerminalOutcome> {
        let srv_err = match self.prober.srv(domain).await {
            Ok(record) => {
                self.report(StepReport::connected(Step::SrvAlpn, format!("SRV {record}")));
                return Some(TerminalOutcome::ConnectedSrv(record));
            }
            Err(e) => e,
        };
        debug!("SRV lookup for {domain} failed: {srv_err}");

        match self.prober.alpn(domain).await {
            Ok(protocol) => {
                self.report(StepReport::connected(Step::SrvAlpn, format!("ALPN {protocol}")));
                Some(TerminalOutcome::ConnectedAlpn(protocol))
            }
            Err(alpn_err) => {
                let detail = format!(
                    "{}: {srv_err}; {}: {alpn_err}",
                    ProbeKind::Srv,
                    ProbeKind::Alpn
                );
                self.report(StepReport::failed(Step::SrvAlpn, &alpn_err).with_detail(detail));
                None
            }
        }
    }

    async fn classified(&self, outcome: TerminalOutcome, target: &Target, meta: HttpMeta) -> Discovery {
        let classification = self.classifier.classify(target, &meta).await;
        Discovery {
            outcome,
            classification: Some(classification),
            response: Some(meta),
        }
    }

    /// Runs reconnaissance on its own task so a panic inside it stays contained.
    /// The task lives in a local [`JoinSet`]: dropping this future aborts it.
    async fn fall_back(&self, target: &Target) {
        self.reporter.fallback(target);
        if self.no_fallback {
            debug!("Reconnaissance disabled");
            return;
        }

        let name = self.recon.name();
        let recon = Arc::clone(&self.recon);
        let owned = target.clone();
        let mut tasks = JoinSet::new();
        tasks.spawn(async move { recon.run(&owned).await });

        match tokio::time::timeout(self.recon_timeout, tasks.join_next()).await {
            Ok(Some(Ok(Ok(())))) => debug!("{name} reconnaissance finished"),
            Ok(Some(Ok(Err(e)))) => warn!("{name} reconnaissance failed: {e:#}"),
            Ok(Some(Err(e))) => warn!("{name} reconnaissance aborted: {e}"),
            Ok(None) => {}
            Err(_elapsed) => warn!(
                "{name} reconnaissance gave up after {:.1}s",
                self.recon_timeout.as_secs_f64()
            ),
        }
    }

    fn report(&self, report: StepReport) {
        self.reporter.step(&report);
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
