//! # Cascade Outcome Model
//!
//! A cascade run produces one status line per step it walked through and a single
//! [`TerminalOutcome`] naming the method that connected, if any.

use std::fmt;

use crate::error::{ErrorClass, ProbeError};
use crate::network::probe::SrvRecord;

/// Final, immutable result of running the cascade once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalOutcome {
    ConnectedHttp,
    ConnectedHttps,
    ConnectedSrv(SrvRecord),
    ConnectedAlpn(String),
    ConnectedWebSocket,
    NoConnectivity,
}

impl TerminalOutcome {
    pub fn is_connected(&self) -> bool {
        !matches!(self, TerminalOutcome::NoConnectivity)
    }
}

impl fmt::Display for TerminalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalOutcome::ConnectedHttp => f.write_str("connected over HTTP"),
            TerminalOutcome::ConnectedHttps => f.write_str("connected over HTTPS"),
            TerminalOutcome::ConnectedSrv(record) => write!(f, "connected via SRV ({record})"),
            TerminalOutcome::ConnectedAlpn(protocol) => {
                write!(f, "connected via ALPN ({protocol})")
            }
            TerminalOutcome::ConnectedWebSocket => f.write_str("connected over WebSocket"),
            TerminalOutcome::NoConnectivity => f.write_str("no connectivity"),
        }
    }
}

/// The four steps of the cascade, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Http,
    Https,
    SrvAlpn,
    WebSocket,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Http => "HTTP",
            Step::Https => "HTTPS",
            Step::SrvAlpn => "SRV/ALPN",
            Step::WebSocket => "WebSocket",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Connected,
    Failed,
    Skipped,
}

/// One status line of a cascade run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: Step,
    pub status: StepStatus,
    /// Status code, negotiated protocol, SRV endpoint, or the failure cause.
    pub detail: String,
    /// Set on failed steps only.
    pub class: Option<ErrorClass>,
}

impl StepReport {
    pub fn connected(step: Step, detail: impl Into<String>) -> Self {
        Self { step, status: StepStatus::Connected, detail: detail.into(), class: None }
    }

    pub fn failed(step: Step, cause: &ProbeError) -> Self {
        Self {
            step,
            status: StepStatus::Failed,
            detail: cause.to_string(),
            class: Some(cause.class()),
        }
    }

    pub fn skipped(step: Step, detail: impl Into<String>) -> Self {
        Self { step, status: StepStatus::Skipped, detail: detail.into(), class: None }
    }

    /// Replaces the rendered detail, keeping status and class.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.status {
            StepStatus::Connected => "succeeded",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        };
        write!(f, "{} probe {}: {}", self.step, verb, self.detail)
    }
}
