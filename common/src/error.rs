//! # Error taxonomy
//!
//! Probe failures are values, not control flow: every probe converts whatever went
//! wrong into a [`ProbeError`] at its own boundary and hands it to the cascade,
//! which only ever reports it.

use thiserror::Error;

/// Why a single probe did not establish connectivity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    #[error("connection refused")]
    ConnectionRefused,

    #[error("timeout")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("TLS handshake failed: {0}")]
    Tls(String),

    #[error("NXDOMAIN")]
    NxDomain,

    #[error("no answer")]
    NoAnswer,

    #[error("no ALPN protocol negotiated")]
    NoAlpn,

    #[error("upgrade rejected: {0}")]
    UpgradeRejected(String),
}

/// Coarse grouping of [`ProbeError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// DNS failure, refused connection, timeout.
    Transport,
    /// Handshake or certificate failure.
    Tls,
    /// The peer answered, but not with the protocol we asked for.
    ProtocolAbsent,
}

impl ProbeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Dns(_) | Self::ConnectionRefused | Self::Timeout | Self::Transport(_) => {
                ErrorClass::Transport
            }
            Self::Tls(_) => ErrorClass::Tls,
            Self::NxDomain | Self::NoAnswer | Self::NoAlpn | Self::UpgradeRejected(_) => {
                ErrorClass::ProtocolAbsent
            }
        }
    }
}

/// Failure of a best-effort enrichment step. Never shown to the user as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichmentError {
    #[error("OPTIONS request failed: {0}")]
    Options(String),

    #[error("OPTIONS request timed out")]
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("target is empty")]
    Empty,

    #[error("no host found in '{0}'")]
    MissingHost(String),

    #[error("invalid port in '{0}'")]
    InvalidPort(String),
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
