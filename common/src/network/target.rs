//! # Probe Target Model
//!
//! A target is whatever the user typed: an IP address or a domain name, optionally
//! decorated with a scheme, a port or a path. Apart from trimming and rejecting empty
//! input no validation happens here; a target that cannot be reached is the probes'
//! problem, not the parser's.

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

use crate::error::TargetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The host being probed. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    raw: String,
    scheme: Option<Scheme>,
    host: String,
    port: Option<u16>,
    path: String,
}

impl FromStr for Target {
    type Err = TargetError;

    /// Parses user input into a `Target`.
    ///
    /// Accepted shapes:
    /// * **Host**: `example.com`, `192.168.1.5`, `::1`
    /// * **Host and port**: `example.com:8080`, `[::1]:8443`
    /// * **URL-ish**: `https://example.com/status`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(TargetError::Empty);
        }

        let (scheme, rest) = split_scheme(raw);
        let (authority, path) = split_path(rest);
        let authority = strip_userinfo(authority);
        let (host, port) = split_host_port(authority, raw)?;

        if host.is_empty() {
            return Err(TargetError::MissingHost(raw.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            scheme,
            host: host.to_string(),
            port,
            path: path.to_string(),
        })
    }
}

impl Target {
    /// The trimmed input, exactly as typed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Bare host: no scheme, port, path or IPv6 brackets.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The scheme carried by the input (or set by [`Target::with_scheme`]).
    pub fn scheme(&self) -> Option<Scheme> {
        self.scheme
    }

    pub fn is_ip(&self) -> bool {
        self.ip().is_some()
    }

    pub fn ip(&self) -> Option<IpAddr> {
        self.host.parse::<IpAddr>().ok()
    }

    /// `host[:port]`, with brackets around IPv6 literals.
    pub fn authority(&self) -> String {
        let host = match self.host.parse::<Ipv6Addr>() {
            Ok(_) => format!("[{}]", self.host),
            Err(_) => self.host.clone(),
        };
        match self.port {
            Some(port) => format!("{host}:{port}"),
            None => host,
        }
    }

    /// The URL used to reach this target with the given scheme.
    pub fn url(&self, scheme: Scheme) -> String {
        format!("{}://{}{}", scheme, self.authority(), self.path)
    }

    /// The URL for the scheme this target carries, plain HTTP when it carries none.
    pub fn effective_url(&self) -> String {
        self.url(self.scheme.unwrap_or(Scheme::Http))
    }

    /// A copy of this target rewritten with an explicit scheme.
    pub fn with_scheme(&self, scheme: Scheme) -> Self {
        Self {
            scheme: Some(scheme),
            ..self.clone()
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_scheme(s: &str) -> (Option<Scheme>, &str) {
    let Some((scheme, rest)) = s.split_once("://") else {
        return (None, s);
    };

    match scheme.to_ascii_lowercase().as_str() {
        "http" => (Some(Scheme::Http), rest),
        "https" => (Some(Scheme::Https), rest),
        _ => (None, rest),
    }
}

fn split_path(s: &str) -> (&str, &str) {
    match s.find(['/', '?', '#']) {
        Some(idx) if s[idx..].starts_with('/') => (&s[..idx], &s[idx..]),
        Some(idx) => (&s[..idx], "/"),
        None => (s, "/"),
    }
}

fn strip_userinfo(authority: &str) -> &str {
    match authority.rsplit_once('@') {
        Some((_, host)) => host,
        None => authority,
    }
}

/// Splits `host[:port]`, handling bracketed and bare IPv6 literals.
fn split_host_port<'a>(
    authority: &'a str,
    original: &str,
) -> Result<(&'a str, Option<u16>), TargetError> {
    if let Some(bracketed) = authority.strip_prefix('[') {
        let Some((host, rest)) = bracketed.split_once(']') else {
            return Err(TargetError::MissingHost(original.to_string()));
        };
        let port = match rest.strip_prefix(':') {
            Some(port) => Some(parse_port(port, original)?),
            None => None,
        };
        return Ok((host, port));
    }

    if authority.parse::<Ipv6Addr>().is_ok() {
        return Ok((authority, None));
    }

    match authority.rsplit_once(':') {
        Some((host, port)) => Ok((host, Some(parse_port(port, original)?))),
        None => Ok((authority, None)),
    }
}

fn parse_port(port: &str, original: &str) -> Result<u16, TargetError> {
    port.parse::<u16>()
        .map_err(|_| TargetError::InvalidPort(original.to_string()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
