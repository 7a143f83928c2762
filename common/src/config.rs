use std::time::Duration;

/// Upper bound for a single probe when nothing else is configured.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// How long fallback reconnaissance may run before it is abandoned.
pub const DEFAULT_RECON_TIMEOUT: Duration = Duration::from_secs(60);

pub const DEFAULT_USER_AGENT: &str = concat!("probr/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct Config {
    /// Applied to every probe individually, never to the cascade as a whole.
    pub timeout: Duration,
    /// 0 prints everything, 1 drops headers and trees, 2 only prints the outcome.
    pub quiet: u8,
    /// Skips reconnaissance after the cascade ran out of probes.
    pub no_fallback: bool,
    pub recon_timeout: Duration,
    /// Skips the OPTIONS request used to list the allowed HTTP methods.
    pub no_methods: bool,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
            quiet: 0,
            no_fallback: false,
            recon_timeout: DEFAULT_RECON_TIMEOUT,
            no_methods: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
