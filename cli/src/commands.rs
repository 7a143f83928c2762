pub mod probe;

use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use probr_common::config::{Config, DEFAULT_USER_AGENT};
use probr_core::recon::{ChainedRecon, LocalNetworkRecon, NoRecon, PortSweepRecon, Reconnaissance};

#[derive(Parser)]
#[command(name = "probr")]
#[command(version, about = "Finds out which protocol a host answers on.")]
pub struct CommandLine {
    /// IP address or domain name, optionally with a scheme, port and path.
    /// Read from stdin when omitted.
    pub target: Option<String>,

    /// Seconds each probe may take
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Print less: -q drops headers and trees, -qq only prints the outcome
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Stop after the cascade without running any reconnaissance
    #[arg(long)]
    pub no_fallback: bool,

    /// What to run when nothing answers
    #[arg(long, value_enum, default_value_t = ReconMode::Off)]
    pub recon: ReconMode,

    /// Seconds reconnaissance may run before it is abandoned
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub recon_timeout: u64,

    /// Skip the OPTIONS request that lists allowed methods
    #[arg(long)]
    pub no_methods: bool,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReconMode {
    #[value(name = "none")]
    Off,
    /// Local interfaces and the route towards the target
    Local,
    /// TCP connect sweep of common ports
    Sweep,
    /// Local, then sweep
    All,
}

impl ReconMode {
    pub fn build(self) -> Arc<dyn Reconnaissance> {
        match self {
            ReconMode::Off => Arc::new(NoRecon),
            ReconMode::Local => Arc::new(LocalNetworkRecon),
            ReconMode::Sweep => Arc::new(PortSweepRecon::new()),
            ReconMode::All => Arc::new(
                ChainedRecon::new()
                    .then(LocalNetworkRecon)
                    .then(PortSweepRecon::new()),
            ),
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            timeout: Duration::from_secs(self.timeout),
            quiet: self.quiet.min(2),
            no_fallback: self.no_fallback,
            recon_timeout: Duration::from_secs(self.recon_timeout),
            no_methods: self.no_methods,
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn recon(&self) -> Arc<dyn Reconnaissance> {
        self.recon.build()
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
