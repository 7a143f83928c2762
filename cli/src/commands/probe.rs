use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::*;

use crate::pprint;
use crate::terminal::{colors, format, print, spinner};
use probr_common::config::Config;
use probr_common::error::ErrorClass;
use probr_common::network::outcome::{Step, StepReport, StepStatus};
use probr_common::network::target::{Scheme, Target};
use probr_common::{error, info, success, warn};
use probr_core::classifier::ResponseClassifier;
use probr_core::recon::Reconnaissance;
use probr_core::{Cascade, Discovery, NetworkProber, Reporter};

/// Prints step reports and moves the spinner on to the next probe.
struct TerminalReporter {
    quiet: u8,
}

impl Reporter for TerminalReporter {
    fn step(&self, report: &StepReport) {
        if let Some(next) = next_step(report) {
            spinner::report_probe_progress(next);
        }
        if self.quiet > 1 {
            return;
        }
        match report.status {
            StepStatus::Connected => success!("{report}"),
            StepStatus::Failed if report.class == Some(ErrorClass::Tls) => error!("{report}"),
            StepStatus::Failed => warn!("{report}"),
            StepStatus::Skipped => info!("{report}"),
        }
    }

    fn fallback(&self, target: &Target) {
        spinner::report_probe_progress("reconnaissance");
        if self.quiet < 2 {
            warn!("No connectivity to {target}, falling back to reconnaissance");
        }
    }
}

fn next_step(report: &StepReport) -> Option<&'static str> {
    if report.status == StepStatus::Connected {
        return None;
    }
    match report.step {
        Step::Http => Some("HTTPS"),
        Step::Https => Some("SRV/ALPN"),
        Step::SrvAlpn => Some("WebSocket"),
        Step::WebSocket => None,
    }
}

pub async fn probe(
    target: Target,
    cfg: &Config,
    recon: Arc<dyn Reconnaissance>,
) -> anyhow::Result<()> {
    print::header("protocol discovery", cfg.quiet);
    if cfg.quiet == 0 {
        print::aligned_line("Target", target.raw());
        print::aligned_line("Timeout", format!("{}s per probe", cfg.timeout.as_secs()));
        let recon_name = if cfg.no_fallback { "off" } else { recon.name() };
        print::aligned_line("Recon", recon_name);
    }

    match target.scheme() {
        Some(Scheme::Https) => spinner::report_probe_progress("HTTPS"),
        _ => spinner::report_probe_progress("HTTP"),
    }

    let cascade = Cascade::new(NetworkProber::new(cfg.clone()))
        .with_classifier(ResponseClassifier::standard(cfg))
        .with_recon(recon)
        .with_config(cfg)
        .with_reporter(TerminalReporter { quiet: cfg.quiet });

    let start_time: Instant = Instant::now();
    let discovery: Discovery = cascade.run(&target).await;
    spinner::get_spinner().finish_and_clear();

    discovery_ends(&target, &discovery, start_time.elapsed(), cfg);
    Ok(())
}

fn discovery_ends(target: &Target, discovery: &Discovery, total_time: Duration, cfg: &Config) {
    if cfg.quiet == 0 {
        pprint!();
        print::header("result", cfg.quiet);
        print_result_tree(target, discovery);
    }
    print_summary(discovery, total_time, cfg);
}

fn print_result_tree(target: &Target, discovery: &Discovery) {
    print::tree_head(target.raw());
    let details = match (&discovery.response, &discovery.classification) {
        (Some(meta), Some(classified)) => format::response_to_details(meta, classified),
        _ => format::outcome_to_details(&discovery.outcome),
    };
    print::as_tree_one_level(details);
}

fn print_summary(discovery: &Discovery, total_time: Duration, cfg: &Config) {
    let outcome: ColoredString = discovery
        .outcome
        .to_string()
        .bold()
        .color(format::outcome_color(&discovery.outcome));
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Discovery complete: {outcome} in {total_time}").color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ if discovery.outcome.is_connected() => success!("{}", output),
        _ => warn!("{}", output),
    }
}
