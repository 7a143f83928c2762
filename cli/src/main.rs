mod commands;
mod terminal;

use std::str::FromStr;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use commands::{CommandLine, probe};
use probr_common::network::target::Target;
use probr_common::warn;
use terminal::{logging, print, spinner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg = commands.config();

    logging::init_logging();

    let raw = match &commands.target {
        Some(target) => target.clone(),
        None => prompt_target().await?,
    };
    let target = Target::from_str(&raw)?;

    print::banner(cfg.quiet);

    tokio::select! {
        result = probe::probe(target, &cfg, commands.recon()) => result,
        _ = tokio::signal::ctrl_c() => {
            spinner::get_spinner().finish_and_clear();
            warn!("Interrupted, probes in flight were dropped");
            Ok(())
        }
    }
}

async fn prompt_target() -> anyhow::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Target (IP or domain): ").await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("could not read the target from stdin")?;
    Ok(line)
}
