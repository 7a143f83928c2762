use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::terminal::colors;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

pub struct SpinnerHandle {
    spinner: ProgressBar,
}

impl SpinnerHandle {
    pub fn set_message(&self, msg: String) {
        self.spinner.set_message(msg);
    }

    pub fn finish_and_clear(&self) {
        self.spinner.finish_and_clear();
    }

    /// Runs `f` with the spinner wiped from the terminal, then redraws it.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.spinner.suspend(f)
    }
}

static SPINNER: OnceLock<SpinnerHandle> = OnceLock::new();

pub fn get_spinner() -> &'static SpinnerHandle {
    SPINNER.get_or_init(init_spinner)
}

fn init_spinner() -> SpinnerHandle {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS);

    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));

    SpinnerHandle { spinner: pb }
}

pub fn report_probe_progress(probe: &str) {
    get_spinner().set_message(
        format!("Trying {}...", probe.green().bold())
            .color(colors::TEXT_DEFAULT)
            .to_string(),
    );
}

/// `MakeWriter` target for the log formatter: lines go to stdout above the spinner.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        get_spinner().suspend(|| {
            let mut stdout = io::stdout().lock();
            stdout.write_all(buf)?;
            stdout.flush()
        })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}
