use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use probr_common::config::Config;
use probr_common::network::outcome::{Step, StepReport, StepStatus};
use probr_common::network::target::Target;
use probr_core::Reporter;
use probr_core::recon::Reconnaissance;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub fn quick_config() -> Config {
    Config {
        timeout: Duration::from_secs(1),
        ..Config::default()
    }
}

pub fn target(raw: &str) -> Target {
    Target::from_str(raw).unwrap()
}

/// Minimal HTTP/1.1 server: `OPTIONS` gets `Allow: <allow>`, everything else `get_response`.
pub async fn serve(get_response: &'static str, allow: &'static str) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);

                let response = if request.starts_with("OPTIONS") {
                    format!(
                        "HTTP/1.1 204 No Content\r\nAllow: {allow}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                    )
                } else {
                    get_response.to_string()
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    port
}

/// Accepts connections and never answers.
pub async fn silent_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    port
}

pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[derive(Clone, Default)]
pub struct Recorder {
    pub reports: Arc<Mutex<Vec<StepReport>>>,
    pub fallbacks: Arc<AtomicUsize>,
}

impl Reporter for Recorder {
    fn step(&self, report: &StepReport) {
        self.reports.lock().unwrap().push(report.clone());
    }

    fn fallback(&self, _target: &Target) {
        self.fallbacks.fetch_add(1, Ordering::SeqCst);
    }
}

impl Recorder {
    pub fn failures(&self) -> Vec<Step> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == StepStatus::Failed)
            .map(|r| r.step)
            .collect()
    }

    pub fn fallback_count(&self) -> usize {
        self.fallbacks.load(Ordering::SeqCst)
    }
}

/// Counts how often it was asked to run.
pub struct CountingRecon(pub Arc<AtomicUsize>);

#[async_trait]
impl Reconnaissance for CountingRecon {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn run(&self, _target: &Target) -> anyhow::Result<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
