use std::collections::BTreeSet;

use async_trait::async_trait;

use probr_common::config::Config;
use probr_common::debug;
use probr_common::network::target::Target;
use probr_protocols::http;

use super::MethodDetector;

/// Asks the server itself with one `OPTIONS` request.
///
/// A failed or timed out request yields an empty set; the reason only reaches the debug log.
pub struct OptionsMethodDetector {
    cfg: Config,
}

impl OptionsMethodDetector {
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl MethodDetector for OptionsMethodDetector {
    async fn allowed_methods(&self, target: &Target) -> BTreeSet<String> {
        match http::options(target, &self.cfg).await {
            Ok(methods) => methods,
            Err(e) => {
                debug!("Allowed methods unknown for {target}: {e}");
                BTreeSet::new()
            }
        }
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
