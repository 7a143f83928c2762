use std::collections::BTreeSet;

use colored::*;
use probr_common::network::outcome::TerminalOutcome;
use probr_common::network::probe::HttpMeta;
use probr_common::network::response::ClassifiedResponse;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

const NONE_FOUND: &str = "none detected";

pub fn set_to_value(set: &BTreeSet<String>) -> ColoredString {
    if set.is_empty() {
        NONE_FOUND.color(colors::SEPARATOR)
    } else {
        set.iter()
            .cloned()
            .collect::<Vec<String>>()
            .join(", ")
            .color(colors::SECONDARY)
    }
}

pub fn response_to_details(meta: &HttpMeta, classified: &ClassifiedResponse) -> Vec<Detail> {
    vec![
        ("URL".to_string(), meta.url.color(colors::URL)),
        ("Status".to_string(), meta.status.to_string().color(colors::ACCENT)),
        ("Content".to_string(), classified.category.to_string().color(colors::PRIMARY)),
        ("API".to_string(), set_to_value(&classified.api_indicators)),
        ("CDN".to_string(), set_to_value(&classified.cdn_indicators)),
        ("Methods".to_string(), set_to_value(&classified.allowed_methods)),
    ]
}

/// Details for outcomes that carry no HTTP response.
pub fn outcome_to_details(outcome: &TerminalOutcome) -> Vec<Detail> {
    match outcome {
        TerminalOutcome::ConnectedSrv(record) => vec![
            ("Via".to_string(), "DNS SRV".color(colors::PRIMARY)),
            ("Target".to_string(), record.to_string().color(colors::URL)),
        ],
        TerminalOutcome::ConnectedAlpn(protocol) => vec![
            ("Via".to_string(), "TLS ALPN".color(colors::PRIMARY)),
            ("Proto".to_string(), protocol.as_str().color(colors::SECONDARY)),
        ],
        TerminalOutcome::ConnectedWebSocket => vec![(
            "Via".to_string(),
            "WebSocket upgrade".color(colors::PRIMARY),
        )],
        TerminalOutcome::ConnectedHttp | TerminalOutcome::ConnectedHttps => Vec::new(),
        TerminalOutcome::NoConnectivity => vec![(
            "Via".to_string(),
            "nothing answered".color(colors::FAILED),
        )],
    }
}

pub fn outcome_color(outcome: &TerminalOutcome) -> Color {
    if outcome.is_connected() {
        colors::CONNECTED
    } else {
        colors::FAILED
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
