//! # Response Classification
//!
//! Runs after an HTTP or HTTPS probe has succeeded and describes what answered:
//! the broad content category, hints that an API or a CDN is involved, and the
//! methods the server admits to.
//!
//! Every enrichment behind the category lookup is a capability trait with an empty
//! default, so a classifier built with [`ResponseClassifier::default`] only looks at
//! `Content-Type`. None of them can fail the probe that triggered them.

use std::collections::BTreeSet;

use async_trait::async_trait;

use probr_common::config::Config;
use probr_common::network::probe::{Headers, HttpMeta};
use probr_common::network::response::{ClassifiedResponse, ContentCategory};
use probr_common::network::target::Target;

mod indicators;
mod methods;

pub use indicators::{HeaderApiDetector, HeaderCdnDetector};
pub use methods::OptionsMethodDetector;

const BINARY_MARKERS: [&str; 3] = ["application/octet-stream", "image/", "application/pdf"];

/// Inspects an HTML response further. Runs only for [`ContentCategory::Html`].
pub trait DomAnalyzer: Send + Sync {
    fn analyze(&self, _meta: &HttpMeta) {}
}

pub trait ApiDetector: Send + Sync {
    fn detect(&self, _headers: &Headers) -> BTreeSet<String> {
        BTreeSet::new()
    }
}

pub trait CdnDetector: Send + Sync {
    fn detect(&self, _headers: &Headers) -> BTreeSet<String> {
        BTreeSet::new()
    }
}

#[async_trait]
pub trait MethodDetector: Send + Sync {
    async fn allowed_methods(&self, _target: &Target) -> BTreeSet<String> {
        BTreeSet::new()
    }
}

/// Detects nothing. Stands in for every capability a classifier was not given.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDetection;

impl DomAnalyzer for NoDetection {}
impl ApiDetector for NoDetection {}
impl CdnDetector for NoDetection {}
impl MethodDetector for NoDetection {}

pub struct ResponseClassifier {
    dom: Box<dyn DomAnalyzer>,
    api: Box<dyn ApiDetector>,
    cdn: Box<dyn CdnDetector>,
    methods: Box<dyn MethodDetector>,
}

impl Default for ResponseClassifier {
    fn default() -> Self {
        Self {
            dom: Box::new(NoDetection),
            api: Box::new(NoDetection),
            cdn: Box::new(NoDetection),
            methods: Box::new(NoDetection),
        }
    }
}

impl ResponseClassifier {
    /// Header rule detectors, plus the `OPTIONS` request unless `cfg.no_methods` is set.
    pub fn standard(cfg: &Config) -> Self {
        let classifier = Self::default()
            .with_api_detector(HeaderApiDetector)
            .with_cdn_detector(HeaderCdnDetector);

        if cfg.no_methods {
            classifier
        } else {
            classifier.with_method_detector(OptionsMethodDetector::new(cfg.clone()))
        }
    }

    pub fn with_dom_analyzer(mut self, analyzer: impl DomAnalyzer + 'static) -> Self {
        self.dom = Box::new(analyzer);
        self
    }

    pub fn with_api_detector(mut self, detector: impl ApiDetector + 'static) -> Self {
        self.api = Box::new(detector);
        self
    }

    pub fn with_cdn_detector(mut self, detector: impl CdnDetector + 'static) -> Self {
        self.cdn = Box::new(detector);
        self
    }

    pub fn with_method_detector(mut self, detector: impl MethodDetector + 'static) -> Self {
        self.methods = Box::new(detector);
        self
    }

    pub fn classify_content_type(&self, meta: &HttpMeta) -> ContentCategory {
        let category = content_category(&meta.headers);
        if category == ContentCategory::Html {
            self.dom.analyze(meta);
        }
        category
    }

    pub fn detect_api_indicators(&self, headers: &Headers) -> BTreeSet<String> {
        self.api.detect(headers)
    }

    pub fn detect_cdn_indicators(&self, headers: &Headers) -> BTreeSet<String> {
        self.cdn.detect(headers)
    }

    pub async fn detect_allowed_methods(&self, target: &Target) -> BTreeSet<String> {
        self.methods.allowed_methods(target).await
    }

    /// Full classification of the response `target` produced.
    pub async fn classify(&self, target: &Target, meta: &HttpMeta) -> ClassifiedResponse {
        ClassifiedResponse {
            category: self.classify_content_type(meta),
            api_indicators: self.detect_api_indicators(&meta.headers),
            cdn_indicators: self.detect_cdn_indicators(&meta.headers),
            allowed_methods: self.detect_allowed_methods(target).await,
        }
    }
}

/// Maps `Content-Type` onto a category. Both name and value are matched case-insensitively.
pub fn content_category(headers: &Headers) -> ContentCategory {
    let Some(content_type) = headers.get("content-type") else {
        return ContentCategory::Unknown;
    };
    let content_type = content_type.to_ascii_lowercase();

    if content_type.contains("text/html") {
        ContentCategory::Html
    } else if content_type.contains("application/json") {
        ContentCategory::Json
    } else if BINARY_MARKERS.iter().any(|marker| content_type.contains(marker)) {
        ContentCategory::Binary
    } else {
        ContentCategory::Unknown
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
