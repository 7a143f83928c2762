//! Header rule tables for API and CDN fingerprints.

use std::collections::BTreeSet;

use probr_common::network::probe::Headers;

use super::{ApiDetector, CdnDetector};

#[derive(Debug, Clone, Copy)]
enum Matcher {
    /// Header is present.
    Name(&'static str),
    /// Any header whose name starts with the prefix.
    Prefix(&'static str),
    /// Header is present and its value contains the needle (case-insensitive).
    Value(&'static str, &'static str),
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    label: &'static str,
    matcher: Matcher,
}

const fn rule(label: &'static str, matcher: Matcher) -> Rule {
    Rule { label, matcher }
}

const API_RULES: &[Rule] = &[
    rule("versioned", Matcher::Name("api-version")),
    rule("versioned", Matcher::Name("x-api-version")),
    rule("cors", Matcher::Prefix("access-control-allow-")),
    rule("rate-limited", Matcher::Prefix("x-ratelimit-")),
    rule("rate-limited", Matcher::Prefix("ratelimit-")),
    rule("json", Matcher::Value("content-type", "application/json")),
    rule("bearer-auth", Matcher::Value("www-authenticate", "bearer")),
];

const CDN_RULES: &[Rule] = &[
    rule("Cloudflare", Matcher::Name("cf-ray")),
    rule("Cloudflare", Matcher::Name("cf-cache-status")),
    rule("Cloudflare", Matcher::Value("server", "cloudflare")),
    rule("CloudFront", Matcher::Name("x-amz-cf-id")),
    rule("CloudFront", Matcher::Value("via", "cloudfront")),
    rule("Fastly", Matcher::Name("x-served-by")),
    rule("Fastly", Matcher::Prefix("x-fastly-")),
    rule("Akamai", Matcher::Prefix("x-akamai-")),
    rule("Varnish", Matcher::Name("x-varnish")),
    rule("x-cache", Matcher::Name("x-cache")),
    rule("cache-status", Matcher::Name("cache-status")),
    rule("age", Matcher::Name("age")),
];

fn matches(matcher: Matcher, headers: &Headers) -> bool {
    match matcher {
        Matcher::Name(name) => headers.contains(name),
        Matcher::Prefix(prefix) => headers.iter().any(|(name, _)| name.starts_with(prefix)),
        Matcher::Value(name, needle) => headers
            .get(name)
            .is_some_and(|value| value.to_ascii_lowercase().contains(needle)),
    }
}

fn apply(rules: &[Rule], headers: &Headers) -> BTreeSet<String> {
    rules
        .iter()
        .filter(|rule| matches(rule.matcher, headers))
        .map(|rule| rule.label.to_string())
        .collect()
}

/// Flags responses that look like they come from a programmatic API.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderApiDetector;

impl ApiDetector for HeaderApiDetector {
    fn detect(&self, headers: &Headers) -> BTreeSet<String> {
        apply(API_RULES, headers)
    }
}

/// Names the CDN or caching layer in front of the origin.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderCdnDetector;

impl CdnDetector for HeaderCdnDetector {
    fn detect(&self, headers: &Headers) -> BTreeSet<String> {
        apply(CDN_RULES, headers)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        pairs.iter().copied().collect()
    }

    fn labels(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn api_detector_reads_versioning_cors_and_rate_limits() {
        let h = headers(&[
            ("Content-Type", "application/json; charset=utf-8"),
            ("X-API-Version", "2024-01-01"),
            ("Access-Control-Allow-Origin", "*"),
            ("X-RateLimit-Remaining", "59"),
        ]);
        assert_eq!(
            HeaderApiDetector.detect(&h),
            labels(&["cors", "json", "rate-limited", "versioned"])
        );
    }

    #[test]
    fn api_detector_spots_bearer_challenge() {
        let h = headers(&[("WWW-Authenticate", "Bearer realm=\"api\"")]);
        assert_eq!(HeaderApiDetector.detect(&h), labels(&["bearer-auth"]));
    }

    #[test]
    fn plain_html_page_has_no_api_indicators() {
        let h = headers(&[("Content-Type", "text/html"), ("Server", "nginx")]);
        assert!(HeaderApiDetector.detect(&h).is_empty());
    }

    #[test]
    fn cdn_detector_names_providers_once() {
        let h = headers(&[
            ("CF-Ray", "8a1b2c3d4e5f-FRA"),
            ("CF-Cache-Status", "HIT"),
            ("Server", "cloudflare"),
            ("Age", "42"),
        ]);
        assert_eq!(HeaderCdnDetector.detect(&h), labels(&["Cloudflare", "age"]));
    }

    #[test]
    fn cdn_detector_matches_via_value_case_insensitively() {
        let h = headers(&[
            ("Via", "1.1 abc.CloudFront.net (CloudFront)"),
            ("X-Cache", "Miss from cloudfront"),
        ]);
        assert_eq!(
            HeaderCdnDetector.detect(&h),
            labels(&["CloudFront", "x-cache"])
        );
    }

    #[test]
    fn cdn_detector_matches_prefixes() {
        let h = headers(&[("X-Akamai-Transformed", "9 - 0 pmb=mRUM,1")]);
        assert_eq!(HeaderCdnDetector.detect(&h), labels(&["Akamai"]));
    }
}
