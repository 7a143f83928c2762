use probr_common::config::Config;
use probr_common::network::response::ContentCategory;
use probr_common::network::target::Scheme;
use probr_core::classifier::ResponseClassifier;
use probr_protocols::http;

use crate::support;

const JSON_API: &str = "HTTP/1.1 200 OK\r\n\
Content-Type: application/json\r\n\
X-API-Version: 3\r\n\
X-RateLimit-Limit: 100\r\n\
CF-Ray: 8a1b2c3d4e5f-AMS\r\n\
Content-Length: 2\r\n\
Connection: close\r\n\r\n{}";

const PDF_DOWNLOAD: &str = "HTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

#[tokio::test]
async fn json_api_behind_cdn_is_recognised() {
    let port = support::serve(JSON_API, "GET, POST").await;
    let cfg = support::quick_config();
    let target = support::target(&format!("127.0.0.1:{port}"));

    let meta = http::probe(&target, Scheme::Http, &cfg).await.unwrap();
    let classified = ResponseClassifier::standard(&cfg).classify(&target, &meta).await;

    assert_eq!(classified.category, ContentCategory::Json);
    assert!(classified.api_indicators.contains("json"));
    assert!(classified.api_indicators.contains("versioned"));
    assert!(classified.api_indicators.contains("rate-limited"));
    assert!(classified.cdn_indicators.contains("Cloudflare"));
    assert!(classified.allowed_methods.contains("POST"));
}

#[tokio::test]
async fn methods_can_be_switched_off() {
    let port = support::serve(PDF_DOWNLOAD, "GET").await;
    let cfg = Config {
        no_methods: true,
        ..support::quick_config()
    };
    let target = support::target(&format!("127.0.0.1:{port}"));

    let meta = http::probe(&target, Scheme::Http, &cfg).await.unwrap();
    let classified = ResponseClassifier::standard(&cfg).classify(&target, &meta).await;

    assert_eq!(classified.category, ContentCategory::Binary);
    assert!(classified.allowed_methods.is_empty());
}

#[tokio::test]
async fn silent_options_endpoint_degrades_to_no_methods() {
    let cfg = Config {
        timeout: std::time::Duration::from_millis(300),
        ..Config::default()
    };
    let target = support::target(&format!("127.0.0.1:{}", support::silent_port().await));

    let methods = ResponseClassifier::standard(&cfg)
        .detect_allowed_methods(&target)
        .await;

    assert!(methods.is_empty());
}
