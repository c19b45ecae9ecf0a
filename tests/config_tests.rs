//! Tests for loading configuration and snapshots from disk.

use std::path::Path;
use std::sync::Arc;

use urlrisk::*;

#[test]
fn test_demo_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/urlrisk.toml");
    let cfg = config::load(&path).unwrap();

    assert!(cfg.validation.require_https);
    assert_eq!(cfg.snapshots.whitelist.len(), 3);
    assert_eq!(
        cfg.audit_path().unwrap(),
        Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/detections.jsonl")
    );

    let snapshots = cfg.build_snapshots().unwrap();
    assert_eq!(snapshots.blocklist.len(), 3);
    assert!(snapshots.blocklist.contains("https://amaz0n-verify.com/"));

    let domains: Vec<&str> = snapshots.whitelist.iter().map(TrustedDomain::domain).collect();
    assert_eq!(domains, vec!["google.com", "microsoft.com", "paypal.com"]);
}

#[test]
fn test_demo_config_classifies() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/urlrisk.toml");
    let cfg = config::load(&path).unwrap();
    let store = Arc::new(SnapshotStore::new(cfg.build_snapshots().unwrap()));
    let pipeline = RiskPipeline::from_config(&cfg, Arc::new(cfg.model.clone()), store);

    let test_cases = vec![
        ("https://amaz0n-verify.com", Verdict::Phishing, ReasonCode::Blocklist),
        ("https://accounts.google.com", Verdict::Safe, ReasonCode::Whitelist),
        ("https://paypa1.com", Verdict::Phishing, ReasonCode::Typosquat),
        ("https://github.com", Verdict::Safe, ReasonCode::Ml),
    ];

    for (url, verdict, reason) in test_cases {
        let result = pipeline.classify(url).unwrap();
        assert_eq!((result.verdict, result.reason), (verdict, reason), "url {}", url);
    }
}

#[test]
fn test_missing_blocklist_is_configuration_error() {
    let cfg = UrlRiskConfig::from_toml("[snapshots]\nblocklist_path = \"/nonexistent/feed.txt\"\n")
        .unwrap();
    assert!(matches!(
        cfg.build_snapshots(),
        Err(UrlRiskError::Configuration(_))
    ));
}
