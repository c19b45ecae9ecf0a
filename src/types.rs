//! Core data structures shared across the scoring pipeline.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Version of the feature layout. Bump whenever a field is added, removed or reordered.
pub const FEATURE_VERSION: u16 = 1;

/// Feature names in vector order.
pub const FEATURE_NAMES: [&str; 11] = [
    "domain_len",
    "url_len",
    "num_digits",
    "num_subdomains",
    "spec_chars",
    "uses_https",
    "has_at",
    "has_hyphen",
    "tld_suspicious",
    "ip_in_domain",
    "keyword_hits",
];

/// Final classification of a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Safe,
    Phishing,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Safe => "safe",
            Verdict::Phishing => "phishing",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which signal decided the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReasonCode {
    #[serde(rename = "blocklist")]
    Blocklist,
    #[serde(rename = "whitelist")]
    Whitelist,
    #[serde(rename = "typosquat")]
    Typosquat,
    #[serde(rename = "ml")]
    Ml,
    #[serde(rename = "heuristic")]
    Heuristic,
    #[serde(rename = "ml+heuristic")]
    MlHeuristic,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::Blocklist => "blocklist",
            ReasonCode::Whitelist => "whitelist",
            ReasonCode::Typosquat => "typosquat",
            ReasonCode::Ml => "ml",
            ReasonCode::Heuristic => "heuristic",
            ReasonCode::MlHeuristic => "ml+heuristic",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-order lexical features of a URL.
///
/// Counts are plain integers; flags are 0 or 1. Serializes as an object whose
/// keys follow [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureVector {
    /// Length of the registrable label.
    pub domain_len: u32,
    /// Length of the whole URL string.
    pub url_len: u32,
    /// Decimal digits anywhere in the URL.
    pub num_digits: u32,
    /// Non-empty subdomain labels.
    pub num_subdomains: u32,
    /// Characters outside `[A-Za-z0-9]` anywhere in the URL.
    pub spec_chars: u32,
    pub uses_https: u32,
    pub has_at: u32,
    /// Hyphen in the registrable label.
    pub has_hyphen: u32,
    /// Suffix ends in a suspicious TLD.
    pub tld_suspicious: u32,
    /// Registered domain (or host) is an IPv4 literal or has an all-digit label.
    pub ip_in_domain: u32,
    /// Phishing keyword occurrences, duplicates counted.
    pub keyword_hits: u32,
}

impl FeatureVector {
    /// Values in [`FEATURE_NAMES`] order, as consumed by probability providers.
    pub fn as_array(&self) -> [f64; 11] {
        [
            self.domain_len as f64,
            self.url_len as f64,
            self.num_digits as f64,
            self.num_subdomains as f64,
            self.spec_chars as f64,
            self.uses_https as f64,
            self.has_at as f64,
            self.has_hyphen as f64,
            self.tld_suspicious as f64,
            self.ip_in_domain as f64,
            self.keyword_hits as f64,
        ]
    }

    /// `(name, value)` pairs in vector order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.as_array())
    }
}

/// Result of the blocklist/whitelist matcher.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// Exact hit in the blocklist snapshot.
    Blocked,
    /// Host explicitly allowed under a trusted base domain.
    Whitelisted { base_domain: String },
    /// Second-level label is too similar to a trusted base domain.
    Typosquat { base_domain: String, ratio: f64 },
    NoMatch,
}

/// The sole output of a classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionResult {
    pub verdict: Verdict,
    pub reason: ReasonCode,
    /// Confidence in [0, 1]; serialized rounded to 4 decimals.
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
    /// Absent for blocklist, whitelist and typosquat decisions.
    pub features: Option<FeatureVector>,
}

impl DecisionResult {
    pub fn new(
        verdict: Verdict,
        reason: ReasonCode,
        score: f64,
        features: Option<FeatureVector>,
    ) -> Self {
        Self {
            verdict,
            reason,
            score: score.clamp(0.0, 1.0),
            features,
        }
    }

    pub fn is_phishing(&self) -> bool {
        self.verdict == Verdict::Phishing
    }

    /// Score rounded to 4 decimals.
    pub fn rounded_score(&self) -> f64 {
        round4(self.score)
    }

    /// Short user-facing summary.
    pub fn message(&self) -> &'static str {
        match self.verdict {
            Verdict::Safe => "No Phishing Detected",
            Verdict::Phishing => "Phishing URL Detected",
        }
    }
}

/// One entry handed to the decision logger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionRecord {
    pub timestamp: DateTime<Utc>,
    pub url: String,
    pub verdict: Verdict,
    pub reason: ReasonCode,
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
    /// Present when the verdict came from fusion.
    pub features: Option<FeatureVector>,
}

impl DetectionRecord {
    /// Stamp a decision with the current time.
    pub fn new(url: &str, decision: &DecisionResult) -> Self {
        Self {
            timestamp: Utc::now(),
            url: url.to_string(),
            verdict: decision.verdict,
            reason: decision.reason,
            score: decision.score,
            features: decision.features,
        }
    }
}

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn serialize_score<S: Serializer>(score: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round4(*score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order() {
        let features = FeatureVector {
            domain_len: 1,
            url_len: 2,
            num_digits: 3,
            num_subdomains: 4,
            spec_chars: 5,
            uses_https: 1,
            has_at: 0,
            has_hyphen: 1,
            tld_suspicious: 0,
            ip_in_domain: 1,
            keyword_hits: 7,
        };

        assert_eq!(
            features.as_array(),
            [1.0, 2.0, 3.0, 4.0, 5.0, 1.0, 0.0, 1.0, 0.0, 1.0, 7.0]
        );

        let names: Vec<&str> = features.named().map(|(name, _)| name).collect();
        assert_eq!(names, FEATURE_NAMES.to_vec());
    }

    #[test]
    fn test_feature_json_keys_follow_order() {
        let json = serde_json::to_string(&FeatureVector::default()).unwrap();
        let mut last = 0;
        for name in FEATURE_NAMES {
            let pos = json.find(&format!("\"{}\"", name)).unwrap();
            assert!(pos >= last, "{} out of order", name);
            last = pos;
        }
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(ReasonCode::MlHeuristic.as_str(), "ml+heuristic");
        assert_eq!(
            serde_json::to_string(&ReasonCode::MlHeuristic).unwrap(),
            "\"ml+heuristic\""
        );
        assert_eq!(serde_json::to_string(&Verdict::Phishing).unwrap(), "\"phishing\"");
    }

    #[test]
    fn test_decision_score_rounding() {
        let result = DecisionResult::new(Verdict::Safe, ReasonCode::Ml, 0.123456, None);
        assert_eq!(result.rounded_score(), 0.1235);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["score"], serde_json::json!(0.1235));
        assert_eq!(json["reason"], "ml");
        assert!(json["features"].is_null());
    }

    #[test]
    fn test_decision_messages() {
        let safe = DecisionResult::new(Verdict::Safe, ReasonCode::Whitelist, 0.0, None);
        let bad = DecisionResult::new(Verdict::Phishing, ReasonCode::Blocklist, 1.0, None);
        assert_eq!(safe.message(), "No Phishing Detected");
        assert_eq!(bad.message(), "Phishing URL Detected");
        assert!(bad.is_phishing());
    }
}
