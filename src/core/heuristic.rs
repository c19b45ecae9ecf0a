//! Rule-based suspicion score.
//!
//! An additive model: every rule contributes its weight independently and the
//! sum is rounded to 4 decimals and clamped to `[0, 1]`. Some rules re-derive
//! signals the feature vector already carries, but from the hostname instead
//! of the whole URL, so both the hostname terms and the raw feature flags are
//! summed.

use serde::{Deserialize, Serialize};

use crate::core::features::PHISHING_KEYWORDS;
use crate::types::{round4, FeatureVector};
use crate::url::{split_host_with_psl, DomainParts, NormalizedUrl};

/// TLDs (and lure words registered as gTLDs) penalized on the hostname's last label.
pub const HEURISTIC_SUSPICIOUS_TLDS: [&str; 30] = [
    "zip", "review", "country", "stream", "gq", "ml", "tk", "cf", "work", "fit", "xyz", "men",
    "date", "click", "party", "cam", "rest", "top", "account", "download", "support", "security",
    "online", "center", "web", "shop", "gift", "bonus", "free", "offer",
];

/// Weight of each heuristic rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Hostname ends in a suspicious TLD.
    pub suspicious_tld: f64,
    /// Per keyword occurrence inside the hostname.
    pub keyword: f64,
    pub plain_http: f64,
    /// Two or more hyphens in the registrable label.
    pub multi_hyphen: f64,
    pub digit_in_host: f64,
    /// Registrable label of 15+ lowercase alphanumerics.
    pub long_sld: f64,
    /// Three or more subdomain labels.
    pub deep_subdomain: f64,
    /// Any keyword anywhere in the URL.
    pub keyword_present: f64,
    /// Weight of each raw boolean feature signal.
    pub raw_signal: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            suspicious_tld: 0.20,
            keyword: 0.15,
            plain_http: 0.10,
            multi_hyphen: 0.10,
            digit_in_host: 0.05,
            long_sld: 0.15,
            deep_subdomain: 0.05,
            keyword_present: 0.05,
            raw_signal: 1.0,
        }
    }
}

/// Computes the heuristic score with a fixed set of weights.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeuristicScorer {
    weights: HeuristicWeights,
}

impl HeuristicScorer {
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    /// Score a validated URL given its feature vector.
    pub fn score(&self, url: &NormalizedUrl, features: &FeatureVector) -> f64 {
        let parts = split_host_with_psl(url.host());
        self.score_with_parts(url, &parts, features)
    }

    /// Score when the host has already been decomposed.
    pub fn score_with_parts(
        &self,
        url: &NormalizedUrl,
        parts: &DomainParts,
        features: &FeatureVector,
    ) -> f64 {
        let w = &self.weights;
        let host = url.host().to_ascii_lowercase();
        let mut score = 0.0;

        let last_label = host.rsplit('.').next().unwrap_or("");
        if HEURISTIC_SUSPICIOUS_TLDS.contains(&last_label) {
            score += w.suspicious_tld;
        }

        let host_keywords: usize = PHISHING_KEYWORDS
            .iter()
            .map(|keyword| host.matches(keyword).count())
            .sum();
        score += w.keyword * host_keywords as f64;

        if !url.is_https() {
            score += w.plain_http;
        }

        if parts.registrable.matches('-').count() >= 2 {
            score += w.multi_hyphen;
        }

        if host.chars().any(|c| c.is_ascii_digit()) {
            score += w.digit_in_host;
        }

        if is_long_random_label(&parts.registrable) {
            score += w.long_sld;
        }

        if parts.subdomain_count() >= 3 {
            score += w.deep_subdomain;
        }

        // double_slash is not part of the v1 feature layout and counts as 0.
        let double_slash = 0;
        let raw_flags = features.tld_suspicious
            + features.ip_in_domain
            + features.has_at
            + features.has_hyphen
            + double_slash;
        score += w.raw_signal * f64::from(raw_flags);

        if features.keyword_hits > 0 {
            score += w.keyword_present;
        }

        // Weights are decimal fractions; round so that sums landing on a
        // threshold compare equal to it.
        round4(score).clamp(0.0, 1.0)
    }
}

/// Score with the default weights.
pub fn heuristic_score(url: &NormalizedUrl, features: &FeatureVector) -> f64 {
    HeuristicScorer::default().score(url, features)
}

fn is_long_random_label(label: &str) -> bool {
    label.len() >= 15
        && label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::extract_features;
    use crate::url::ValidationPolicy;

    fn score_of(raw: &str) -> f64 {
        let url = ValidationPolicy { require_https: false }.normalize(raw).unwrap();
        let features = extract_features(&url);
        heuristic_score(&url, &features)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_clean_https_url_scores_zero() {
        assert!(approx(score_of("https://www.example.com/about"), 0.0));
    }

    #[test]
    fn test_plain_http_only() {
        assert!(approx(score_of("http://example.com"), 0.10));
    }

    #[test]
    fn test_digit_and_deep_subdomains() {
        // digit in host (+0.05), 3 subdomain labels (+0.05)
        assert!(approx(score_of("https://a.b.c2.example.com"), 0.10));
    }

    #[test]
    fn test_long_second_level_label() {
        assert!(approx(score_of("https://abcdefghijklmnop.com"), 0.15));
        // Uppercase input is lowercased by the parser, so it still counts.
        assert!(approx(score_of("https://ABCDEFGHIJKLMNOP.com"), 0.15));
    }

    #[test]
    fn test_host_keywords_weighted_per_occurrence() {
        // "login" and "verify" in the host (+0.30), keyword present (+0.05)
        assert!(approx(score_of("https://login.verify.example.com"), 0.35));
    }

    #[test]
    fn test_sum_at_threshold_is_exact() {
        // tld 0.20 + host keyword 0.15 + digit 0.05 + deep subdomains 0.05 + keyword 0.05
        assert_eq!(score_of("https://a.b.login4.example.online"), 0.5);
    }

    #[test]
    fn test_path_keyword_only_counts_once() {
        assert!(approx(score_of("https://example.com/login"), 0.05));
    }

    #[test]
    fn test_raw_flags_saturate() {
        // has_hyphen alone contributes a full 1.0
        assert!(approx(score_of("https://my-bank.com"), 1.0));
        assert!(approx(score_of("http://a@x-y-z.secure-login.verify.tk/free"), 1.0));
    }

    #[test]
    fn test_suspicious_lure_tld() {
        // "support" is only in the heuristic TLD list
        assert!(approx(score_of("https://example.support"), 0.20));
    }

    #[test]
    fn test_custom_weights() {
        let url = ValidationPolicy::default().normalize("https://my-bank.com").unwrap();
        let features = extract_features(&url);
        let scorer = HeuristicScorer::new(HeuristicWeights {
            raw_signal: 0.25,
            ..HeuristicWeights::default()
        });
        assert!(approx(scorer.score(&url, &features), 0.25));
    }
}
