//! Lexical feature extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::FeatureVector;
use crate::url::{split_host_with_psl, DomainParts, NormalizedUrl};

/// TLDs counted by the `tld_suspicious` feature.
pub const SUSPICIOUS_TLDS: [&str; 18] = [
    "zip", "review", "country", "stream", "gq", "ml", "tk", "cf", "work", "fit", "xyz", "men",
    "date", "click", "party", "cam", "rest", "top",
];

/// Phishing lure words, matched case-insensitively as substrings.
pub const PHISHING_KEYWORDS: [&str; 10] = [
    "login", "verify", "secure", "update", "free", "bonus", "win", "gift", "confirm", "account",
];

static DOTTED_QUAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{1,3}\.){3}\d{1,3}$").expect("dotted quad pattern"));

/// Extract the feature vector of a validated URL.
pub fn extract_features(url: &NormalizedUrl) -> FeatureVector {
    let parts = split_host_with_psl(url.host());
    extract_features_with_parts(url, &parts)
}

/// Extract features when the host has already been decomposed.
pub fn extract_features_with_parts(url: &NormalizedUrl, parts: &DomainParts) -> FeatureVector {
    let text = url.as_str();

    let registered = parts.registered_domain();
    let ip_candidate = if registered.is_empty() {
        url.host()
    } else {
        registered.as_str()
    };

    FeatureVector {
        domain_len: parts.registrable.chars().count() as u32,
        url_len: text.chars().count() as u32,
        num_digits: text.chars().filter(char::is_ascii_digit).count() as u32,
        num_subdomains: parts.subdomain_count() as u32,
        spec_chars: count_special_chars(text) as u32,
        uses_https: flag(url.is_https()),
        has_at: flag(text.contains('@')),
        has_hyphen: flag(parts.registrable.contains('-')),
        tld_suspicious: flag(is_suspicious_suffix(&parts.suffix)),
        ip_in_domain: flag(has_ip_in_domain(ip_candidate)),
        keyword_hits: count_keyword_hits(text) as u32,
    }
}

/// Characters outside `[A-Za-z0-9]`.
pub fn count_special_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_ascii_alphanumeric()).count()
}

/// Total keyword occurrences in `text`, case-insensitive, overlaps between
/// different keywords all counted.
pub fn count_keyword_hits(text: &str) -> usize {
    let lower = text.to_lowercase();
    PHISHING_KEYWORDS
        .iter()
        .map(|keyword| lower.matches(keyword).count())
        .sum()
}

/// True when the last dot-segment of `suffix` is a suspicious TLD.
pub fn is_suspicious_suffix(suffix: &str) -> bool {
    if suffix.is_empty() {
        return false;
    }
    let last = suffix.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    SUSPICIOUS_TLDS.contains(&last.as_str())
}

/// Dotted-quad IPv4 literal, or any label made only of digits.
pub fn has_ip_in_domain(domain: &str) -> bool {
    if DOTTED_QUAD.is_match(domain) {
        return true;
    }
    domain
        .split('.')
        .any(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_digit()))
}

fn flag(value: bool) -> u32 {
    u32::from(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::ValidationPolicy;

    fn parse(raw: &str) -> NormalizedUrl {
        ValidationPolicy { require_https: false }.normalize(raw).unwrap()
    }

    #[test]
    fn test_basic_features() {
        let features = extract_features(&parse("https://www.example.com/path"));
        assert_eq!(features.domain_len, 7);
        assert_eq!(features.url_len, 28);
        assert_eq!(features.num_digits, 0);
        assert_eq!(features.num_subdomains, 1);
        // ':' '/' '/' '.' '.' '/'
        assert_eq!(features.spec_chars, 6);
        assert_eq!(features.uses_https, 1);
        assert_eq!(features.has_at, 0);
        assert_eq!(features.has_hyphen, 0);
        assert_eq!(features.tld_suspicious, 0);
        assert_eq!(features.ip_in_domain, 0);
        assert_eq!(features.keyword_hits, 0);
    }

    #[test]
    fn test_suspicious_url_features() {
        let features = extract_features(&parse("http://user@secure-login.example.xyz/verify?id=42"));
        assert_eq!(features.uses_https, 0);
        assert_eq!(features.has_at, 1);
        assert_eq!(features.has_hyphen, 0); // registrable label is "example"
        assert_eq!(features.tld_suspicious, 1);
        assert_eq!(features.num_digits, 2);
        assert_eq!(features.num_subdomains, 1);
        // secure, login, verify
        assert_eq!(features.keyword_hits, 3);
    }

    #[test]
    fn test_keyword_duplicates_counted() {
        assert_eq!(count_keyword_hits("LOGIN-login"), 2);
        assert_eq!(count_keyword_hits("freegift"), 2);
        assert_eq!(count_keyword_hits("example"), 0);
    }

    #[test]
    fn test_hyphen_in_registrable() {
        let features = extract_features(&parse("https://pay-pal-help.com"));
        assert_eq!(features.has_hyphen, 1);
        assert_eq!(features.domain_len, 12);
    }

    #[test]
    fn test_multi_label_suffix() {
        let features = extract_features(&parse("https://shop.example.co.uk"));
        assert_eq!(features.domain_len, 7);
        assert_eq!(features.num_subdomains, 1);
        assert_eq!(features.tld_suspicious, 0);
    }

    #[test]
    fn test_ip_in_domain() {
        assert!(has_ip_in_domain("8.8.8.8"));
        assert!(has_ip_in_domain("123.example.com"));
        assert!(!has_ip_in_domain("example.com"));
        assert!(!has_ip_in_domain("a1.example.com"));

        let features = extract_features(&parse("https://login.123.com"));
        assert_eq!(features.ip_in_domain, 1);
    }

    #[test]
    fn test_suspicious_suffix() {
        assert!(is_suspicious_suffix("xyz"));
        assert!(is_suspicious_suffix("co.tk"));
        assert!(!is_suspicious_suffix("com"));
        assert!(!is_suspicious_suffix(""));
    }
}
