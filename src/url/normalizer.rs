//! URL normalization and validation ahead of risk scoring.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::InvalidUrl;

/// Maximum hostname length accepted (RFC 1035 presentation form).
pub const MAX_HOST_LEN: usize = 253;

/// Characters that are never accepted in a submitted URL.
const UNSAFE_CHARS: [char; 5] = [' ', '<', '>', '"', '\''];

static SCHEME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("scheme prefix pattern"));

static PRIVATE_IPV4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:127\.0\.0\.1|10\.\d{1,3}\.\d{1,3}\.\d{1,3}|192\.168\.\d{1,3}\.\d{1,3}|172\.(?:1[6-9]|2\d|3[01])\.\d{1,3}\.\d{1,3})$",
    )
    .expect("private ipv4 pattern")
});

static STRICT_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:[a-z0-9-]+\.)+[a-z]{2,}$").expect("strict host pattern"));

/// Which schemes the validator lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Accept only `https`. When false, plain `http` is accepted as well.
    pub require_https: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self { require_https: true }
    }
}

impl ValidationPolicy {
    /// Whether `scheme` passes this policy.
    pub fn accepts_scheme(&self, scheme: &str) -> bool {
        match scheme {
            "https" => true,
            "http" => !self.require_https,
            _ => false,
        }
    }

    /// Canonicalize and validate a raw, untrusted URL string.
    ///
    /// Surrounding whitespace is trimmed and `http://` is prepended when no
    /// `http(s)://` prefix is present. Host-level checks run before the scheme
    /// check so that, for instance, a private address is reported as such even
    /// when it was submitted over plain HTTP.
    pub fn normalize(&self, raw: &str) -> Result<NormalizedUrl, InvalidUrl> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidUrl::Empty);
        }

        if let Some(ch) = trimmed.chars().find(|c| UNSAFE_CHARS.contains(c)) {
            return Err(InvalidUrl::UnsafeCharacter(ch));
        }

        if trimmed.matches('@').count() > 1 {
            return Err(InvalidUrl::MultipleAt);
        }

        let prefixed = if SCHEME_PREFIX.is_match(trimmed) {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        let parsed = Url::parse(&prefixed)?;

        let host = match parsed.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(InvalidUrl::EmptyHost),
        };

        validate_host(&host)?;

        if !self.accepts_scheme(parsed.scheme()) {
            return Err(InvalidUrl::UnsupportedScheme(parsed.scheme().to_string()));
        }

        Ok(NormalizedUrl {
            raw: prefixed,
            parsed,
            host,
        })
    }
}

/// A validated URL with its scheme prefix guaranteed present.
///
/// `as_str` is the submitted text (trimmed, prefixed); lexical features are
/// computed over it. The parsed view exposes scheme, hostname, path and query.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedUrl {
    raw: String,
    parsed: Url,
    host: String,
}

impl NormalizedUrl {
    /// The normalized URL text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercased scheme.
    pub fn scheme(&self) -> &str {
        self.parsed.scheme()
    }

    /// Lowercased ASCII hostname.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        self.parsed.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.parsed.query()
    }

    pub fn is_https(&self) -> bool {
        self.parsed.scheme() == "https"
    }

    /// The parsed form produced by the url crate.
    pub fn url(&self) -> &Url {
        &self.parsed
    }
}

impl std::fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Normalize with the default policy (`https` only).
pub fn normalize_url(raw: &str) -> Result<NormalizedUrl, InvalidUrl> {
    ValidationPolicy::default().normalize(raw)
}

/// Validate an already-extracted hostname.
pub fn validate_host(host: &str) -> Result<(), InvalidUrl> {
    if host.is_empty() {
        return Err(InvalidUrl::EmptyHost);
    }

    if PRIVATE_IPV4.is_match(host) {
        return Err(InvalidUrl::PrivateAddress(host.to_string()));
    }

    if host.len() > MAX_HOST_LEN {
        return Err(InvalidUrl::HostTooLong(host.len()));
    }

    if !STRICT_HOST.is_match(host) {
        return Err(InvalidUrl::MalformedHost(host.to_string()));
    }

    Ok(())
}

/// Lowercase a hostname and convert it to its ASCII (IDNA) form.
pub fn normalize_host(host: &str) -> Result<String, InvalidUrl> {
    let lowercase_host = host.trim().trim_end_matches('.').to_lowercase();

    match idna::domain_to_ascii(&lowercase_host) {
        Ok(ascii) if !ascii.is_empty() => Ok(ascii),
        Ok(_) => Err(InvalidUrl::EmptyHost),
        Err(_) => Err(InvalidUrl::MalformedHost(lowercase_host)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient() -> ValidationPolicy {
        ValidationPolicy { require_https: false }
    }

    #[test]
    fn test_normalize_basic_url() {
        let url = normalize_url("HTTPS://EXAMPLE.COM/PATH").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host(), "example.com");
        assert_eq!(url.path(), "/PATH");
        assert_eq!(url.as_str(), "HTTPS://EXAMPLE.COM/PATH");
    }

    #[test]
    fn test_prefix_added_when_missing() {
        let url = lenient().normalize("example.com/login").unwrap();
        assert_eq!(url.as_str(), "http://example.com/login");
        assert_eq!(url.scheme(), "http");
        assert!(!url.is_https());
    }

    #[test]
    fn test_default_policy_requires_https() {
        assert_eq!(
            normalize_url("http://example.com").unwrap_err(),
            InvalidUrl::UnsupportedScheme("http".to_string())
        );
        assert!(normalize_url("example.com").is_err());
        assert!(lenient().normalize("http://example.com").is_ok());
    }

    #[test]
    fn test_whitespace_trimmed() {
        let url = normalize_url("  https://example.com  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com");
        assert_eq!(normalize_url("   ").unwrap_err(), InvalidUrl::Empty);
    }

    #[test]
    fn test_unsafe_characters() {
        for (input, ch) in [
            ("https://exa mple.com", ' '),
            ("https://example.com/<script>", '<'),
            ("https://example.com/\"x", '"'),
            ("https://example.com/'x", '\''),
        ] {
            assert_eq!(normalize_url(input).unwrap_err(), InvalidUrl::UnsafeCharacter(ch));
        }
    }

    #[test]
    fn test_multiple_at_rejected() {
        assert_eq!(
            normalize_url("https://a@b@example.com").unwrap_err(),
            InvalidUrl::MultipleAt
        );
        assert!(normalize_url("https://user@example.com").is_ok());
    }

    #[test]
    fn test_private_addresses() {
        for host in ["127.0.0.1", "10.0.0.5", "192.168.1.10", "172.16.0.1", "172.31.255.1"] {
            let err = normalize_url(&format!("https://{}/", host)).unwrap_err();
            assert_eq!(err, InvalidUrl::PrivateAddress(host.to_string()));
        }
        // Outside 172.16/12
        assert!(matches!(
            normalize_url("https://172.32.0.1/").unwrap_err(),
            InvalidUrl::MalformedHost(_)
        ));
    }

    #[test]
    fn test_host_validation() {
        assert!(validate_host("example.com").is_ok());
        assert!(validate_host("a.b.c.d.example.co.uk").is_ok());
        assert!(validate_host("test-site.org").is_ok());

        assert_eq!(validate_host(""), Err(InvalidUrl::EmptyHost));
        assert!(matches!(validate_host("localhost"), Err(InvalidUrl::MalformedHost(_))));
        assert!(matches!(validate_host("example.c"), Err(InvalidUrl::MalformedHost(_))));
        assert!(matches!(validate_host("example.c0m"), Err(InvalidUrl::MalformedHost(_))));

        let long = format!("{}.com", "a.".repeat(130));
        assert!(matches!(validate_host(&long), Err(InvalidUrl::HostTooLong(_))));
    }

    #[test]
    fn test_host_normalization() {
        assert_eq!(normalize_host("EXAMPLE.COM").unwrap(), "example.com");
        assert_eq!(normalize_host("Mail.Google.com.").unwrap(), "mail.google.com");
        assert!(normalize_host("café.com").unwrap().starts_with("xn--"));
    }
}
