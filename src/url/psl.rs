//! Public Suffix List integration for proper domain splitting.

use psl::{List, Psl, Type};
use serde::Serialize;

/// A hostname split into subdomain labels, registrable label and public suffix.
///
/// For `mail.google.co.uk`: subdomains `["mail"]`, registrable `google`,
/// suffix `co.uk`. Joining the non-empty parts with dots gives the hostname
/// back. IP literals and hosts without a registrable label yield empty
/// `registrable` and `suffix`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainParts {
    pub subdomains: Vec<String>,
    pub registrable: String,
    pub suffix: String,
}

impl DomainParts {
    /// Registrable label joined with its suffix (`google.co.uk`), or empty.
    pub fn registered_domain(&self) -> String {
        if self.registrable.is_empty() {
            return String::new();
        }
        if self.suffix.is_empty() {
            return self.registrable.clone();
        }
        format!("{}.{}", self.registrable, self.suffix)
    }

    /// Number of non-empty subdomain labels.
    pub fn subdomain_count(&self) -> usize {
        self.subdomains.iter().filter(|label| !label.is_empty()).count()
    }

    /// Rightmost dot-segment of the suffix (`uk` for `co.uk`).
    pub fn suffix_last_label(&self) -> &str {
        self.suffix.rsplit('.').next().unwrap_or("")
    }

    /// Rebuild the hostname from its parts.
    pub fn hostname(&self) -> String {
        let mut labels: Vec<&str> = self
            .subdomains
            .iter()
            .map(String::as_str)
            .filter(|label| !label.is_empty())
            .collect();
        if !self.registrable.is_empty() {
            labels.push(&self.registrable);
        }
        if !self.suffix.is_empty() {
            labels.push(&self.suffix);
        }
        labels.join(".")
    }
}

/// Split a hostname using the Public Suffix List.
///
/// Multi-label suffixes such as `co.uk` stay together. Only ICANN suffixes
/// count, so `foo.github.io` splits as `foo` / `github` / `io`. Hosts that
/// are IP literals, lack a registrable label, or are otherwise malformed come
/// back with empty registrable domain and suffix.
pub fn split_host_with_psl(host: &str) -> DomainParts {
    let host = host.trim_end_matches('.').to_ascii_lowercase();

    if host.is_empty() || host.parse::<std::net::IpAddr>().is_ok() || host.contains(':') {
        return DomainParts::default();
    }

    split_with_psl(&host).unwrap_or_default()
}

fn split_with_psl(host: &str) -> Option<DomainParts> {
    if host.split('.').any(str::is_empty) {
        return None;
    }

    let suffix = icann_suffix(host)?;

    // host is "<subdomains>.<registrable>.<suffix>"
    let rest = host.strip_suffix(suffix)?.strip_suffix('.')?;
    let (subdomains, registrable) = match rest.rsplit_once('.') {
        Some((subs, label)) => (subs.split('.').map(str::to_string).collect(), label),
        None => (Vec::new(), rest),
    };
    if registrable.is_empty() {
        return None;
    }

    Some(DomainParts {
        subdomains,
        registrable: registrable.to_string(),
        suffix: suffix.to_string(),
    })
}

/// Longest matching suffix from the ICANN section of the list.
///
/// Private entries (`github.io`, `blogspot.com`) are skipped by retrying
/// without their leftmost label. Unlisted TLDs fall back to the last label.
fn icann_suffix(host: &str) -> Option<&str> {
    let mut candidate = host;
    loop {
        let suffix = List.suffix(candidate.as_bytes())?;
        let text = std::str::from_utf8(suffix.as_bytes()).ok()?;
        if suffix.typ() != Some(Type::Private) {
            return Some(text);
        }
        candidate = text.split_once('.')?.1;
    }
}
