//! Immutable blocklist/whitelist snapshots and the store that publishes them.
//!
//! Snapshots are built once by whoever refreshes the feeds and never mutated
//! afterwards. [`SnapshotStore`] swaps the active `Arc` under a short write lock;
//! requests clone the `Arc` they start with and keep using it even if a newer
//! snapshot is published while they run.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::error::UrlRiskError;
use crate::url::normalize_host;

/// Canonical form used for blocklist comparison: trimmed, lowercased,
/// trailing `/` removed and leading `http://`/`https://` stripped.
pub fn normalize_blocklist_entry(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let without_slash = lower.trim_end_matches('/');
    without_slash
        .strip_prefix("http://")
        .or_else(|| without_slash.strip_prefix("https://"))
        .unwrap_or(without_slash)
        .to_string()
}

/// Known-bad URLs and domains, exact match only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlocklistSnapshot {
    entries: HashSet<String>,
}

impl BlocklistSnapshot {
    /// Build from raw entries; each one is normalized, blanks are dropped.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|entry| normalize_blocklist_entry(entry.as_ref()))
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { entries }
    }

    /// Read one entry per line. Blank lines and `#` comments are skipped.
    pub fn load(path: &Path) -> Result<Self, UrlRiskError> {
        let data = fs::read_to_string(path).map_err(|err| {
            UrlRiskError::Configuration(format!("blocklist {}: {}", path.display(), err))
        })?;
        let snapshot = Self::from_entries(
            data.lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        );
        info!(
            "loaded {} blocklist entries from {}",
            snapshot.len(),
            path.display()
        );
        Ok(snapshot)
    }

    /// Exact membership after normalizing `url`.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains(&normalize_blocklist_entry(url))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A trusted base domain and the full hostnames explicitly allowed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedDomain {
    domain: String,
    allowed: HashSet<String>,
}

impl TrustedDomain {
    pub fn new<I, S>(domain: &str, allowed: I) -> Result<Self, UrlRiskError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domain = normalize_host(domain)
            .map_err(|err| UrlRiskError::Configuration(format!("whitelist domain: {}", err)))?;
        if domain.split('.').next().map_or(true, str::is_empty) {
            return Err(UrlRiskError::Configuration(format!(
                "whitelist domain {:?} has an empty first label",
                domain
            )));
        }
        let allowed = allowed
            .into_iter()
            .map(|host| {
                normalize_host(host.as_ref()).map_err(|err| {
                    UrlRiskError::Configuration(format!("whitelist host for {}: {}", domain, err))
                })
            })
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(Self { domain, allowed })
    }

    /// The base domain, e.g. `google.com`.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// First dot-label of the base domain (`google` for `google.com`).
    pub fn first_label(&self) -> &str {
        self.domain.split('.').next().unwrap_or("")
    }

    pub fn allows(&self, host: &str) -> bool {
        self.allowed.contains(host)
    }
}

/// Trusted domains in their configured order.
///
/// Order matters: the matcher stops at the first base domain that produces an
/// allow or typosquat hit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhitelistSnapshot {
    entries: Vec<TrustedDomain>,
}

impl WhitelistSnapshot {
    pub fn new(entries: Vec<TrustedDomain>) -> Self {
        Self { entries }
    }

    /// Build from `(base_domain, allowed_hosts)` pairs, preserving order.
    pub fn from_pairs<I, D, A, S>(pairs: I) -> Result<Self, UrlRiskError>
    where
        I: IntoIterator<Item = (D, A)>,
        D: AsRef<str>,
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(domain, allowed)| TrustedDomain::new(domain.as_ref(), allowed))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrustedDomain> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The pair of snapshots a request is evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshots {
    pub blocklist: BlocklistSnapshot,
    pub whitelist: WhitelistSnapshot,
}

impl Snapshots {
    pub fn new(blocklist: BlocklistSnapshot, whitelist: WhitelistSnapshot) -> Self {
        Self {
            blocklist,
            whitelist,
        }
    }
}

/// Holds the active snapshots and replaces them atomically.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    active: RwLock<Arc<Snapshots>>,
}

impl SnapshotStore {
    pub fn new(snapshots: Snapshots) -> Self {
        Self {
            active: RwLock::new(Arc::new(snapshots)),
        }
    }

    /// The snapshots new requests should use.
    pub fn current(&self) -> Arc<Snapshots> {
        self.active.read().clone()
    }

    /// Make `snapshots` active. Returns the previously active snapshots.
    pub fn publish(&self, snapshots: Snapshots) -> Arc<Snapshots> {
        let next = Arc::new(snapshots);
        info!(
            blocklist = next.blocklist.len(),
            whitelist = next.whitelist.len(),
            "publishing snapshots"
        );
        std::mem::replace(&mut *self.active.write(), next)
    }
}
