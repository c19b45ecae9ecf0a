//! Blocklist, whitelist and typosquat matching.
//!
//! Checks run in a fixed order and the first hit wins:
//! 1. exact blocklist membership of the normalized URL,
//! 2. for each trusted base domain, in snapshot order, an explicit allow of the
//!    hostname or else a typosquat hit when the second-level label is too
//!    similar to the base domain's first label.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::similarity::similarity_ratio;
use crate::snapshot::Snapshots;
use crate::types::MatchOutcome;
use crate::url::{DomainParts, NormalizedUrl};

/// Matcher tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Similarity strictly above this is a typosquat.
    pub typosquat_ratio: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            typosquat_ratio: 0.8,
        }
    }
}

/// Runs the ordered membership checks against a snapshot pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Matcher {
    config: MatcherConfig,
}

impl Matcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn match_url(
        &self,
        url: &NormalizedUrl,
        parts: &DomainParts,
        snapshots: &Snapshots,
    ) -> MatchOutcome {
        if snapshots.blocklist.contains(url.as_str()) {
            info!(url = url.as_str(), "blocklist hit");
            return MatchOutcome::Blocked;
        }

        let host = url.host();
        for trusted in snapshots.whitelist.iter() {
            if trusted.allows(host) {
                info!(host, base = trusted.domain(), "whitelist hit");
                return MatchOutcome::Whitelisted {
                    base_domain: trusted.domain().to_string(),
                };
            }

            let ratio = similarity_ratio(&parts.registrable, trusted.first_label());
            if ratio > self.config.typosquat_ratio {
                info!(host, base = trusted.domain(), ratio, "typosquat hit");
                return MatchOutcome::Typosquat {
                    base_domain: trusted.domain().to_string(),
                    ratio,
                };
            }
        }

        MatchOutcome::NoMatch
    }
}
