//! urlrisk - URL risk scoring pipeline
//!
//! Classifies a submitted web address as `safe` or `phishing`, with a reason
//! code and a confidence score.
//!
//! # Pipeline
//!
//! 1. **Normalize/validate**: trim, add `http://` when no scheme is given, and
//!    reject unsafe input (bad scheme, private addresses, odd characters,
//!    malformed hosts).
//! 2. **Decompose** the host with the Public Suffix List into subdomain labels,
//!    registrable label and suffix (`co.uk` stays one suffix).
//! 3. **Match** against the blocklist, then each trusted domain of the
//!    whitelist in order: explicit allow, or a typosquat hit when the
//!    second-level label is too similar to the trusted one.
//! 4. **Score**: an 11-feature lexical vector feeds the probability provider,
//!    and a rule-based heuristic score is computed alongside.
//! 5. **Fuse** both signals with fixed precedence into a [`DecisionResult`].
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use urlrisk::{
//!     BlocklistSnapshot, LogisticModel, ReasonCode, RiskPipeline, SnapshotStore, Snapshots,
//!     Verdict, WhitelistSnapshot,
//! };
//!
//! let whitelist = WhitelistSnapshot::from_pairs(vec![("google.com", vec!["mail.google.com"])])?;
//! let blocklist = BlocklistSnapshot::from_entries(["phish.example.com/login"]);
//! let store = Arc::new(SnapshotStore::new(Snapshots::new(blocklist, whitelist)));
//! let pipeline = RiskPipeline::new(Arc::new(LogisticModel::default()), store);
//!
//! let result = pipeline.classify("https://gogle.com")?;
//! assert_eq!(result.verdict, Verdict::Phishing);
//! assert_eq!(result.reason, ReasonCode::Typosquat);
//!
//! let result = pipeline.classify("https://mail.google.com")?;
//! assert_eq!(result.reason, ReasonCode::Whitelist);
//! # Ok::<(), urlrisk::UrlRiskError>(())
//! ```
//!
//! # Error Handling
//!
//! Classification returns `Result<DecisionResult, UrlRiskError>`:
//!
//! - `InvalidInput` - the URL was rejected and never scored
//! - `ProviderUnavailable` - the probability provider failed; the request fails
//! - `Configuration` - config, model or snapshot data could not be loaded

// Re-export the pipeline
pub use pipeline::{Assessment, RiskPipeline};

// Re-export scoring stages
pub use crate::core::{
    extract_features, heuristic_score, similarity_ratio, FusionEngine, FusionThresholds,
    HeuristicScorer, HeuristicWeights, Matcher, MatcherConfig,
};

// Re-export URL handling
pub use crate::url::{
    normalize_host, normalize_url, split_host_with_psl, validate_host, DomainParts,
    NormalizedUrl, ValidationPolicy,
};

// Re-export collaborators and public types
pub use audit::{DecisionLogger, JsonLinesDecisionLogger, TracingDecisionLogger};
pub use config::UrlRiskConfig;
pub use error::{InvalidUrl, UrlRiskError};
pub use provider::{LogisticModel, ProbabilityProvider};
pub use snapshot::{BlocklistSnapshot, SnapshotStore, Snapshots, TrustedDomain, WhitelistSnapshot};
pub use types::{
    DecisionResult, DetectionRecord, FeatureVector, MatchOutcome, ReasonCode, Verdict,
    FEATURE_NAMES, FEATURE_VERSION,
};

// Module declarations
pub mod audit;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod snapshot;
pub mod types;
pub mod url;
