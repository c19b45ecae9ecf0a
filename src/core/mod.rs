//! Scoring stages of the risk pipeline.
//!
//! This module contains:
//! - Lexical feature extraction
//! - Rule-based heuristic scoring
//! - Blocklist/whitelist/typosquat matching
//! - Decision fusion

pub mod features;
pub mod fusion;
pub mod heuristic;
pub mod matcher;
pub mod similarity;

// Re-export main functionality
pub use features::{extract_features, extract_features_with_parts, PHISHING_KEYWORDS, SUSPICIOUS_TLDS};
pub use fusion::{FusionEngine, FusionThresholds};
pub use heuristic::{heuristic_score, HeuristicScorer, HeuristicWeights, HEURISTIC_SUSPICIOUS_TLDS};
pub use matcher::{Matcher, MatcherConfig};
pub use similarity::{lcs_len, similarity_ratio};
