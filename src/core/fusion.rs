//! Decision fusion: combines matcher hits, model probability and heuristic score.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{DecisionResult, FeatureVector, MatchOutcome, ReasonCode, Verdict};

/// Cut-offs used by the fusion rules. All comparisons are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionThresholds {
    /// Minimum `(p + h) / 2` for an `ml+heuristic` phishing verdict.
    pub combined: f64,
    /// Minimum probability for an `ml` phishing verdict.
    pub ml: f64,
    /// Minimum heuristic score for a `heuristic` phishing verdict.
    pub heuristic: f64,
    /// Probability at which the model's binary label flips to phishing.
    pub label: f64,
}

impl Default for FusionThresholds {
    fn default() -> Self {
        Self {
            combined: 0.65,
            ml: 0.70,
            heuristic: 0.50,
            label: 0.5,
        }
    }
}

/// Applies the fixed precedence policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FusionEngine {
    thresholds: FusionThresholds,
}

impl FusionEngine {
    pub fn new(thresholds: FusionThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &FusionThresholds {
        &self.thresholds
    }

    /// Decision for a matcher hit, or `None` when scoring must continue.
    pub fn decide_match(&self, outcome: &MatchOutcome) -> Option<DecisionResult> {
        match outcome {
            MatchOutcome::Blocked => Some(DecisionResult::new(
                Verdict::Phishing,
                ReasonCode::Blocklist,
                1.0,
                None,
            )),
            MatchOutcome::Whitelisted { .. } => Some(DecisionResult::new(
                Verdict::Safe,
                ReasonCode::Whitelist,
                0.0,
                None,
            )),
            MatchOutcome::Typosquat { .. } => Some(DecisionResult::new(
                Verdict::Phishing,
                ReasonCode::Typosquat,
                1.0,
                None,
            )),
            MatchOutcome::NoMatch => None,
        }
    }

    /// Fuse probability `p` and heuristic score `h` for a URL with no matcher hit.
    pub fn fuse(&self, p: f64, h: f64, features: Option<FeatureVector>) -> DecisionResult {
        let t = &self.thresholds;
        let label = p >= t.label;
        let combined = (p + h) / 2.0;

        let (verdict, reason, score) = if combined >= t.combined {
            (Verdict::Phishing, ReasonCode::MlHeuristic, combined)
        } else if label && p >= t.ml {
            (Verdict::Phishing, ReasonCode::Ml, p)
        } else if h >= t.heuristic {
            (Verdict::Phishing, ReasonCode::Heuristic, h)
        } else {
            (Verdict::Safe, ReasonCode::Ml, p)
        };

        debug!(p, h, combined, %verdict, %reason, "fused decision");
        DecisionResult::new(verdict, reason, score, features)
    }

    /// Full precedence: matcher hits first, then fusion.
    pub fn decide(
        &self,
        outcome: &MatchOutcome,
        p: f64,
        h: f64,
        features: Option<FeatureVector>,
    ) -> DecisionResult {
        self.decide_match(outcome)
            .unwrap_or_else(|| self.fuse(p, h, features))
    }
}
