//! End-to-end URL risk classification.
//!
//! raw input → normalize/validate → decompose + extract features → matcher
//! (blocklist, whitelist, typosquat short-circuit) → heuristic + probability →
//! fusion. Each call is a pure computation over the snapshots active when it
//! started, with a single synchronous call into the probability provider.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::audit::DecisionLogger;
use crate::config::UrlRiskConfig;
use crate::core::features::extract_features_with_parts;
use crate::core::fusion::FusionEngine;
use crate::core::heuristic::HeuristicScorer;
use crate::core::matcher::Matcher;
use crate::error::UrlRiskError;
use crate::provider::{checked_predict, ProbabilityProvider};
use crate::snapshot::{SnapshotStore, Snapshots};
use crate::types::{DecisionResult, DetectionRecord, FeatureVector};
use crate::url::{split_host_with_psl, DomainParts, NormalizedUrl, ValidationPolicy};

/// Lexical view of a URL without a verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub url: NormalizedUrl,
    pub parts: DomainParts,
    pub features: FeatureVector,
    pub heuristic: f64,
}

/// The configured classification pipeline.
pub struct RiskPipeline {
    policy: ValidationPolicy,
    matcher: Matcher,
    scorer: HeuristicScorer,
    fusion: FusionEngine,
    provider: Arc<dyn ProbabilityProvider>,
    snapshots: Arc<SnapshotStore>,
    logger: Option<Arc<dyn DecisionLogger>>,
}

impl std::fmt::Debug for RiskPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskPipeline")
            .field("policy", &self.policy)
            .field("matcher", &self.matcher)
            .field("scorer", &self.scorer)
            .field("fusion", &self.fusion)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

impl RiskPipeline {
    /// Pipeline with default policy, weights and thresholds.
    pub fn new(provider: Arc<dyn ProbabilityProvider>, snapshots: Arc<SnapshotStore>) -> Self {
        Self {
            policy: ValidationPolicy::default(),
            matcher: Matcher::default(),
            scorer: HeuristicScorer::default(),
            fusion: FusionEngine::default(),
            provider,
            snapshots,
            logger: None,
        }
    }

    /// Pipeline tuned by `config`.
    pub fn from_config(
        config: &UrlRiskConfig,
        provider: Arc<dyn ProbabilityProvider>,
        snapshots: Arc<SnapshotStore>,
    ) -> Self {
        Self {
            policy: config.validation,
            matcher: Matcher::new(config.matcher),
            scorer: HeuristicScorer::new(config.heuristic),
            fusion: FusionEngine::new(config.fusion),
            provider,
            snapshots,
            logger: None,
        }
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn DecisionLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The store whose active snapshots new requests use.
    pub fn snapshots(&self) -> &Arc<SnapshotStore> {
        &self.snapshots
    }

    /// Validate and classify `raw`.
    pub fn classify(&self, raw: &str) -> Result<DecisionResult, UrlRiskError> {
        let url = self.normalize(raw)?;
        let snapshots = self.snapshots.current();
        self.classify_normalized(&url, &snapshots)
    }

    /// Classify `raw` and hand the decision to the configured logger.
    ///
    /// Logger failures are reported at `warn` and never affect the result.
    pub fn classify_and_log(&self, raw: &str) -> Result<DecisionResult, UrlRiskError> {
        let decision = self.classify(raw)?;
        if let Some(logger) = &self.logger {
            let record = DetectionRecord::new(raw.trim(), &decision);
            if let Err(err) = logger.record(&record) {
                warn!("failed to log decision for {}: {:#}", record.url, err);
            }
        }
        Ok(decision)
    }

    /// Classify an already validated URL against explicit snapshots.
    pub fn classify_normalized(
        &self,
        url: &NormalizedUrl,
        snapshots: &Snapshots,
    ) -> Result<DecisionResult, UrlRiskError> {
        let parts = split_host_with_psl(url.host());

        let outcome = self.matcher.match_url(url, &parts, snapshots);
        if let Some(decision) = self.fusion.decide_match(&outcome) {
            return Ok(decision);
        }

        let features = extract_features_with_parts(url, &parts);
        let h = self.scorer.score_with_parts(url, &parts, &features);
        let p = checked_predict(self.provider.as_ref(), &features)?;

        Ok(self.fusion.fuse(p, h, Some(features)))
    }

    /// Features and heuristic score for `raw`, without matching or the model.
    pub fn assess(&self, raw: &str) -> Result<Assessment, UrlRiskError> {
        let url = self.normalize(raw)?;
        let parts = split_host_with_psl(url.host());
        let features = extract_features_with_parts(&url, &parts);
        let heuristic = self.scorer.score_with_parts(&url, &parts, &features);
        Ok(Assessment {
            url,
            parts,
            features,
            heuristic,
        })
    }

    fn normalize(&self, raw: &str) -> Result<NormalizedUrl, UrlRiskError> {
        self.policy.normalize(raw).map_err(|err| {
            debug!("rejected {:?}: {}", raw, err);
            UrlRiskError::InvalidInput(err)
        })
    }
}
