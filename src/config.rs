//! TOML configuration: validation policy, scoring weights, thresholds, model
//! parameters and snapshot sources.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::fusion::FusionThresholds;
use crate::core::heuristic::HeuristicWeights;
use crate::core::matcher::MatcherConfig;
use crate::error::UrlRiskError;
use crate::provider::LogisticModel;
use crate::snapshot::{BlocklistSnapshot, Snapshots, WhitelistSnapshot};
use crate::url::ValidationPolicy;

/// One trusted base domain and its explicitly allowed hostnames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistEntry {
    pub domain: String,
    #[serde(default)]
    pub allowed: Vec<String>,
}

/// Where the blocklist and whitelist come from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Line-oriented blocklist file. Relative paths resolve against the config file.
    pub blocklist_path: Option<PathBuf>,
    /// Trusted domains, scanned in this order.
    pub whitelist: Vec<WhitelistEntry>,
}

/// Optional JSON-lines decision log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub path: Option<PathBuf>,
}

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlRiskConfig {
    pub validation: ValidationPolicy,
    pub heuristic: HeuristicWeights,
    pub fusion: FusionThresholds,
    pub matcher: MatcherConfig,
    pub model: LogisticModel,
    pub snapshots: SnapshotConfig,
    pub audit: AuditConfig,
    /// Directory relative paths resolve against; set by [`load`].
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl UrlRiskConfig {
    /// Parse a TOML document.
    pub fn from_toml(data: &str) -> Result<Self, UrlRiskError> {
        Ok(toml::from_str(data)?)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Blocklist file location, if configured.
    pub fn blocklist_path(&self) -> Option<PathBuf> {
        self.snapshots
            .blocklist_path
            .as_deref()
            .map(|path| self.resolve(path))
    }

    /// Decision log location, if configured.
    pub fn audit_path(&self) -> Option<PathBuf> {
        self.audit.path.as_deref().map(|path| self.resolve(path))
    }

    /// Load the configured blocklist and whitelist into a snapshot pair.
    pub fn build_snapshots(&self) -> Result<Snapshots, UrlRiskError> {
        let blocklist = match self.blocklist_path() {
            Some(path) => BlocklistSnapshot::load(&path)?,
            None => BlocklistSnapshot::default(),
        };
        let whitelist = WhitelistSnapshot::from_pairs(
            self.snapshots
                .whitelist
                .iter()
                .map(|entry| (entry.domain.as_str(), entry.allowed.iter())),
        )?;
        Ok(Snapshots::new(blocklist, whitelist))
    }
}

/// Load configuration from `path`.
pub fn load(path: &Path) -> Result<UrlRiskConfig, UrlRiskError> {
    let data = fs::read_to_string(path).map_err(|err| {
        UrlRiskError::Configuration(format!("config {}: {}", path.display(), err))
    })?;
    let mut cfg = UrlRiskConfig::from_toml(&data)?;
    cfg.base_dir = path.parent().map(Path::to_path_buf);
    tracing::info!("loaded config from {}", path.display());
    Ok(cfg)
}
