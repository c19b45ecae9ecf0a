//! Decision logger collaborators.
//!
//! Every classification can be handed to a [`DecisionLogger`] together with the
//! submitted URL and a timestamp. Logging is fire-and-forget from the
//! pipeline's point of view: a failing logger is reported and ignored.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tracing::info;

use crate::types::DetectionRecord;

/// Append-only sink for detection records.
pub trait DecisionLogger: Send + Sync {
    fn record(&self, record: &DetectionRecord) -> Result<()>;
}

/// Emits each record as a structured `tracing` event on the `urlrisk::audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDecisionLogger;

impl DecisionLogger for TracingDecisionLogger {
    fn record(&self, record: &DetectionRecord) -> Result<()> {
        info!(
            target: "urlrisk::audit",
            timestamp = %record.timestamp.to_rfc3339(),
            url = %record.url,
            verdict = %record.verdict,
            reason = %record.reason,
            score = record.score,
            features = ?record.features,
            "detection"
        );
        Ok(())
    }
}

/// Appends one JSON object per line to a file.
#[derive(Debug)]
pub struct JsonLinesDecisionLogger {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesDecisionLogger {
    /// Open `path` for appending, creating it and its parent directory if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening decision log {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DecisionLogger for JsonLinesDecisionLogger {
    fn record(&self, record: &DetectionRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        let mut file = self.file.lock();
        writeln!(file, "{}", line)
            .with_context(|| format!("writing decision log {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DecisionResult, FeatureVector, ReasonCode, Verdict};

    #[test]
    fn test_json_lines_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("detections.jsonl");

        let logger = JsonLinesDecisionLogger::open(&path).unwrap();
        let decision = DecisionResult::new(Verdict::Phishing, ReasonCode::Typosquat, 1.0, None);
        logger.record(&DetectionRecord::new("https://gogle.com", &decision)).unwrap();
        logger.record(&DetectionRecord::new("https://gogle.com/x", &decision)).unwrap();

        let data = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = data.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["url"], "https://gogle.com");
        assert_eq!(first["verdict"], "phishing");
        assert_eq!(first["reason"], "typosquat");
        assert_eq!(first["score"], serde_json::json!(1.0));
        assert!(first["timestamp"].is_string());
        assert!(first["features"].is_null());
    }

    #[test]
    fn test_fused_decision_keeps_features() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detections.jsonl");
        let logger = JsonLinesDecisionLogger::open(&path).unwrap();

        let features = FeatureVector {
            domain_len: 12,
            has_hyphen: 1,
            ..FeatureVector::default()
        };
        let decision =
            DecisionResult::new(Verdict::Phishing, ReasonCode::Heuristic, 1.0, Some(features));
        logger.record(&DetectionRecord::new("https://account-help.com", &decision)).unwrap();

        let data = fs::read_to_string(&path).unwrap();
        let record: serde_json::Value = serde_json::from_str(data.trim()).unwrap();
        assert_eq!(record["features"]["domain_len"], 12);
        assert_eq!(record["features"]["has_hyphen"], 1);
    }

    #[test]
    fn test_tracing_logger_never_fails() {
        let decision = DecisionResult::new(Verdict::Safe, ReasonCode::Ml, 0.1, None);
        assert!(TracingDecisionLogger
            .record(&DetectionRecord::new("https://example.com", &decision))
            .is_ok());
    }
}
