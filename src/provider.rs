//! Probability provider boundary.
//!
//! The pipeline only consumes inference: given a [`FeatureVector`] in the fixed
//! order of [`FEATURE_NAMES`](crate::types::FEATURE_NAMES), a provider returns
//! the probability that the URL is phishing.

use serde::{Deserialize, Serialize};

use crate::error::UrlRiskError;
use crate::types::{FeatureVector, FEATURE_NAMES};

/// A synchronous, side-effect free phishing probability source.
///
/// Implementations must be deterministic for identical input.
pub trait ProbabilityProvider: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f64, UrlRiskError>;
}

impl<F> ProbabilityProvider for F
where
    F: Fn(&FeatureVector) -> Result<f64, String> + Send + Sync,
{
    fn predict(&self, features: &FeatureVector) -> Result<f64, UrlRiskError> {
        self(features).map_err(UrlRiskError::ProviderUnavailable)
    }
}

/// Call `provider` and reject answers that are not a probability.
pub fn checked_predict(
    provider: &dyn ProbabilityProvider,
    features: &FeatureVector,
) -> Result<f64, UrlRiskError> {
    let p = provider.predict(features)?;
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(UrlRiskError::ProviderUnavailable(format!(
            "probability out of range: {}",
            p
        )));
    }
    Ok(p)
}

/// Inference side of a logistic-regression classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLogisticModel", into = "RawLogisticModel")]
pub struct LogisticModel {
    intercept: f64,
    coefficients: [f64; 11],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawLogisticModel {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl TryFrom<RawLogisticModel> for LogisticModel {
    type Error = UrlRiskError;

    fn try_from(raw: RawLogisticModel) -> Result<Self, Self::Error> {
        LogisticModel::new(raw.intercept, &raw.coefficients)
    }
}

impl From<LogisticModel> for RawLogisticModel {
    fn from(model: LogisticModel) -> Self {
        Self {
            intercept: model.intercept,
            coefficients: model.coefficients.to_vec(),
        }
    }
}

impl Default for LogisticModel {
    fn default() -> Self {
        Self {
            intercept: -2.5,
            coefficients: [
                0.05,  // domain_len
                0.02,  // url_len
                0.15,  // num_digits
                0.30,  // num_subdomains
                0.05,  // spec_chars
                -1.20, // uses_https
                1.50,  // has_at
                0.90,  // has_hyphen
                1.60,  // tld_suspicious
                1.40,  // ip_in_domain
                0.80,  // keyword_hits
            ],
        }
    }
}

impl LogisticModel {
    /// Build a model; `coefficients` must have one weight per feature.
    pub fn new(intercept: f64, coefficients: &[f64]) -> Result<Self, UrlRiskError> {
        let coefficients: [f64; 11] = coefficients.try_into().map_err(|_| {
            UrlRiskError::Configuration(format!(
                "model expects {} coefficients, got {}",
                FEATURE_NAMES.len(),
                coefficients.len()
            ))
        })?;

        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(UrlRiskError::Configuration(
                "model parameters must be finite".to_string(),
            ));
        }

        Ok(Self {
            intercept,
            coefficients,
        })
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64; 11] {
        &self.coefficients
    }
}

impl ProbabilityProvider for LogisticModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, UrlRiskError> {
        let z = features
            .as_array()
            .iter()
            .zip(self.coefficients.iter())
            .fold(self.intercept, |acc, (x, w)| acc + x * w);
        Ok(sigmoid(z))
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
