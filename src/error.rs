//! Error types for URL validation and risk classification.

use thiserror::Error;

/// Reasons a submitted URL is rejected before it reaches any scoring stage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidUrl {
    /// Nothing left after trimming surrounding whitespace.
    #[error("Please enter a URL")]
    Empty,

    /// The scheme is not accepted by the active validation policy.
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// The URL has no hostname.
    #[error("URL has no hostname")]
    EmptyHost,

    /// The raw input contains a character that is never valid in a submitted URL.
    #[error("URL contains an unsafe character: {0:?}")]
    UnsafeCharacter(char),

    /// The hostname points at a loopback or private IPv4 range.
    #[error("Private or loopback address not allowed: {0}")]
    PrivateAddress(String),

    /// More than one `@` appears in the input.
    #[error("URL contains more than one '@'")]
    MultipleAt,

    /// The hostname exceeds 253 characters.
    #[error("Hostname exceeds maximum length of 253 characters (got {0})")]
    HostTooLong(usize),

    /// The hostname is not a dotted sequence of labels ending in an alphabetic suffix.
    #[error("Malformed hostname: {0}")]
    MalformedHost(String),

    /// URL parsing failed using the url crate.
    #[error("URL parsing error: {0}")]
    Parse(String),
}

impl From<url::ParseError> for InvalidUrl {
    fn from(err: url::ParseError) -> Self {
        match err {
            url::ParseError::EmptyHost => InvalidUrl::EmptyHost,
            other => InvalidUrl::Parse(other.to_string()),
        }
    }
}

/// Errors surfaced by the risk pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UrlRiskError {
    /// The input was rejected by validation and was not classified.
    #[error("Invalid URL: {0}")]
    InvalidInput(#[from] InvalidUrl),

    /// The probability provider failed or returned an unusable value.
    #[error("Probability provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Configuration, model or snapshot data could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl UrlRiskError {
    /// Whether this error is a user-facing rejection rather than a system fault.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, UrlRiskError::InvalidInput(_))
    }
}

impl From<std::io::Error> for UrlRiskError {
    fn from(err: std::io::Error) -> Self {
        UrlRiskError::Configuration(err.to_string())
    }
}

impl From<toml::de::Error> for UrlRiskError {
    fn from(err: toml::de::Error) -> Self {
        UrlRiskError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            UrlRiskError::InvalidInput(InvalidUrl::MultipleAt).to_string(),
            "Invalid URL: URL contains more than one '@'"
        );

        assert_eq!(
            InvalidUrl::HostTooLong(300).to_string(),
            "Hostname exceeds maximum length of 253 characters (got 300)"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(InvalidUrl::EmptyHost, InvalidUrl::EmptyHost);
        assert_ne!(InvalidUrl::EmptyHost, InvalidUrl::MultipleAt);
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let err: InvalidUrl = url::ParseError::EmptyHost.into();
        assert_eq!(err, InvalidUrl::EmptyHost);

        let err: InvalidUrl = url::ParseError::InvalidPort.into();
        match err {
            InvalidUrl::Parse(_) => (),
            _ => panic!("Expected Parse variant"),
        }
    }

    #[test]
    fn test_invalid_input_classification() {
        let err: UrlRiskError = InvalidUrl::Empty.into();
        assert!(err.is_invalid_input());
        assert!(!UrlRiskError::ProviderUnavailable("down".into()).is_invalid_input());
    }
}
