//! URL processing ahead of scoring.
//!
//! This module contains:
//! - URL normalization and validation
//! - Public Suffix List (PSL) domain decomposition

pub mod normalizer;
pub mod psl;

// Re-export main functionality
pub use self::normalizer::{
    normalize_host, normalize_url, validate_host, NormalizedUrl, ValidationPolicy, MAX_HOST_LEN,
};
pub use self::psl::{split_host_with_psl, DomainParts};
