//! Error types for engine checking.
//!
//! This module defines [`EngineCheckError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! Per-engine resolution failures are deliberately not variants here: they
//! are values ([`crate::resolver::ResolveError`]) folded into the aggregate
//! check outcome, so one failing probe never aborts the rest of a check.

use std::path::PathBuf;

use thiserror::Error;

use crate::check::Reports;

/// Core error type for engine check operations.
#[derive(Debug, Error)]
pub enum EngineCheckError {
    /// Manifest file not found at the expected location.
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Failed to parse the manifest file.
    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// One or more engines failed resolution or range evaluation. The
    /// message carries one line per failing engine; `reports` still covers
    /// every declared engine, failing or not.
    #[error("{message}")]
    Unsatisfied { message: String, reports: Reports },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for engine check operations.
pub type Result<T> = std::result::Result<T, EngineCheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_not_found_displays_path() {
        let err = EngineCheckError::ManifestNotFound {
            path: PathBuf::from("/proj/package.json"),
        };
        assert!(err.to_string().contains("/proj/package.json"));
    }

    #[test]
    fn manifest_parse_displays_path_and_message() {
        let err = EngineCheckError::ManifestParse {
            path: PathBuf::from("/proj/package.json"),
            message: "expected value at line 3".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/proj/package.json"));
        assert!(msg.contains("expected value at line 3"));
    }

    #[test]
    fn unsatisfied_displays_combined_message_verbatim() {
        let err = EngineCheckError::Unsatisfied {
            message: "npm version (1.4.28) does not satisfy specified range (>=2.11.2)".into(),
            reports: Reports::new(),
        };
        assert_eq!(
            err.to_string(),
            "npm version (1.4.28) does not satisfy specified range (>=2.11.2)"
        );
    }
}
