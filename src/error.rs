//! Error types for artifact loading and message validation

use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading or validating the vectorizer/classifier pair.
///
/// Any of these is fatal at startup: no prediction can be served without
/// both artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Artifact file does not exist
    #[error("{kind} artifact not found at {}", .path.display())]
    Missing { kind: &'static str, path: PathBuf },

    /// Artifact file exists but could not be read
    #[error("Failed to read {kind} artifact {}: {source}", .path.display())]
    Io {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact file is not valid JSON for its format
    #[error("Corrupt {kind} artifact {}: {source}", .path.display())]
    Parse {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact parsed but its contents are inconsistent
    #[error("Invalid {kind} artifact: {details}")]
    Invalid { kind: &'static str, details: String },

    /// Vectorizer and classifier disagree on the feature dimension
    #[error("Classifier expects {classifier} features but vectorizer produces {vectorizer}")]
    DimensionMismatch { vectorizer: usize, classifier: usize },
}

/// Rejections of user input before it reaches the pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter a message")]
    EmptyMessage,
}

/// Result type for artifact operations
pub type Result<T> = std::result::Result<T, ArtifactError>;
