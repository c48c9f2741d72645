//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No judges configured for the panel")]
    NoJudges,

    #[error("Artifact has no usable content (image URL or text required)")]
    EmptyArtifact,

    #[error("Duplicate judge id: {0}")]
    DuplicateJudge(String),

    #[error("Invalid judge: {0}")]
    InvalidJudge(String),

    #[error("Orchestration error: {0}")]
    Orchestration(String),
}

impl DomainError {
    /// Whether this error means the panel configuration itself is unusable.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, DomainError::Orchestration(_))
    }
}
