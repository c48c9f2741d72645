//! Registry source port
//!
//! A source yields a whole [`JudgeRegistry`] snapshot. Swapping sources or
//! saving a new document always replaces the registry wholesale.

use panel_domain::{DomainError, JudgeRegistry};
use thiserror::Error;

/// Errors while loading or replacing the judge registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid judges document {path}: {reason}")]
    InvalidDocument { path: String, reason: String },

    #[error("Invalid judge registry: {0}")]
    InvalidRegistry(#[from] DomainError),

    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Registry source is read-only")]
    ReadOnly,
}

/// Where the judge registry comes from
pub trait RegistrySource: Send + Sync {
    /// Load a fresh snapshot
    fn load(&self) -> Result<JudgeRegistry, RegistryError>;

    /// Human-readable origin (for `--show-config` and logs)
    fn describe(&self) -> String;

    /// Replace the stored document and return the new snapshot
    fn save(&self, _registry: &JudgeRegistry) -> Result<JudgeRegistry, RegistryError> {
        Err(RegistryError::ReadOnly)
    }

    /// Drop any override so the built-in panel applies again
    fn reset(&self) -> Result<JudgeRegistry, RegistryError> {
        Err(RegistryError::ReadOnly)
    }
}

/// The built-in five-judge panel
pub struct BuiltinRegistrySource;

impl RegistrySource for BuiltinRegistrySource {
    fn load(&self) -> Result<JudgeRegistry, RegistryError> {
        Ok(JudgeRegistry::builtin())
    }

    fn describe(&self) -> String {
        "built-in panel".to_string()
    }
}
