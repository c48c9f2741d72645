//! File-backed judge registry.
//!
//! The judges document is TOML (default) or JSON, chosen by extension:
//!
//! ```toml
//! [[judges]]
//! id = "grok_judge"
//! display_name = "Grok"
//! model = "grok-beta"
//! persona = "..."
//! ```

use panel_application::ports::registry_source::{RegistryError, RegistrySource};
use panel_domain::{JudgeIdentity, JudgeRegistry};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk shape of the judges document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgesDocument {
    pub judges: Vec<JudgeIdentity>,
}

impl From<&JudgeRegistry> for JudgesDocument {
    fn from(registry: &JudgeRegistry) -> Self {
        Self {
            judges: registry.list_judges().to_vec(),
        }
    }
}

/// Registry source reading an override document, falling back to the
/// built-in panel when the file does not exist.
pub struct FileRegistrySource {
    path: PathBuf,
}

impl FileRegistrySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }

    fn invalid(&self, reason: impl ToString) -> RegistryError {
        RegistryError::InvalidDocument {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    fn io(&self, reason: impl ToString) -> RegistryError {
        RegistryError::Io {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    fn parse(&self, text: &str) -> Result<JudgesDocument, RegistryError> {
        if self.is_json() {
            serde_json::from_str(text).map_err(|e| self.invalid(e))
        } else {
            toml::from_str(text).map_err(|e| self.invalid(e))
        }
    }

    fn render(&self, document: &JudgesDocument) -> Result<String, RegistryError> {
        if self.is_json() {
            serde_json::to_string_pretty(document).map_err(|e| self.invalid(e))
        } else {
            toml::to_string_pretty(document).map_err(|e| self.invalid(e))
        }
    }
}

impl RegistrySource for FileRegistrySource {
    fn load(&self) -> Result<JudgeRegistry, RegistryError> {
        if !self.path.exists() {
            debug!("No judges file at {}, using built-in panel", self.path.display());
            return Ok(JudgeRegistry::builtin());
        }

        let text = std::fs::read_to_string(&self.path).map_err(|e| self.io(e))?;
        let document = self.parse(&text)?;
        let registry = JudgeRegistry::new(document.judges)?;
        info!(
            "Loaded {} judges from {}",
            registry.len(),
            self.path.display()
        );
        Ok(registry)
    }

    fn describe(&self) -> String {
        if self.path.exists() {
            format!("judges file {}", self.path.display())
        } else {
            format!("built-in panel ({} not present)", self.path.display())
        }
    }

    /// Validate, then write the whole document through a temp file + rename.
    fn save(&self, registry: &JudgeRegistry) -> Result<JudgeRegistry, RegistryError> {
        let snapshot = JudgeRegistry::new(registry.list_judges().to_vec())?;
        let text = self.render(&JudgesDocument::from(&snapshot))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.io(e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.io(e))?;
        tmp.write_all(text.as_bytes()).map_err(|e| self.io(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io(e))?;
        tmp.persist(&self.path).map_err(|e| self.io(e.error))?;

        info!("Saved {} judges to {}", snapshot.len(), self.path.display());
        Ok(snapshot)
    }

    fn reset(&self) -> Result<JudgeRegistry, RegistryError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => info!("Removed judges override {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(self.io(e)),
        }
        Ok(JudgeRegistry::builtin())
    }
}
