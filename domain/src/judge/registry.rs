//! Judge registry snapshot

use super::entities::JudgeIdentity;
use crate::core::error::DomainError;
use crate::core::model::Model;
use std::collections::HashSet;

/// Immutable snapshot of the configured judges.
///
/// Declaration order is preserved and is the tie-break order for rankings.
/// There is no way to add or replace a single judge: a new configuration
/// produces a whole new registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeRegistry {
    judges: Vec<JudgeIdentity>,
}

impl JudgeRegistry {
    /// Build a registry, rejecting empty lists, blank ids and duplicates.
    pub fn new(judges: Vec<JudgeIdentity>) -> Result<Self, DomainError> {
        if judges.is_empty() {
            return Err(DomainError::NoJudges);
        }

        let mut seen = HashSet::new();
        for judge in &judges {
            if judge.id.trim().is_empty() {
                return Err(DomainError::InvalidJudge(
                    "judge id cannot be empty".to_string(),
                ));
            }
            if judge.model.as_str().trim().is_empty() {
                return Err(DomainError::InvalidJudge(format!(
                    "{}: model name cannot be empty",
                    judge.id
                )));
            }
            if !seen.insert(judge.id.as_str()) {
                return Err(DomainError::DuplicateJudge(judge.id.clone()));
            }
        }

        Ok(Self { judges })
    }

    /// The built-in panel.
    pub fn builtin() -> Self {
        Self {
            judges: super::defaults::default_judges(),
        }
    }

    /// All judges in declaration order.
    pub fn list_judges(&self) -> &[JudgeIdentity] {
        &self.judges
    }

    pub fn get(&self, id: &str) -> Option<&JudgeIdentity> {
        self.judges.iter().find(|j| j.id == id)
    }

    pub fn persona_for(&self, id: &str) -> Option<&str> {
        self.get(id).map(|j| j.persona.as_str())
    }

    pub fn model_for(&self, id: &str) -> Option<&Model> {
        self.get(id).map(|j| &j.model)
    }

    /// Position of a judge in declaration order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.judges.iter().position(|j| j.id == id)
    }

    pub fn len(&self) -> usize {
        self.judges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.judges.is_empty()
    }
}

impl Default for JudgeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
