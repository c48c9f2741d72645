//! Judge entities

use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// A single judge on the panel (Entity)
///
/// Immutable for the lifetime of a run. `id` is the stable key used in
/// verdicts, debate turns and selector output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeIdentity {
    /// Unique, stable key (e.g. "grok_judge")
    pub id: String,
    /// Human-facing name (e.g. "Grok")
    pub display_name: String,
    /// Model binding used for every call this judge makes
    pub model: Model,
    /// Persona text appended to the stage instructions
    pub persona: String,
}

impl JudgeIdentity {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        model: impl Into<Model>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            model: model.into(),
            persona: persona.into(),
        }
    }

    /// Core personality line used by the selector roles list
    pub fn core_trait(&self) -> String {
        super::persona::core_trait(&self.persona)
    }
}
