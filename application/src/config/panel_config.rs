//! Panel configuration snapshot.
//!
//! [`PanelConfig`] is obtained once per run and threaded through both
//! stages. It is never mutated in place: reconfiguration builds a new one,
//! so a running debate cannot observe a half-applied registry.

use crate::config::DebateParams;
use crate::use_cases::run_debate::RunDebateInput;
use crate::use_cases::run_evaluation::RunEvaluationInput;
use panel_domain::{EvaluationMode, EvaluationRequest, JudgeRegistry, JudgeVerdict, SelectorPolicy};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PanelConfig {
    registry: Arc<JudgeRegistry>,
    debate: DebateParams,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::new(JudgeRegistry::builtin(), DebateParams::default())
    }
}

impl PanelConfig {
    pub fn new(registry: JudgeRegistry, debate: DebateParams) -> Self {
        Self {
            registry: Arc::new(registry),
            debate,
        }
    }

    // ==================== Accessors ====================

    pub fn registry(&self) -> &Arc<JudgeRegistry> {
        &self.registry
    }

    pub fn debate(&self) -> &DebateParams {
        &self.debate
    }

    // ==================== Builder Methods (init-time) ====================

    /// A new snapshot with a different registry; `self` is left untouched.
    pub fn with_registry(&self, registry: JudgeRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            debate: self.debate.clone(),
        }
    }

    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.debate = self.debate.with_max_turns(max);
        self
    }

    /// Selector policy; the closer falls back to the first registered judge.
    /// The debate narrows it further to the judges that actually take part.
    pub fn selector_policy(&self) -> SelectorPolicy {
        let closer = self
            .debate
            .closer
            .as_deref()
            .filter(|id| self.registry.get(id).is_some())
            .map(str::to_string)
            .or_else(|| self.registry.list_judges().first().map(|j| j.id.clone()))
            .unwrap_or_default();

        SelectorPolicy::new(closer)
            .with_pingpong_window(self.debate.pingpong_window)
            .with_wrap_up_after(self.debate.wrap_up_after)
    }

    // ==================== Use Case Input Factories ====================

    pub fn to_evaluation_input(&self, request: EvaluationRequest) -> RunEvaluationInput {
        RunEvaluationInput::new(request, Arc::clone(&self.registry))
    }

    pub fn to_debate_input(
        &self,
        entry_id: impl Into<String>,
        mode: EvaluationMode,
        verdicts: Vec<JudgeVerdict>,
    ) -> RunDebateInput {
        RunDebateInput {
            entry_id: entry_id.into(),
            mode,
            verdicts,
            registry: Arc::clone(&self.registry),
            params: self.debate.clone(),
            policy: self.selector_policy(),
        }
    }
}
