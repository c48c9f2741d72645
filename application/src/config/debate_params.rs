//! Debate parameters for the Stage-Two loop.
//!
//! [`DebateParams`] groups the static parameters that control the turn loop
//! in [`RunDebateUseCase`](crate::use_cases::run_debate::RunDebateUseCase).

use panel_domain::Model;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turn loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateParams {
    /// Selector-accepted invocations before the debate terminates.
    pub max_turns: usize,
    /// Deadline for each selector or participant call.
    pub turn_timeout: Option<Duration>,
    /// Model behind the selector.
    pub selector_model: Model,
    /// Lookback window for ping-pong detection.
    pub pingpong_window: usize,
    /// Transcript length after which the closer is favoured.
    pub wrap_up_after: usize,
    /// Closing judge id; the first registered judge when unset.
    pub closer: Option<String>,
}

impl Default for DebateParams {
    fn default() -> Self {
        Self {
            max_turns: 20,
            turn_timeout: Some(Duration::from_secs(120)),
            selector_model: Model::default_selector(),
            pingpong_window: 6,
            wrap_up_after: 15,
            closer: None,
        }
    }
}

impl DebateParams {
    // ==================== Builder Methods ====================

    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.turn_timeout = timeout;
        self
    }

    pub fn with_selector_model(mut self, model: impl Into<Model>) -> Self {
        self.selector_model = model.into();
        self
    }

    pub fn with_pingpong_window(mut self, window: usize) -> Self {
        self.pingpong_window = window;
        self
    }

    pub fn with_wrap_up_after(mut self, turns: usize) -> Self {
        self.wrap_up_after = turns;
        self
    }

    pub fn with_closer(mut self, closer: impl Into<String>) -> Self {
        self.closer = Some(closer.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = DebateParams::default();
        assert_eq!(params.max_turns, 20);
        assert_eq!(params.turn_timeout, Some(Duration::from_secs(120)));
        assert_eq!(params.selector_model, Model::Gpt4oMini);
        assert_eq!(params.pingpong_window, 6);
        assert_eq!(params.wrap_up_after, 15);
        assert!(params.closer.is_none());
    }

    #[test]
    fn test_builder() {
        let params = DebateParams::default()
            .with_max_turns(6)
            .with_turn_timeout(None)
            .with_selector_model("qwen-max")
            .with_closer("qwen_judge");

        assert_eq!(params.max_turns, 6);
        assert!(params.turn_timeout.is_none());
        assert_eq!(params.selector_model, Model::QwenMax);
        assert_eq!(params.closer.as_deref(), Some("qwen_judge"));
    }
}
