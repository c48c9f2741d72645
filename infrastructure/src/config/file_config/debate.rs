//! Debate configuration from TOML (`[debate]` section)

use panel_application::DebateParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    pub max_turns: usize,
    /// Deadline per selector/participant call; unset disables it
    pub turn_timeout_seconds: Option<u64>,
    pub selector_model: String,
    pub pingpong_window: usize,
    pub wrap_up_after: usize,
    /// Judge id that gets the last word
    pub closer: Option<String>,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        let params = DebateParams::default();
        Self {
            max_turns: params.max_turns,
            turn_timeout_seconds: params.turn_timeout.map(|d| d.as_secs()),
            selector_model: params.selector_model.to_string(),
            pingpong_window: params.pingpong_window,
            wrap_up_after: params.wrap_up_after,
            closer: None,
        }
    }
}

impl FileDebateConfig {
    pub fn to_params(&self) -> DebateParams {
        let params = DebateParams::default()
            .with_max_turns(self.max_turns)
            .with_turn_timeout(self.turn_timeout_seconds.map(Duration::from_secs))
            .with_selector_model(self.selector_model.trim())
            .with_pingpong_window(self.pingpong_window)
            .with_wrap_up_after(self.wrap_up_after);
        match &self.closer {
            Some(closer) => params.with_closer(closer.clone()),
            None => params,
        }
    }
}
