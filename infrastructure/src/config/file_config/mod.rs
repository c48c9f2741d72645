//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod debate;
mod gateway;
mod logging;
mod output;
mod panel;

pub use debate::FileDebateConfig;
pub use gateway::FileGatewayConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use panel::FilePanelConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("gateway.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("debate.turn_timeout_seconds cannot be 0 (omit it to disable the deadline)")]
    InvalidTurnTimeout,

    #[error("debate.max_turns cannot be 0")]
    ZeroTurnBudget,

    #[error("{field}: model name cannot be empty")]
    EmptyModelName { field: String },

    #[error("gateway.base_url cannot be empty")]
    EmptyBaseUrl,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model endpoint settings
    pub gateway: FileGatewayConfig,
    /// Judges document and data locations
    pub panel: FilePanelConfig,
    /// Stage-Two loop control
    pub debate: FileDebateConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Conversation and diagnostic logs
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.gateway.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        if self.gateway.base_url.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyBaseUrl);
        }
        if self.debate.turn_timeout_seconds == Some(0) {
            issues.push(ConfigValidationError::InvalidTurnTimeout);
        }
        if self.debate.max_turns == 0 {
            issues.push(ConfigValidationError::ZeroTurnBudget);
        }
        if self.debate.selector_model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName {
                field: "debate.selector_model".to_string(),
            });
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_domain::OutputFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[gateway]
base_url = "http://localhost:8000/v1"
api_key_env = "PANEL_KEY"
timeout_seconds = 30

[panel]
judges_file = "judges.toml"

[debate]
max_turns = 10
turn_timeout_seconds = 45
selector_model = "qwen-max"
closer = "grok_judge"

[output]
format = "json"
color = false

[logging]
conversation_log = "panel.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway.base_url, "http://localhost:8000/v1");
        assert_eq!(config.gateway.timeout_seconds, 30);
        assert_eq!(config.debate.max_turns, 10);
        assert_eq!(config.debate.turn_timeout_seconds, Some(45));
        assert_eq!(config.debate.closer.as_deref(), Some("grok_judge"));
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(config.logging.conversation_log.is_some());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[debate]
max_turns = 4
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.debate.max_turns, 4);
        // Defaults should apply
        assert_eq!(config.debate.selector_model, "gpt-4o-mini");
        assert_eq!(config.gateway.max_tokens, 2048);
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let mut config = FileConfig::default();
        config.gateway.timeout_seconds = 0;
        config.debate.max_turns = 0;
        config.debate.turn_timeout_seconds = Some(0);
        config.debate.selector_model = " ".to_string();

        let issues = config.validate();
        assert_eq!(issues.len(), 4);
        assert!(issues.contains(&ConfigValidationError::ZeroTurnBudget));
        assert!(issues.contains(&ConfigValidationError::EmptyModelName {
            field: "debate.selector_model".to_string()
        }));
    }
}
