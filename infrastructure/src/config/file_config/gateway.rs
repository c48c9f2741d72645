//! Gateway configuration from TOML (`[gateway]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible endpoint serving every judge and the selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,
    /// Environment variable holding the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (prefer the env var).
    pub api_key: Option<String>,
    /// HTTP timeout per request.
    pub timeout_seconds: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            timeout_seconds: 120,
            max_tokens: 2048,
            temperature: 0.8,
        }
    }
}

impl FileGatewayConfig {
    /// Direct key first, then the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_key_wins() {
        let config = FileGatewayConfig {
            api_key: Some("sk-direct".to_string()),
            api_key_env: "JUDGE_PANEL_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-direct"));
    }

    #[test]
    fn test_missing_key() {
        let config = FileGatewayConfig {
            api_key: Some("  ".to_string()),
            api_key_env: "JUDGE_PANEL_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        assert!(config.resolve_api_key().is_none());
    }
}
