//! OpenAI-compatible LLM Gateway implementation

use crate::config::FileGatewayConfig;
use crate::openai::session::OpenAiSession;
use async_trait::async_trait;
use panel_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use panel_domain::Model;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Endpoint settings shared by every session
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl OpenAiSettings {
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl From<&FileGatewayConfig> for OpenAiSettings {
    fn from(config: &FileGatewayConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.resolve_api_key(),
            timeout: Duration::from_secs(config.timeout_seconds),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// One HTTP client serving every judge and the selector.
///
/// Sessions are cheap: they only hold the model binding and system prompt,
/// so creating one never touches the network.
pub struct OpenAiCompatibleGateway {
    client: reqwest::Client,
    settings: Arc<OpenAiSettings>,
}

impl OpenAiCompatibleGateway {
    pub fn new(settings: OpenAiSettings) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        Ok(Self::with_client(client, settings))
    }

    /// Build from the `[gateway]` config section
    pub fn from_config(config: &FileGatewayConfig) -> Result<Self, GatewayError> {
        let settings = OpenAiSettings::from(config);
        if settings.api_key.is_none() {
            warn!(
                "No API key found in {}; requests are sent unauthenticated",
                config.api_key_env
            );
        }
        info!("Model gateway: {}", settings.endpoint());
        Self::new(settings)
    }

    /// Create a gateway with an existing client
    pub fn with_client(client: reqwest::Client, settings: OpenAiSettings) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &OpenAiSettings {
        &self.settings
    }
}

#[async_trait]
impl LlmGateway for OpenAiCompatibleGateway {
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        let system_prompt = (!system_prompt.trim().is_empty()).then(|| system_prompt.to_string());
        Ok(Box::new(OpenAiSession::new(
            self.client.clone(),
            Arc::clone(&self.settings),
            model.clone(),
            system_prompt,
        )))
    }
}
