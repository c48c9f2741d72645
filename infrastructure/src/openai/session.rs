//! Chat-completions session.
//!
//! Provides [`OpenAiSession`] which implements [`LlmSession`]. Each send is a
//! single stateless exchange: system prompt plus one user message.

use crate::openai::error::{OpenAiError, Result};
use crate::openai::gateway::OpenAiSettings;
use crate::openai::protocol::{
    ChatMessage, ChatRequest, ChatResponse, SseLine, parse_sse_line,
};
use async_trait::async_trait;
use panel_application::ports::llm_gateway::{GatewayError, LlmSession, StreamHandle};
use panel_domain::{Model, StreamEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

pub struct OpenAiSession {
    client: reqwest::Client,
    settings: Arc<OpenAiSettings>,
    model: Model,
    system_prompt: Option<String>,
}

impl OpenAiSession {
    pub fn new(
        client: reqwest::Client,
        settings: Arc<OpenAiSettings>,
        model: Model,
        system_prompt: Option<String>,
    ) -> Self {
        Self {
            client,
            settings,
            model,
            system_prompt,
        }
    }

    fn request(&self, user: ChatMessage, stream: bool) -> ChatRequest {
        let messages = self
            .system_prompt
            .iter()
            .map(ChatMessage::system)
            .chain(std::iter::once(user))
            .collect();
        ChatRequest {
            model: self.model.to_string(),
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            stream,
        }
    }

    async fn post(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        let mut builder = self.client.post(self.settings.endpoint()).json(request);
        if let Some(key) = &self.settings.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenAiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// One non-streaming exchange.
    pub async fn complete(&self, user: ChatMessage) -> Result<String> {
        debug!("POST {} (model {})", self.settings.endpoint(), self.model);
        let response = self.post(&self.request(user, false)).await?;
        let body: ChatResponse = response.json().await?;
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or(OpenAiError::EmptyResponse)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl LlmSession for OpenAiSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> std::result::Result<String, GatewayError> {
        Ok(self.complete(ChatMessage::user(content)).await?)
    }

    async fn send_with_image(
        &self,
        content: &str,
        image_url: &str,
    ) -> std::result::Result<String, GatewayError> {
        Ok(self
            .complete(ChatMessage::user_with_image(content, image_url))
            .await?)
    }

    async fn send_streaming(&self, content: &str) -> std::result::Result<StreamHandle, GatewayError> {
        let request = self.request(ChatMessage::user(content), true);
        let mut response = self.post(&request).await?;
        let (tx, rx) = mpsc::channel(64);

        tokio::spawn(async move {
            let mut pending: Vec<u8> = Vec::new();
            let mut full = String::new();

            loop {
                let bytes = match response.chunk().await {
                    Ok(Some(bytes)) => bytes,
                    Ok(None) => break,
                    Err(e) => {
                        let _ = tx.send(StreamEvent::Error(OpenAiError::from(e).to_string())).await;
                        return;
                    }
                };
                pending.extend_from_slice(&bytes);

                while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = pending.drain(..=pos).collect();
                    match parse_sse_line(&String::from_utf8_lossy(&line)) {
                        Ok(SseLine::Delta(text)) if !text.is_empty() => {
                            full.push_str(&text);
                            if tx.send(StreamEvent::Delta(text)).await.is_err() {
                                // Receiver dropped (deadline or cancellation)
                                return;
                            }
                        }
                        Ok(SseLine::Done) => {
                            let _ = tx.send(StreamEvent::Completed(full)).await;
                            return;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            let _ = tx
                                .send(StreamEvent::Error(format!("malformed stream chunk: {}", e)))
                                .await;
                            return;
                        }
                    }
                }
            }

            let _ = tx.send(StreamEvent::Completed(full)).await;
        });

        Ok(StreamHandle::new(rx))
    }
}
