//! Scripted gateway shared by use case tests.

use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use async_trait::async_trait;
use panel_domain::Model;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A scripted response for the mock session
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Text(String),
    Error(String),
    /// Reply after a delay
    Slow(Duration, String),
}

type Queue = Arc<Mutex<VecDeque<Scripted>>>;

/// Mock session that pops responses from its model's shared queue
pub(crate) struct ScriptedSession {
    model: Model,
    responses: Queue,
    images: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSession {
    fn next_response(&self) -> Scripted {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Scripted::Text("(no more responses)".to_string()))
    }
}

#[async_trait]
impl LlmSession for ScriptedSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, _content: &str) -> Result<String, GatewayError> {
        match self.next_response() {
            Scripted::Text(t) => Ok(t),
            Scripted::Error(e) => Err(GatewayError::RequestFailed(e)),
            Scripted::Slow(delay, t) => {
                tokio::time::sleep(delay).await;
                Ok(t)
            }
        }
    }

    async fn send_with_image(&self, content: &str, image_url: &str) -> Result<String, GatewayError> {
        self.images.lock().unwrap().push(image_url.to_string());
        self.send(content).await
    }
}

/// Mock gateway keyed by model name. Sessions of the same model share a queue.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    queues: Mutex<HashMap<String, Queue>>,
    failing_models: Mutex<HashSet<String>>,
    /// (model, system prompt) for every session created
    pub created: Mutex<Vec<(String, String)>>,
    /// Image URLs passed to `send_with_image`
    pub images: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, model: &str, responses: Vec<Scripted>) -> Self {
        self.queue(model).lock().unwrap().extend(responses);
        self
    }

    pub fn text<S: AsRef<str>>(self, model: &str, responses: &[S]) -> Self {
        let scripted = responses
            .iter()
            .map(|r| Scripted::Text(r.as_ref().to_string()))
            .collect();
        self.script(model, scripted)
    }

    /// Session creation for `model` fails
    pub fn failing(self, model: &str) -> Self {
        self.failing_models
            .lock()
            .unwrap()
            .insert(model.to_string());
        self
    }

    fn queue(&self, model: &str) -> Queue {
        self.queues
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        let name = model.to_string();
        if self.failing_models.lock().unwrap().contains(&name) {
            return Err(GatewayError::ConnectionError(format!("{} unreachable", name)));
        }
        self.created
            .lock()
            .unwrap()
            .push((name.clone(), system_prompt.to_string()));
        Ok(Box::new(ScriptedSession {
            model: model.clone(),
            responses: self.queue(&name),
            images: Arc::clone(&self.images),
        }))
    }
}

/// Well-formed scoring output with a monologue tag
pub(crate) fn scoring_reply(score: f64, one_liner: &str, monologue: &str) -> String {
    format!(
        "<inner_monologue>{monologue}</inner_monologue>\n```json\n{{\"overall_score\": {score}, \"one_liner\": \"{one_liner}\"}}\n```"
    )
}
