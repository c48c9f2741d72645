//! Speaker selection strategies for the debate loop
//!
//! The orchestrator only asks "who speaks next?"; how that is decided is a
//! [`SpeakerSelector`]. The live strategy is a model call whose instructions
//! carry the priority rules; [`RoundRobinSelector`] is a deterministic stand-in.

use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use async_trait::async_trait;
use panel_domain::{JudgeIdentity, Model, PromptTemplate, TranscriptEntry, clean};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Picks the next speaker from the transcript.
///
/// The returned id is not guaranteed to name a participant; the caller
/// decides what to do with unknown names.
#[async_trait]
pub trait SpeakerSelector: Send + Sync {
    async fn choose_next(
        &self,
        transcript: &[TranscriptEntry],
        participants: &[&JudgeIdentity],
    ) -> Result<String, GatewayError>;
}

/// Selector backed by a model session (the "director")
pub struct ModelSpeakerSelector {
    session: Box<dyn LlmSession>,
}

impl ModelSpeakerSelector {
    pub fn new(session: Box<dyn LlmSession>) -> Self {
        Self { session }
    }

    /// Open a selector session with the given instructions.
    pub async fn connect<G: LlmGateway + ?Sized>(
        gateway: &G,
        model: &Model,
        instructions: &str,
    ) -> Result<Self, GatewayError> {
        let session = gateway
            .create_session_with_system_prompt(model, instructions)
            .await?;
        Ok(Self::new(session))
    }
}

#[async_trait]
impl SpeakerSelector for ModelSpeakerSelector {
    async fn choose_next(
        &self,
        transcript: &[TranscriptEntry],
        participants: &[&JudgeIdentity],
    ) -> Result<String, GatewayError> {
        let request = PromptTemplate::selector_request(transcript, participants);
        let reply = self.session.send(&request).await?;
        Ok(parse_selection(&reply, participants))
    }
}

/// Map a selector reply to a participant id.
///
/// An exact id (ignoring punctuation and an `@`) wins; otherwise the id that
/// appears earliest in the reply. If nothing matches, the trimmed reply is
/// returned unchanged so the caller can report it.
pub fn parse_selection(reply: &str, participants: &[&JudgeIdentity]) -> String {
    let cleaned = clean(reply);
    let candidate = cleaned
        .trim()
        .trim_matches(|c: char| (c.is_ascii_punctuation() && c != '_') || c.is_whitespace());

    if let Some(judge) = participants.iter().find(|j| j.id == candidate) {
        return judge.id.clone();
    }

    participants
        .iter()
        .filter_map(|j| cleaned.find(j.id.as_str()).map(|pos| (pos, &j.id)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, id)| id.clone())
        .unwrap_or_else(|| candidate.to_string())
}

/// Deterministic rotation through the participants
#[derive(Default)]
pub struct RoundRobinSelector {
    next: AtomicUsize,
}

impl RoundRobinSelector {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SpeakerSelector for RoundRobinSelector {
    async fn choose_next(
        &self,
        _transcript: &[TranscriptEntry],
        participants: &[&JudgeIdentity],
    ) -> Result<String, GatewayError> {
        if participants.is_empty() {
            return Err(GatewayError::Other("no participants to choose from".into()));
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % participants.len();
        Ok(participants[index].id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::ScriptedGateway;

    fn judges() -> Vec<JudgeIdentity> {
        vec![
            JudgeIdentity::new("grok_judge", "Grok", "grok-beta", ""),
            JudgeIdentity::new("doubao_judge", "Doubao", "doubao-pro-32k", ""),
            JudgeIdentity::new("qwen_judge", "Qwen", "qwen-max", ""),
        ]
    }

    #[test]
    fn test_parse_exact_id() {
        let judges = judges();
        let refs: Vec<_> = judges.iter().collect();
        assert_eq!(parse_selection("doubao_judge", &refs), "doubao_judge");
        assert_eq!(parse_selection("  `qwen_judge`.\n", &refs), "qwen_judge");
        assert_eq!(parse_selection("@grok_judge", &refs), "grok_judge");
    }

    #[test]
    fn test_parse_embedded_id() {
        let judges = judges();
        let refs: Vec<_> = judges.iter().collect();
        let reply = "Next up should be qwen_judge, then maybe grok_judge.";
        assert_eq!(parse_selection(reply, &refs), "qwen_judge");
        let reply = "<thinking>grok_judge has spoken a lot</thinking>doubao_judge";
        assert_eq!(parse_selection(reply, &refs), "doubao_judge");
    }

    #[test]
    fn test_parse_unknown_is_passed_through() {
        let judges = judges();
        let refs: Vec<_> = judges.iter().collect();
        assert_eq!(parse_selection("gemini_judge", &refs), "gemini_judge");
    }

    #[tokio::test]
    async fn test_round_robin() {
        let judges = judges();
        let refs: Vec<_> = judges.iter().collect();
        let selector = RoundRobinSelector::new();
        let mut picks = Vec::new();
        for _ in 0..4 {
            picks.push(selector.choose_next(&[], &refs).await.unwrap());
        }
        assert_eq!(
            picks,
            vec!["grok_judge", "doubao_judge", "qwen_judge", "grok_judge"]
        );
        assert!(selector.choose_next(&[], &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_model_selector_uses_instructions() {
        let gateway = ScriptedGateway::new().text("gpt-4o-mini", &["qwen_judge"]);
        let judges = judges();
        let refs: Vec<_> = judges.iter().collect();
        let selector = ModelSpeakerSelector::connect(&gateway, &Model::Gpt4oMini, "DIRECTOR")
            .await
            .unwrap();

        let pick = selector.choose_next(&[], &refs).await.unwrap();
        assert_eq!(pick, "qwen_judge");
        let created = gateway.created.lock().unwrap();
        assert_eq!(created[0], ("gpt-4o-mini".to_string(), "DIRECTOR".to_string()));
    }
}
