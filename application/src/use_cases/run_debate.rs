//! Run Debate use case (Stage Two)
//!
//! Judges with a usable first-round verdict argue about the entry. A
//! [`SpeakerSelector`] picks who speaks next; every raw reply passes through
//! [`clean`] before it is recorded, and the loop ends when the invocation
//! budget is spent or something fails.
//!
//! ```text
//! setup (participants + selector) ──▶ seed ──▶ ┌ choose_next ┐
//!                                              │ stream reply │ × max_turns
//!                                              └ clean/record ┘
//! ```

use crate::config::DebateParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use crate::ports::progress::{NoProgress, ProgressNotifier, Stage};
use crate::use_cases::selector::{ModelSpeakerSelector, SpeakerSelector};
use panel_domain::{
    DebateEvent, DebateRecord, DebateSession, DebateState, DebateTurn, DomainError,
    EvaluationMode, JudgeIdentity, JudgeRegistry, JudgeVerdict, PromptTemplate, SelectorPolicy,
    TerminationCause, TurnRecord, build_summary, clean, debate_id_for,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that halt a debate. They end up in [`DebateResult::error`].
#[derive(Error, Debug)]
pub enum OrchestrationError {
    #[error("Debate setup failed: {0}")]
    Setup(String),

    #[error("Speaker selection failed: {0}")]
    Selector(String),

    #[error("Participant {judge_id} failed: {reason}")]
    Participant { judge_id: String, reason: String },

    #[error("{what} timed out after {seconds:.1}s")]
    Timeout { what: String, seconds: f64 },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    pub entry_id: String,
    pub mode: EvaluationMode,
    /// Stage-One verdicts; only successful ones take part
    pub verdicts: Vec<JudgeVerdict>,
    pub registry: Arc<JudgeRegistry>,
    pub params: DebateParams,
    pub policy: SelectorPolicy,
}

/// Prompts the debate was set up with
#[derive(Debug, Clone, Default, Serialize)]
pub struct DebateDebug {
    pub selector_prompt: String,
    /// (judge id, system prompt)
    pub system_prompts: Vec<(String, String)>,
    pub seed_summary: String,
}

/// Outcome of a debate. Always produced, even when the debate failed.
#[derive(Debug, Clone, Serialize)]
pub struct DebateResult {
    pub entry_id: String,
    pub participants: Vec<String>,
    pub max_turns: usize,
    pub turns: Vec<DebateTurn>,
    pub state: DebateState,
    pub termination: Option<TerminationCause>,
    pub error: Option<String>,
    /// Selector-accepted invocations, including ones that produced no turn
    pub invocations: usize,
    pub debug: DebateDebug,
}

impl DebateResult {
    pub fn is_failed(&self) -> bool {
        self.state == DebateState::Failed
    }

    /// Persisted shape of this debate
    pub fn to_record(&self, selector_model: &str) -> DebateRecord {
        DebateRecord {
            debate_id: debate_id_for(&self.entry_id),
            participants: self.participants.clone(),
            max_turns: self.max_turns,
            selector_model: selector_model.to_string(),
            turns: self.turns.iter().map(TurnRecord::from).collect(),
            termination: self.termination,
            error: self.error.clone(),
            created_at: chrono::Utc::now(),
        }
    }

    fn from_session(entry_id: String, session: DebateSession, debug: DebateDebug) -> Self {
        let participants = session.participants().to_vec();
        let max_turns = session.max_turns();
        let state = session.state();
        let termination = session.termination();
        let error = session.error().map(str::to_string);
        let invocations = session.invocations();
        Self {
            entry_id,
            participants,
            max_turns,
            turns: session.into_turns(),
            state,
            termination,
            error,
            invocations,
            debug,
        }
    }
}

/// A participant agent: identity plus its persona-primed session
struct Participant {
    judge: JudgeIdentity,
    session: Box<dyn LlmSession>,
}

/// Use case for running Stage Two
pub struct RunDebateUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    selector: Option<Arc<dyn SpeakerSelector>>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> RunDebateUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            selector: None,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Replace the model-backed selector.
    pub fn with_selector(mut self, selector: Arc<dyn SpeakerSelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunDebateInput) -> DebateResult {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDebateInput,
        progress: &dyn ProgressNotifier,
    ) -> DebateResult {
        let RunDebateInput {
            entry_id,
            mode,
            verdicts,
            registry,
            params,
            policy,
        } = input;

        let judges: Vec<&JudgeIdentity> = registry
            .list_judges()
            .iter()
            .filter(|j| verdict_for(&verdicts, &j.id).is_some_and(|v| v.is_success()))
            .collect();
        let policy = policy.restricted_to(&judges);

        let seed = build_summary(&entry_id, &mode, &verdicts);
        let mut session = DebateSession::new(
            judges.iter().map(|j| j.id.clone()).collect(),
            seed.clone(),
            params.max_turns,
        );
        let mut debug = DebateDebug {
            seed_summary: seed.clone(),
            ..Default::default()
        };

        info!(
            "Starting debate for {} with {} participants, budget {}",
            entry_id,
            judges.len(),
            params.max_turns
        );
        progress.on_stage_start(Stage::Debate, params.max_turns);

        let setup = self
            .setup(&judges, &verdicts, &mode, &params, &policy, &mut debug)
            .await;
        let (participants, selector) = match setup {
            Ok(ready) => ready,
            Err(e) => {
                warn!("Debate {} could not start: {}", entry_id, e);
                self.log_failure(&entry_id, &e);
                session.fail(e.to_string());
                progress.on_stage_complete(Stage::Debate);
                return DebateResult::from_session(entry_id, session, debug);
            }
        };

        if let Err(e) = session.start(debug.selector_prompt.clone()) {
            session.fail(e.to_string());
            progress.on_stage_complete(Stage::Debate);
            return DebateResult::from_session(entry_id, session, debug);
        }

        // The seed is shown to everyone but never becomes a turn
        let seed_event = DebateEvent::SeedMessage { content: seed };
        if let Err(e) = self.apply_event(&mut session, seed_event, &participants, progress) {
            session.fail(e.to_string());
        }

        if let Err(e) = self
            .run_loop(&mut session, &participants, selector.as_ref(), &params, progress)
            .await
        {
            warn!("Debate {} halted: {}", entry_id, e);
            self.log_failure(&entry_id, &e);
            session.fail(e.to_string());
        }
        session.terminate();

        info!(
            "Debate {} finished: {} turns from {} invocations ({:?})",
            entry_id,
            session.turns().len(),
            session.invocations(),
            session.state()
        );
        progress.on_stage_complete(Stage::Debate);

        DebateResult::from_session(entry_id, session, debug)
    }

    /// Create one agent per participant, then the selector.
    async fn setup(
        &self,
        judges: &[&JudgeIdentity],
        verdicts: &[JudgeVerdict],
        mode: &EvaluationMode,
        params: &DebateParams,
        policy: &SelectorPolicy,
        debug: &mut DebateDebug,
    ) -> Result<(Vec<Participant>, Arc<dyn SpeakerSelector>), OrchestrationError> {
        if judges.is_empty() {
            return Err(OrchestrationError::Setup(
                "no judge has a usable first-round verdict".to_string(),
            ));
        }

        let mut participants = Vec::with_capacity(judges.len());
        for judge in judges {
            let system_prompt =
                PromptTemplate::debate_system(&judge.persona, mode, verdict_for(verdicts, &judge.id));
            let session = with_deadline(
                params.turn_timeout,
                format!("creating agent {}", judge.id),
                self.gateway
                    .create_session_with_system_prompt(&judge.model, &system_prompt),
                |e| OrchestrationError::Setup(format!("{}: {}", judge.id, e)),
            )
            .await?;
            debug!("Debate agent {} ready on {}", judge.id, judge.model);
            debug.system_prompts.push((judge.id.clone(), system_prompt));
            participants.push(Participant {
                judge: (*judge).clone(),
                session,
            });
        }

        debug.selector_prompt = PromptTemplate::selector_system(judges, policy);
        let selector: Arc<dyn SpeakerSelector> = match &self.selector {
            Some(selector) => Arc::clone(selector),
            None => Arc::new(
                with_deadline(
                    params.turn_timeout,
                    "creating selector".to_string(),
                    ModelSpeakerSelector::connect(
                        self.gateway.as_ref(),
                        &params.selector_model,
                        &debug.selector_prompt,
                    ),
                    |e| OrchestrationError::Setup(format!("selector: {}", e)),
                )
                .await?,
            ),
        };

        Ok((participants, selector))
    }

    async fn run_loop(
        &self,
        session: &mut DebateSession,
        participants: &[Participant],
        selector: &dyn SpeakerSelector,
        params: &DebateParams,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), OrchestrationError> {
        let judges: Vec<&JudgeIdentity> = participants.iter().map(|p| &p.judge).collect();

        while session.has_budget() {
            let transcript = session.transcript();
            let pick = with_deadline(
                params.turn_timeout,
                "speaker selection".to_string(),
                selector.choose_next(&transcript, &judges),
                |e| OrchestrationError::Selector(e.to_string()),
            )
            .await?;
            session.record_invocation();

            self.conversation_logger.log(ConversationEvent::new(
                "selector_decision",
                serde_json::json!({
                    "invocation": session.invocations(),
                    "selected": pick,
                }),
            ));

            let Some(speaker) = participants.iter().find(|p| p.judge.id == pick) else {
                let event = DebateEvent::Other {
                    source: "selector".to_string(),
                    detail: format!("selected unknown speaker '{}'", pick),
                };
                self.apply_event(session, event, participants, progress)?;
                continue;
            };

            progress.on_turn_start(&speaker.judge);
            let request = PromptTemplate::participant_request(&transcript, &speaker.judge);
            let raw = with_deadline(
                params.turn_timeout,
                format!("turn of {}", speaker.judge.id),
                stream_reply(speaker, &request, progress),
                |e| OrchestrationError::Participant {
                    judge_id: speaker.judge.id.clone(),
                    reason: e.to_string(),
                },
            )
            .await?;

            let event = DebateEvent::ParticipantTurn {
                source: speaker.judge.id.clone(),
                content: raw,
            };
            self.apply_event(session, event, participants, progress)?;
        }

        Ok(())
    }

    /// Single place where transport events turn into session changes.
    fn apply_event(
        &self,
        session: &mut DebateSession,
        event: DebateEvent,
        participants: &[Participant],
        progress: &dyn ProgressNotifier,
    ) -> Result<(), OrchestrationError> {
        match event {
            DebateEvent::ParticipantTurn { source, content } => {
                let cleaned = clean(&content);
                if cleaned.is_empty() {
                    debug!("Dropping empty turn from {}", source);
                    let skipped = DebateEvent::Other {
                        source: source.clone(),
                        detail: "reply was empty after cleaning".to_string(),
                    };
                    progress.on_debate_event(&skipped);
                    self.conversation_logger.log(ConversationEvent::new(
                        "debate_skip",
                        serde_json::json!({ "speaker": source, "raw": content }),
                    ));
                    return Ok(());
                }

                let model = participants
                    .iter()
                    .find(|p| p.judge.id == source)
                    .map(|p| p.judge.model.clone())
                    .unwrap_or_default();
                let turn = session.append_turn(&source, content, cleaned, model)?;
                self.conversation_logger.log(ConversationEvent::new(
                    "debate_turn",
                    serde_json::json!({
                        "sequence": turn.sequence,
                        "speaker": turn.speaker,
                        "content": turn.content,
                        "raw": turn.raw_content,
                    }),
                ));
                progress.on_turn_recorded(turn);
            }
            other => {
                if let DebateEvent::Other { source, detail } = &other {
                    warn!("Debate event from {}: {}", source, detail);
                }
                self.conversation_logger.log(ConversationEvent::new(
                    "debate_event",
                    serde_json::to_value(&other).unwrap_or_default(),
                ));
                progress.on_debate_event(&other);
            }
        }
        Ok(())
    }

    fn log_failure(&self, entry_id: &str, error: &OrchestrationError) {
        self.conversation_logger.log(ConversationEvent::new(
            "debate_error",
            serde_json::json!({
                "entry_id": entry_id,
                "error": error.to_string(),
            }),
        ));
    }
}

fn verdict_for<'a>(verdicts: &'a [JudgeVerdict], judge_id: &str) -> Option<&'a JudgeVerdict> {
    verdicts.iter().find(|v| v.judge_id == judge_id)
}

/// Stream a participant's reply, forwarding chunks to progress.
async fn stream_reply(
    speaker: &Participant,
    request: &str,
    progress: &dyn ProgressNotifier,
) -> Result<String, GatewayError> {
    let handle = speaker.session.send_streaming(request).await?;
    handle
        .collect_text_with(|chunk| progress.on_turn_chunk(&speaker.judge.id, chunk))
        .await
}

/// Await a gateway call, bounded by `timeout` when one is set.
async fn with_deadline<T, F>(
    timeout: Option<Duration>,
    what: String,
    call: F,
    on_error: impl FnOnce(GatewayError) -> OrchestrationError,
) -> Result<T, OrchestrationError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                return Err(OrchestrationError::Timeout {
                    what,
                    seconds: limit.as_secs_f64(),
                });
            }
        },
        None => call.await,
    };
    result.map_err(on_error)
}
