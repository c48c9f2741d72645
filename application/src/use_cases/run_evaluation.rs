//! Run Evaluation use case (Stage One)
//!
//! Fans one evaluation call per judge out concurrently and joins them back
//! into exactly one verdict per judge, in declaration order.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier, Stage};
use panel_domain::extraction::{ExpectedShape, ParsedOutcome, ParsedResult, extract};
use panel_domain::{
    DomainError, EvaluationAggregate, EvaluationMode, EvaluationRequest, JudgeIdentity,
    JudgeRegistry, JudgeVerdict, PromptTemplate, VerdictOutcome,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that abort the whole stage
#[derive(Error, Debug)]
pub enum RunEvaluationError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] DomainError),
}

/// Input for the RunEvaluation use case
#[derive(Debug, Clone)]
pub struct RunEvaluationInput {
    pub request: EvaluationRequest,
    /// Registry snapshot for this run
    pub registry: Arc<JudgeRegistry>,
}

impl RunEvaluationInput {
    pub fn new(request: EvaluationRequest, registry: Arc<JudgeRegistry>) -> Self {
        Self { request, registry }
    }
}

/// Stage-One output
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub entry_id: String,
    pub mode: EvaluationMode,
    /// One verdict per configured judge, in declaration order
    pub verdicts: Vec<JudgeVerdict>,
    pub aggregate: EvaluationAggregate,
    /// Set when no judge produced a usable outcome
    pub error: Option<String>,
}

impl EvaluationResult {
    pub fn successful(&self) -> impl Iterator<Item = &JudgeVerdict> {
        self.verdicts.iter().filter(|v| v.is_success())
    }

    pub fn failed_count(&self) -> usize {
        self.verdicts.iter().filter(|v| !v.is_success()).count()
    }
}

/// One judge's unit of work, discarded after the call
#[derive(Debug, Clone)]
struct EvaluationTask {
    judge: JudgeIdentity,
    system_prompt: String,
    instruction: String,
    image_url: Option<String>,
}

/// Use case for running Stage One
pub struct RunEvaluationUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> RunEvaluationUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunEvaluationInput,
    ) -> Result<EvaluationResult, RunEvaluationError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunEvaluationInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<EvaluationResult, RunEvaluationError> {
        let RunEvaluationInput {
            mut request,
            registry,
        } = input;

        if registry.is_empty() {
            return Err(DomainError::NoJudges.into());
        }
        request.validate()?;
        if request.entry_id.trim().is_empty() {
            request.entry_id = generate_entry_id();
        }

        let tasks = Self::build_tasks(&request, &registry);
        info!(
            "Evaluating {} ({}) with {} judges",
            request.entry_id,
            request.mode.as_str(),
            tasks.len()
        );
        progress.on_stage_start(Stage::Evaluation, tasks.len());

        let mut join_set = JoinSet::new();
        let mut index_of = HashMap::new();

        for (index, task) in tasks.iter().enumerate() {
            let gateway = Arc::clone(&self.gateway);
            let task = task.clone();

            let handle = join_set.spawn(async move {
                let result = Self::call_judge(gateway.as_ref(), &task).await;
                (index, result)
            });
            index_of.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<JudgeVerdict>> = vec![None; tasks.len()];

        while let Some(joined) = join_set.join_next_with_id().await {
            let (index, verdict) = match joined {
                Ok((_, (index, result))) => {
                    let task = &tasks[index];
                    (index, self.to_verdict(&task.judge, &request.mode, result))
                }
                Err(e) => {
                    // A panicking judge task is isolated like a transport failure
                    let Some(&index) = index_of.get(&e.id()) else {
                        warn!("Task join error for unknown task: {}", e);
                        continue;
                    };
                    warn!("Judge {} task failed: {}", tasks[index].judge.id, e);
                    let verdict = JudgeVerdict::transport_failure(
                        &tasks[index].judge,
                        format!("judge task aborted: {}", e),
                    );
                    (index, verdict)
                }
            };
            progress.on_judge_complete(&tasks[index].judge, verdict.is_success());
            slots[index] = Some(verdict);
        }

        let verdicts: Vec<JudgeVerdict> = slots
            .into_iter()
            .zip(&tasks)
            .map(|(slot, task)| {
                slot.unwrap_or_else(|| {
                    JudgeVerdict::transport_failure(&task.judge, "judge task did not complete")
                })
            })
            .collect();

        progress.on_stage_complete(Stage::Evaluation);

        let aggregate = EvaluationAggregate::from_verdicts(&request.mode, &verdicts);
        let succeeded = verdicts.iter().filter(|v| v.is_success()).count();
        let error = (succeeded == 0).then(|| format!("all {} judges failed", verdicts.len()));
        info!(
            "Evaluation {} finished: {}/{} usable verdicts",
            request.entry_id,
            succeeded,
            verdicts.len()
        );

        Ok(EvaluationResult {
            entry_id: request.entry_id,
            mode: request.mode,
            verdicts,
            aggregate,
            error,
        })
    }

    fn build_tasks(request: &EvaluationRequest, registry: &JudgeRegistry) -> Vec<EvaluationTask> {
        let instruction =
            PromptTemplate::judge_instruction(&request.entry_id, &request.mode, &request.artifact);
        let image_url = request.artifact.image_url().map(str::to_string);

        registry
            .list_judges()
            .iter()
            .map(|judge| EvaluationTask {
                judge: judge.clone(),
                system_prompt: PromptTemplate::judge_system(&request.mode, &judge.persona),
                instruction: instruction.clone(),
                image_url: image_url.clone(),
            })
            .collect()
    }

    /// Query a single judge
    async fn call_judge(gateway: &G, task: &EvaluationTask) -> Result<String, GatewayError> {
        let session = gateway
            .create_session_with_system_prompt(&task.judge.model, &task.system_prompt)
            .await?;

        match &task.image_url {
            Some(url) => session.send_with_image(&task.instruction, url).await,
            None => session.send(&task.instruction).await,
        }
    }

    fn to_verdict(
        &self,
        judge: &JudgeIdentity,
        mode: &EvaluationMode,
        result: Result<String, GatewayError>,
    ) -> JudgeVerdict {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Judge {} ({}) failed: {}", judge.id, judge.model, e);
                self.conversation_logger.log(ConversationEvent::new(
                    "judge_error",
                    serde_json::json!({
                        "judge_id": judge.id,
                        "model": judge.model.to_string(),
                        "error": e.to_string(),
                    }),
                ));
                return JudgeVerdict::transport_failure(judge, e.to_string());
            }
        };

        self.conversation_logger.log(ConversationEvent::new(
            "judge_response",
            serde_json::json!({
                "judge_id": judge.id,
                "model": judge.model.to_string(),
                "raw": raw,
            }),
        ));

        let shape = if mode.is_scoring() {
            ExpectedShape::Score
        } else {
            ExpectedShape::Choice
        };

        match extract(&raw, shape) {
            ParsedResult::Parsed {
                outcome,
                monologue,
                strategy,
            } => {
                debug!("Judge {} parsed via {} strategy", judge.id, strategy);
                let outcome = match outcome {
                    ParsedOutcome::Score(card) => VerdictOutcome::Score(card),
                    ParsedOutcome::Choice { choice, reasoning } => VerdictOutcome::Choice {
                        choice,
                        label: mode.label_for(choice).unwrap_or(choice.as_str()).to_string(),
                        reasoning,
                    },
                };
                JudgeVerdict::decided(judge, outcome, monologue, raw)
            }
            ParsedResult::Failed { excerpt, monologue } => {
                warn!("Judge {} returned no usable verdict", judge.id);
                JudgeVerdict::malformed(
                    judge,
                    format!("no usable verdict in output: {}", excerpt),
                    monologue,
                    raw,
                )
            }
        }
    }
}

/// `entry_<unix-millis>`
pub fn generate_entry_id() -> String {
    format!("entry_{}", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{Scripted, ScriptedGateway, scoring_reply};
    use panel_domain::{Artifact, Choice, VerdictErrorKind};
    use std::sync::Mutex;
    use std::time::Duration;

    fn registry() -> Arc<JudgeRegistry> {
        Arc::new(
            JudgeRegistry::new(vec![
                JudgeIdentity::new("grok_judge", "Grok", "grok-beta", "troll"),
                JudgeIdentity::new("gemini_judge", "Gemini", "gemini-2.0-flash-exp", "pixels"),
                JudgeIdentity::new("qwen_judge", "Qwen", "qwen-max", "poet"),
            ])
            .unwrap(),
        )
    }

    fn scoring_input() -> RunEvaluationInput {
        RunEvaluationInput::new(
            EvaluationRequest::new(
                "entry_1",
                EvaluationMode::scoring("outfit"),
                Artifact::image("https://example.com/fit.jpg"),
            ),
            registry(),
        )
    }

    #[derive(Default)]
    struct RecordingProgress {
        completed: Mutex<Vec<(String, bool)>>,
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_stage_start(&self, _stage: Stage, _total_tasks: usize) {}
        fn on_judge_complete(&self, judge: &JudgeIdentity, success: bool) {
            self.completed
                .lock()
                .unwrap()
                .push((judge.id.clone(), success));
        }
        fn on_stage_complete(&self, _stage: Stage) {}
    }

    #[tokio::test]
    async fn test_all_judges_succeed() {
        let gateway = ScriptedGateway::new()
            .text("grok-beta", &[scoring_reply(3.0, "cringe", "awful")])
            .text("gemini-2.0-flash-exp", &[scoring_reply(7.5, "symmetric", "ok")])
            .text("qwen-max", &[r#"{"overall_score": 9, "one_liner": "marvellous"}"#]);
        let gateway = Arc::new(gateway);
        let use_case = RunEvaluationUseCase::new(Arc::clone(&gateway));

        let result = use_case.execute(scoring_input()).await.unwrap();

        assert_eq!(result.verdicts.len(), 3);
        assert!(result.error.is_none());
        let ids: Vec<_> = result.verdicts.iter().map(|v| v.judge_id.as_str()).collect();
        assert_eq!(ids, vec!["grok_judge", "gemini_judge", "qwen_judge"]);
        assert_eq!(result.verdicts[0].monologue.as_deref(), Some("awful"));

        let ranking: Vec<_> = result
            .aggregate
            .ranking()
            .unwrap()
            .iter()
            .map(|r| r.judge_id.as_str())
            .collect();
        assert_eq!(ranking, vec!["qwen_judge", "gemini_judge", "grok_judge"]);

        // the image travelled with every call
        assert_eq!(gateway.images.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let gateway = ScriptedGateway::new()
            .script("grok-beta", vec![Scripted::Error("connection reset".into())])
            .text("gemini-2.0-flash-exp", &["I cannot rate pictures of people."])
            .text("qwen-max", &[scoring_reply(6.0, "elegant", "hmm")]);
        let use_case = RunEvaluationUseCase::new(Arc::new(gateway));
        let progress = RecordingProgress::default();

        let result = use_case
            .execute_with_progress(scoring_input(), &progress)
            .await
            .unwrap();

        assert_eq!(result.verdicts.len(), 3);
        assert_eq!(result.failed_count(), 2);
        assert_eq!(
            result.verdicts[0].error().map(|e| e.kind),
            Some(VerdictErrorKind::Transport)
        );
        assert_eq!(
            result.verdicts[1].error().map(|e| e.kind),
            Some(VerdictErrorKind::MalformedOutput)
        );
        assert!(result.verdicts[1].raw_output.is_some());
        assert_eq!(result.aggregate.ranking().unwrap().len(), 1);
        assert_eq!(progress.completed.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_slow_judge_does_not_reorder_results() {
        let gateway = ScriptedGateway::new()
            .script(
                "grok-beta",
                vec![Scripted::Slow(
                    Duration::from_millis(50),
                    scoring_reply(5.0, "late", "zzz"),
                )],
            )
            .text("gemini-2.0-flash-exp", &[scoring_reply(5.0, "tie", "x")])
            .text("qwen-max", &[scoring_reply(5.0, "tie", "y")]);
        let use_case = RunEvaluationUseCase::new(Arc::new(gateway));

        let result = use_case.execute(scoring_input()).await.unwrap();
        let ranking: Vec<_> = result
            .aggregate
            .ranking()
            .unwrap()
            .iter()
            .map(|r| r.judge_id.as_str())
            .collect();
        // equal scores keep declaration order even though grok finished last
        assert_eq!(ranking, vec!["grok_judge", "gemini_judge", "qwen_judge"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_judges_are_called_concurrently() {
        let delay = Duration::from_secs(10);
        let slow = |score: f64| vec![Scripted::Slow(delay, scoring_reply(score, "slow", "..."))];
        let gateway = ScriptedGateway::new()
            .script("grok-beta", slow(4.0))
            .script("gemini-2.0-flash-exp", slow(6.0))
            .script("qwen-max", slow(8.0));
        let use_case = RunEvaluationUseCase::new(Arc::new(gateway));

        let started = tokio::time::Instant::now();
        let result = use_case.execute(scoring_input()).await.unwrap();
        let elapsed = started.elapsed();

        assert!(result.verdicts.iter().all(|v| v.is_success()));
        // three sequential calls would take 30s
        assert!(elapsed >= delay);
        assert!(elapsed < delay * 2, "stage took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_all_failed_sets_error() {
        let gateway = ScriptedGateway::new()
            .failing("grok-beta")
            .failing("gemini-2.0-flash-exp")
            .failing("qwen-max");
        let use_case = RunEvaluationUseCase::new(Arc::new(gateway));

        let result = use_case.execute(scoring_input()).await.unwrap();
        assert_eq!(result.verdicts.len(), 3);
        assert_eq!(result.error.as_deref(), Some("all 3 judges failed"));
        assert!(result.aggregate.ranking().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_binary_choice_tally_and_label() {
        let gateway = ScriptedGateway::new()
            .text("grok-beta", &[r#"```json
{"choice": "a", "reasoning": "he forgot, again"}
```"#])
            .text("gemini-2.0-flash-exp", &[r#"{"choice": "B", "reasoning": "insufficient data"}"#])
            .text("qwen-max", &[r#"Ahem. {"choice": "A", "reasoning": "the moon weeps"}"#]);
        let use_case = RunEvaluationUseCase::new(Arc::new(gateway));
        let input = RunEvaluationInput::new(
            EvaluationRequest::new(
                "entry_2",
                EvaluationMode::binary_choice("Is he wrong?", "Wrong", "Not wrong"),
                Artifact::text("He forgot our anniversary."),
            ),
            registry(),
        );

        let result = use_case.execute(input).await.unwrap();
        let tally = result.aggregate.tally().unwrap();
        assert_eq!(tally.count(Choice::A), 2);
        assert_eq!(tally.count(Choice::B), 1);
        match result.verdicts[0].outcome() {
            Some(VerdictOutcome::Choice { label, .. }) => assert_eq!(label, "Wrong"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_configuration_errors() {
        let use_case = RunEvaluationUseCase::new(Arc::new(ScriptedGateway::new()));
        let input = RunEvaluationInput::new(
            EvaluationRequest::new("e", EvaluationMode::scoring("outfit"), Artifact::default()),
            registry(),
        );
        let err = use_case.execute(input).await.unwrap_err();
        assert!(matches!(
            err,
            RunEvaluationError::Configuration(DomainError::EmptyArtifact)
        ));
    }

    #[tokio::test]
    async fn test_blank_entry_id_is_generated() {
        let gateway = ScriptedGateway::new()
            .text("grok-beta", &[scoring_reply(1.0, "a", "b")])
            .text("gemini-2.0-flash-exp", &[scoring_reply(1.0, "a", "b")])
            .text("qwen-max", &[scoring_reply(1.0, "a", "b")]);
        let use_case = RunEvaluationUseCase::new(Arc::new(gateway));
        let mut input = scoring_input();
        input.request.entry_id = "  ".into();

        let result = use_case.execute(input).await.unwrap();
        assert!(result.entry_id.starts_with("entry_"));
    }
}
