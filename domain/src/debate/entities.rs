//! Debate session entities

use crate::core::error::DomainError;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Transcript source name of the seed summary
pub const SEED_SOURCE: &str = "host";

/// One message of the transcript as a speaker sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub source: String,
    pub content: String,
}

/// An emitted debate turn (append-only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateTurn {
    /// 1-based, gapless
    pub sequence: u32,
    pub speaker: String,
    pub content: String,
    pub raw_content: String,
    /// Transcript as seen by the speaker when the turn was emitted
    pub context: Vec<TranscriptEntry>,
    pub model: Model,
}

/// Debate lifecycle.
///
/// ```text
/// Initializing ──start──▶ Running ──budget spent──▶ Terminated
///      │                     │
///      └──────fail───────────┴──────────fail──────▶ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebateState {
    Initializing,
    Running,
    Terminated,
    Failed,
}

impl DebateState {
    pub fn is_final(&self) -> bool {
        matches!(self, DebateState::Terminated | DebateState::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationCause {
    /// Normal exit: the turn budget was used up
    BudgetExhausted,
    /// Agents or selector could not be set up; no turns
    SetupFailed,
    /// The turn loop failed; turns so far are kept
    LoopFailed,
}

impl TerminationCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationCause::BudgetExhausted => "budget exhausted",
            TerminationCause::SetupFailed => "setup failed",
            TerminationCause::LoopFailed => "loop failed",
        }
    }
}

/// A single debate, mutated only by appending turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateSession {
    participants: Vec<String>,
    seed_summary: String,
    max_turns: usize,
    selector_prompt: String,
    turns: Vec<DebateTurn>,
    invocations: usize,
    state: DebateState,
    termination: Option<TerminationCause>,
    error: Option<String>,
}

impl DebateSession {
    pub fn new(participants: Vec<String>, seed_summary: impl Into<String>, max_turns: usize) -> Self {
        Self {
            participants,
            seed_summary: seed_summary.into(),
            max_turns,
            selector_prompt: String::new(),
            turns: Vec::new(),
            invocations: 0,
            state: DebateState::Initializing,
            termination: None,
            error: None,
        }
    }

    /// Move to `Running` once agents and selector exist.
    pub fn start(&mut self, selector_prompt: impl Into<String>) -> Result<(), DomainError> {
        if self.state != DebateState::Initializing {
            return Err(DomainError::Orchestration(format!(
                "cannot start debate in state {:?}",
                self.state
            )));
        }
        self.selector_prompt = selector_prompt.into();
        self.state = DebateState::Running;
        Ok(())
    }

    /// Whether another selector-accepted invocation is allowed
    pub fn has_budget(&self) -> bool {
        self.state == DebateState::Running && self.invocations < self.max_turns
    }

    /// Count one selector-accepted invocation, whether or not it yields a turn.
    pub fn record_invocation(&mut self) {
        self.invocations += 1;
    }

    /// Seed summary followed by every recorded turn
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        std::iter::once(TranscriptEntry {
            source: SEED_SOURCE.to_string(),
            content: self.seed_summary.clone(),
        })
        .chain(self.turns.iter().map(|t| TranscriptEntry {
            source: t.speaker.clone(),
            content: t.content.clone(),
        }))
        .collect()
    }

    /// Append a turn with the next sequence number.
    ///
    /// Rejects speakers outside the participant set and blank content.
    pub fn append_turn(
        &mut self,
        speaker: &str,
        raw_content: impl Into<String>,
        content: impl Into<String>,
        model: Model,
    ) -> Result<&DebateTurn, DomainError> {
        if self.state != DebateState::Running {
            return Err(DomainError::Orchestration(format!(
                "cannot append turn in state {:?}",
                self.state
            )));
        }
        if !self.is_participant(speaker) {
            return Err(DomainError::Orchestration(format!(
                "{} is not a debate participant",
                speaker
            )));
        }
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::Orchestration(
                "refusing to record an empty turn".to_string(),
            ));
        }

        let turn = DebateTurn {
            sequence: self.turns.len() as u32 + 1,
            speaker: speaker.to_string(),
            content,
            raw_content: raw_content.into(),
            context: self.transcript(),
            model,
        };
        self.turns.push(turn);
        Ok(&self.turns[self.turns.len() - 1])
    }

    pub fn terminate(&mut self) {
        if !self.state.is_final() {
            self.state = DebateState::Terminated;
            self.termination = Some(TerminationCause::BudgetExhausted);
        }
    }

    /// Halt with an error; turns already recorded are kept.
    pub fn fail(&mut self, error: impl Into<String>) {
        if self.state.is_final() {
            return;
        }
        self.termination = Some(if self.state == DebateState::Initializing {
            TerminationCause::SetupFailed
        } else {
            TerminationCause::LoopFailed
        });
        self.state = DebateState::Failed;
        self.error = Some(error.into());
    }

    pub fn is_participant(&self, id: &str) -> bool {
        self.participants.iter().any(|p| p == id)
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn seed_summary(&self) -> &str {
        &self.seed_summary
    }

    pub fn selector_prompt(&self) -> &str {
        &self.selector_prompt
    }

    pub fn turns(&self) -> &[DebateTurn] {
        &self.turns
    }

    pub fn into_turns(self) -> Vec<DebateTurn> {
        self.turns
    }

    pub fn invocations(&self) -> usize {
        self.invocations
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn state(&self) -> DebateState {
        self.state
    }

    pub fn termination(&self) -> Option<TerminationCause> {
        self.termination
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(max_turns: usize) -> DebateSession {
        DebateSession::new(vec!["a".into(), "b".into()], "seed", max_turns)
    }

    #[test]
    fn test_sequence_is_gapless() {
        let mut s = session(5);
        s.start("selector").unwrap();
        s.append_turn("a", "raw", "one", Model::Gpt4o).unwrap();
        s.append_turn("b", "raw", "two", Model::QwenMax).unwrap();
        s.append_turn("a", "raw", "three", Model::Gpt4o).unwrap();
        let seqs: Vec<u32> = s.turns().iter().map(|t| t.sequence).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn test_context_snapshot_is_frozen() {
        let mut s = session(5);
        s.start("selector").unwrap();
        s.append_turn("a", "raw", "one", Model::Gpt4o).unwrap();
        s.append_turn("b", "raw", "two", Model::Gpt4o).unwrap();
        let turns = s.turns();
        assert_eq!(turns[0].context.len(), 1);
        assert_eq!(turns[0].context[0].source, SEED_SOURCE);
        assert_eq!(turns[1].context.len(), 2);
        assert_eq!(turns[1].context[1].content, "one");
    }

    #[test]
    fn test_rejects_outsider_and_empty() {
        let mut s = session(5);
        s.start("selector").unwrap();
        assert!(s.append_turn("mallory", "x", "x", Model::Gpt4o).is_err());
        assert!(s.append_turn("a", "x", "  ", Model::Gpt4o).is_err());
        assert!(s.turns().is_empty());
    }

    #[test]
    fn test_cannot_append_before_start() {
        let mut s = session(5);
        assert!(s.append_turn("a", "x", "x", Model::Gpt4o).is_err());
    }

    #[test]
    fn test_budget_counts_invocations() {
        let mut s = session(2);
        s.start("selector").unwrap();
        assert!(s.has_budget());
        s.record_invocation();
        s.record_invocation();
        assert!(!s.has_budget());
        s.terminate();
        assert_eq!(s.state(), DebateState::Terminated);
        assert_eq!(s.termination(), Some(TerminationCause::BudgetExhausted));
    }

    #[test]
    fn test_fail_during_setup() {
        let mut s = session(2);
        s.fail("selector unavailable");
        assert_eq!(s.state(), DebateState::Failed);
        assert_eq!(s.termination(), Some(TerminationCause::SetupFailed));
        assert!(s.turns().is_empty());
    }

    #[test]
    fn test_fail_during_loop_keeps_turns() {
        let mut s = session(4);
        s.start("selector").unwrap();
        s.append_turn("a", "raw", "kept", Model::Gpt4o).unwrap();
        s.fail("participant timed out");
        assert_eq!(s.termination(), Some(TerminationCause::LoopFailed));
        assert_eq!(s.turns().len(), 1);
        assert_eq!(s.error(), Some("participant timed out"));
        // final states are sticky
        s.terminate();
        assert_eq!(s.state(), DebateState::Failed);
    }
}
