//! Progress notification port
//!
//! Defines the interface for reporting progress during evaluation and debate.

use panel_domain::{DebateEvent, DebateTurn, JudgeIdentity};

/// The two stages of a panel run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Evaluation,
    Debate,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Evaluation => "evaluation",
            Stage::Debate => "debate",
        }
    }
}

/// Callback for progress updates during a panel run
///
/// Implementations live in the presentation layer.
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts; `total_tasks` is judges or the turn budget
    fn on_stage_start(&self, stage: Stage, total_tasks: usize);

    /// Called when a judge's Stage-One call finishes
    fn on_judge_complete(&self, judge: &JudgeIdentity, success: bool);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: Stage);

    // ==================== Debate Callbacks ====================

    /// Called when the selector has picked a speaker
    fn on_turn_start(&self, _speaker: &JudgeIdentity) {}

    /// Called for each text chunk while a speaker is streaming.
    fn on_turn_chunk(&self, _speaker_id: &str, _chunk: &str) {}

    /// Called when a cleaned turn has been recorded
    fn on_turn_recorded(&self, _turn: &DebateTurn) {}

    /// Called for events that did not become turns
    fn on_debate_event(&self, _event: &DebateEvent) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: Stage, _total_tasks: usize) {}
    fn on_judge_complete(&self, _judge: &JudgeIdentity, _success: bool) {}
    fn on_stage_complete(&self, _stage: Stage) {}
}
