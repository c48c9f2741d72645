//! Persisted shapes handed to the entry store
//!
//! An [`EntryRecord`] is the root; its verdicts and optional debate live
//! inside it, so deleting the entry removes everything that belongs to it.

use crate::debate::entities::{DebateTurn, TerminationCause};
use crate::evaluation::artifact::{Artifact, EvaluationMode};
use crate::evaluation::verdict::JudgeVerdict;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Debate id for an entry
pub fn debate_id_for(entry_id: &str) -> String {
    format!("{}_debate", entry_id)
}

/// A stored debate turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub sequence: u32,
    pub speaker: String,
    pub content: String,
}

impl From<&DebateTurn> for TurnRecord {
    fn from(turn: &DebateTurn) -> Self {
        Self {
            sequence: turn.sequence,
            speaker: turn.speaker.clone(),
            content: turn.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateRecord {
    pub debate_id: String,
    pub participants: Vec<String>,
    pub max_turns: usize,
    pub selector_model: String,
    pub turns: Vec<TurnRecord>,
    pub termination: Option<TerminationCause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Root record keyed by entry id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub entry_id: String,
    pub mode: EvaluationMode,
    pub artifact: Artifact,
    pub created_at: DateTime<Utc>,
    pub verdicts: Vec<JudgeVerdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debate: Option<DebateRecord>,
}

impl EntryRecord {
    pub fn new(
        entry_id: impl Into<String>,
        mode: EvaluationMode,
        artifact: Artifact,
        verdicts: Vec<JudgeVerdict>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            mode,
            artifact,
            created_at: Utc::now(),
            verdicts,
            debate: None,
        }
    }

    pub fn successful_verdicts(&self) -> impl Iterator<Item = &JudgeVerdict> {
        self.verdicts.iter().filter(|v| v.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Model;

    #[test]
    fn test_debate_id() {
        assert_eq!(debate_id_for("entry_42"), "entry_42_debate");
    }

    #[test]
    fn test_turn_record_from_turn() {
        let turn = DebateTurn {
            sequence: 3,
            speaker: "grok_judge".into(),
            content: "lol".into(),
            raw_content: "<thinking>x</thinking>lol".into(),
            context: vec![],
            model: Model::GrokBeta,
        };
        let record = TurnRecord::from(&turn);
        assert_eq!(record.sequence, 3);
        assert_eq!(record.content, "lol");
    }

    #[test]
    fn test_entry_record_serde() {
        let record = EntryRecord::new(
            "entry_1",
            EvaluationMode::scoring("outfit"),
            Artifact::image("https://x/y.png"),
            vec![],
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: EntryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
