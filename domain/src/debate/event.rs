//! Events crossing the transport boundary during a debate

use serde::{Deserialize, Serialize};

/// Closed set of things that can happen during a debate round.
///
/// Only [`DebateEvent::ParticipantTurn`] can become a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DebateEvent {
    /// The priming summary that opens the debate
    SeedMessage { content: String },
    /// Raw output of a real participant
    ParticipantTurn { source: String, content: String },
    /// Anything else (unknown selection, system notices)
    Other { source: String, detail: String },
}

impl DebateEvent {
    pub fn source(&self) -> &str {
        match self {
            DebateEvent::SeedMessage { .. } => super::entities::SEED_SOURCE,
            DebateEvent::ParticipantTurn { source, .. } | DebateEvent::Other { source, .. } => {
                source
            }
        }
    }
}
