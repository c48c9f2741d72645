//! Debate domain (Stage Two)

pub mod entities;
pub mod event;
pub mod summary;

pub use entities::{
    DebateSession, DebateState, DebateTurn, SEED_SOURCE, TerminationCause, TranscriptEntry,
};
pub use event::DebateEvent;
pub use summary::build_summary;
