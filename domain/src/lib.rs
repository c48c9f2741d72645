//! Domain layer for judge-panel
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Stage One: evaluation
//!
//! Every judge on the panel looks at the same [`Artifact`] through its own
//! persona and returns a [`JudgeVerdict`]. Verdicts are recovered from noisy
//! model text by the [`extraction`] strategies and aggregated per
//! [`EvaluationMode`].
//!
//! ## Stage Two: debate
//!
//! Judges with a usable verdict argue in a [`DebateSession`] seeded by
//! [`build_summary`]. Turn output is passed through [`clean`] before it is
//! recorded.

pub mod config;
pub mod core;
pub mod debate;
pub mod evaluation;
pub mod extraction;
pub mod judge;
pub mod prompt;
pub mod record;
pub mod session;

pub use config::OutputFormat;
pub use core::{error::DomainError, model::Model};
pub use debate::{
    DebateEvent, DebateSession, DebateState, DebateTurn, SEED_SOURCE, TerminationCause,
    TranscriptEntry, build_summary,
};
pub use evaluation::{
    Artifact, Choice, ChoiceTally, DimensionScore, EvaluationAggregate, EvaluationMode,
    EvaluationRequest, JudgeVerdict, RankedVerdict, ScoreCard, VerdictError, VerdictErrorKind,
    VerdictOutcome, VerdictStatus, format_score,
};
pub use extraction::{ExpectedShape, ParsedOutcome, ParsedResult, clean, extract};
pub use judge::{JudgeIdentity, JudgeRegistry, core_trait};
pub use prompt::{PromptTemplate, SelectorPolicy};
pub use record::{DebateRecord, EntryRecord, TurnRecord, debate_id_for};
pub use session::stream::StreamEvent;
