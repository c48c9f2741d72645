//! Evaluation domain (Stage One)
//!
//! - [`artifact`] - what is being judged and in which mode
//! - [`verdict`] - one judge's outcome or error
//! - [`aggregate`] - ranking (scoring mode) or tally (binary-choice mode)

pub mod aggregate;
pub mod artifact;
pub mod verdict;

pub use aggregate::{ChoiceTally, EvaluationAggregate, RankedVerdict};
pub use artifact::{Artifact, Choice, EvaluationMode, EvaluationRequest};
pub use verdict::{
    DimensionScore, JudgeVerdict, ScoreCard, VerdictError, VerdictErrorKind, VerdictOutcome,
    VerdictStatus, format_score,
};
