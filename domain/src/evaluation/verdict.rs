//! Per-judge verdicts
//!
//! A [`JudgeVerdict`] carries either a usable outcome or an error, never both.
//! The invariant is held by [`VerdictStatus`], so a failed verdict cannot be
//! constructed with an outcome attached.

use super::artifact::Choice;
use crate::core::model::Model;
use crate::judge::entities::JudgeIdentity;
use serde::{Deserialize, Serialize};

/// One named dimension of a scoring verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub name: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Structured commentary of a scoring verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub overall_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_liner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_for_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strengths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weaknesses: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimension_scores: Vec<DimensionScore>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_notes: Vec<String>,
}

impl ScoreCard {
    pub fn new(overall_score: f64) -> Self {
        Self {
            overall_score,
            one_liner: None,
            comment_for_audience: None,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            dimension_scores: Vec::new(),
            safety_notes: Vec::new(),
        }
    }

    pub fn with_one_liner(mut self, one_liner: impl Into<String>) -> Self {
        self.one_liner = Some(one_liner.into());
        self
    }
}

/// Headline result of a successful judge call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerdictOutcome {
    Score(ScoreCard),
    Choice {
        choice: Choice,
        /// Label of the chosen option at evaluation time
        label: String,
        reasoning: String,
    },
}

impl VerdictOutcome {
    pub fn score(&self) -> Option<f64> {
        match self {
            VerdictOutcome::Score(card) => Some(card.overall_score),
            VerdictOutcome::Choice { .. } => None,
        }
    }

    pub fn choice(&self) -> Option<Choice> {
        match self {
            VerdictOutcome::Score(_) => None,
            VerdictOutcome::Choice { choice, .. } => Some(*choice),
        }
    }

    /// Short public comment: one-liner for scores, reasoning for choices
    pub fn public_comment(&self) -> Option<&str> {
        match self {
            VerdictOutcome::Score(card) => card.one_liner.as_deref(),
            VerdictOutcome::Choice { reasoning, .. } => Some(reasoning.as_str()),
        }
    }

    /// Headline text, e.g. `8.5` or `A (Wrong)`
    pub fn headline(&self) -> String {
        match self {
            VerdictOutcome::Score(card) => format_score(card.overall_score),
            VerdictOutcome::Choice { choice, label, .. } => format!("{} ({})", choice, label),
        }
    }
}

/// Render a score without a trailing `.0` for whole numbers.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 && score.abs() < 1e15 {
        format!("{}", score as i64)
    } else {
        format!("{}", score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictErrorKind {
    /// The model call could not be completed
    Transport,
    /// The call completed but nothing usable could be extracted
    MalformedOutput,
}

impl VerdictErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictErrorKind::Transport => "transport failure",
            VerdictErrorKind::MalformedOutput => "malformed output",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictError {
    pub kind: VerdictErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerdictStatus {
    Decided { outcome: VerdictOutcome },
    Failed { error: VerdictError },
}

/// Stage-One result for a single judge (immutable once produced)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    pub judge_id: String,
    pub display_name: String,
    pub model: Model,
    #[serde(flatten)]
    pub status: VerdictStatus,
    /// Private, more candid commentary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monologue: Option<String>,
    /// Raw model text; absent when the transport failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
}

impl JudgeVerdict {
    pub fn decided(
        judge: &JudgeIdentity,
        outcome: VerdictOutcome,
        monologue: Option<String>,
        raw_output: impl Into<String>,
    ) -> Self {
        Self {
            judge_id: judge.id.clone(),
            display_name: judge.display_name.clone(),
            model: judge.model.clone(),
            status: VerdictStatus::Decided { outcome },
            monologue,
            raw_output: Some(raw_output.into()),
        }
    }

    pub fn transport_failure(judge: &JudgeIdentity, message: impl Into<String>) -> Self {
        Self {
            judge_id: judge.id.clone(),
            display_name: judge.display_name.clone(),
            model: judge.model.clone(),
            status: VerdictStatus::Failed {
                error: VerdictError {
                    kind: VerdictErrorKind::Transport,
                    message: message.into(),
                },
            },
            monologue: None,
            raw_output: None,
        }
    }

    pub fn malformed(
        judge: &JudgeIdentity,
        message: impl Into<String>,
        monologue: Option<String>,
        raw_output: impl Into<String>,
    ) -> Self {
        Self {
            judge_id: judge.id.clone(),
            display_name: judge.display_name.clone(),
            model: judge.model.clone(),
            status: VerdictStatus::Failed {
                error: VerdictError {
                    kind: VerdictErrorKind::MalformedOutput,
                    message: message.into(),
                },
            },
            monologue,
            raw_output: Some(raw_output.into()),
        }
    }

    pub fn outcome(&self) -> Option<&VerdictOutcome> {
        match &self.status {
            VerdictStatus::Decided { outcome } => Some(outcome),
            VerdictStatus::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&VerdictError> {
        match &self.status {
            VerdictStatus::Decided { .. } => None,
            VerdictStatus::Failed { error } => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome().is_some()
    }

    /// Most evocative short comment: monologue if present, else the public one
    pub fn evocative_comment(&self) -> Option<&str> {
        self.monologue
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.outcome().and_then(|o| o.public_comment()))
    }
}
