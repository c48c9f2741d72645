//! Artifact and evaluation mode value objects

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The submitted thing the judges look at (Value Object)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Image URL passed through to vision-capable models
    pub image_url: Option<String>,
    /// Inline text content
    pub text: Option<String>,
    /// Free-form background supplied by the submitter
    pub extra_context: Option<String>,
}

impl Artifact {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            image_url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.text = Some(content.into());
        self
    }

    pub fn with_extra_context(mut self, context: impl Into<String>) -> Self {
        self.extra_context = Some(context.into());
        self
    }

    /// Image URL, if present and not blank
    pub fn image_url(&self) -> Option<&str> {
        non_blank(self.image_url.as_deref())
    }

    /// Text content, if present and not blank
    pub fn text_content(&self) -> Option<&str> {
        non_blank(self.text.as_deref())
    }

    pub fn extra_context(&self) -> Option<&str> {
        non_blank(self.extra_context.as_deref())
    }

    /// Whether there is anything for a judge to look at
    pub fn has_content(&self) -> bool {
        self.image_url().is_some() || self.text_content().is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// One of the two labels in binary-choice mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
}

impl Choice {
    /// Parse "A"/"B" case-insensitively, ignoring surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "A" | "a" => Some(Choice::A),
            "B" | "b" => Some(Choice::B),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How judges express their verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Numeric score plus commentary
    Scoring { competition_type: String },
    /// Pick one of two labelled options
    BinaryChoice {
        question: String,
        option_a: String,
        option_b: String,
    },
}

impl EvaluationMode {
    pub fn scoring(competition_type: impl Into<String>) -> Self {
        EvaluationMode::Scoring {
            competition_type: competition_type.into(),
        }
    }

    pub fn binary_choice(
        question: impl Into<String>,
        option_a: impl Into<String>,
        option_b: impl Into<String>,
    ) -> Self {
        EvaluationMode::BinaryChoice {
            question: question.into(),
            option_a: option_a.into(),
            option_b: option_b.into(),
        }
    }

    pub fn is_scoring(&self) -> bool {
        matches!(self, EvaluationMode::Scoring { .. })
    }

    /// Option label for a choice; `None` in scoring mode
    pub fn label_for(&self, choice: Choice) -> Option<&str> {
        match self {
            EvaluationMode::Scoring { .. } => None,
            EvaluationMode::BinaryChoice {
                option_a, option_b, ..
            } => Some(match choice {
                Choice::A => option_a,
                Choice::B => option_b,
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationMode::Scoring { .. } => "scoring",
            EvaluationMode::BinaryChoice { .. } => "binary_choice",
        }
    }
}

/// A single Stage-One request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub entry_id: String,
    pub mode: EvaluationMode,
    pub artifact: Artifact,
}

impl EvaluationRequest {
    pub fn new(entry_id: impl Into<String>, mode: EvaluationMode, artifact: Artifact) -> Self {
        Self {
            entry_id: entry_id.into(),
            mode,
            artifact,
        }
    }

    /// Reject requests no judge could evaluate.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.artifact.has_content() {
            return Err(DomainError::EmptyArtifact);
        }
        Ok(())
    }
}
