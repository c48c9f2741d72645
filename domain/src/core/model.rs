//! Model value object representing a model binding on the gateway

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Models known to the panel's gateway (Value Object)
///
/// Each judge is bound to exactly one model; the debate selector has its own
/// binding. Anything the gateway accepts but is not listed here is carried
/// as [`Model::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Gpt4o,
    Gpt4oMini,
    GrokBeta,
    Gemini20FlashExp,
    DoubaoPro32k,
    QwenMax,
    Custom(String),
}

impl Model {
    /// Get the string identifier sent to the gateway
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt4o => "gpt-4o",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::GrokBeta => "grok-beta",
            Model::Gemini20FlashExp => "gemini-2.0-flash-exp",
            Model::DoubaoPro32k => "doubao-pro-32k",
            Model::QwenMax => "qwen-max",
            Model::Custom(s) => s,
        }
    }

    /// Default model for the debate selector
    pub fn default_selector() -> Model {
        Model::Gpt4oMini
    }

    /// Whether the model is expected to accept image input
    pub fn supports_vision(&self) -> bool {
        matches!(self, Model::Gpt4o | Model::Gemini20FlashExp | Model::Custom(_))
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Gpt4o
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "gpt-4o" => Model::Gpt4o,
            "gpt-4o-mini" => Model::Gpt4oMini,
            "grok-beta" => Model::GrokBeta,
            "gemini-2.0-flash-exp" => Model::Gemini20FlashExp,
            "doubao-pro-32k" => Model::DoubaoPro32k,
            "qwen-max" => Model::QwenMax,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl From<String> for Model {
    fn from(s: String) -> Self {
        Model::from(s.as_str())
    }
}

impl From<&Model> for Model {
    fn from(model: &Model) -> Self {
        model.clone()
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}
