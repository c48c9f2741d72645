//! Output format value object

use serde::{Deserialize, Serialize};

/// How panel results are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Verdicts, aggregate and debate transcript
    #[default]
    Full,
    /// Verdicts and aggregate only
    Verdicts,
    /// Machine-readable JSON
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Full => "full",
            OutputFormat::Verdicts => "verdicts",
            OutputFormat::Json => "json",
        }
    }
}
