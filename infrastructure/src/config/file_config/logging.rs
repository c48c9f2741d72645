//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving judge responses, selector decisions and turns
    pub conversation_log: Option<PathBuf>,
    /// Directory for daily rolling diagnostic logs (overridden by `--log-dir`)
    pub log_dir: Option<PathBuf>,
}
