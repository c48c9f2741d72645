//! Panel configuration from TOML (`[panel]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePanelConfig {
    /// Judges document overriding the built-in panel
    pub judges_file: Option<PathBuf>,
    /// Directory holding stored entries
    pub data_dir: Option<PathBuf>,
}

impl FilePanelConfig {
    /// Configured judges file, else `<config dir>/judge-panel/judges.toml`
    pub fn judges_path(&self) -> Option<PathBuf> {
        self.judges_file
            .clone()
            .or_else(|| dirs::config_dir().map(|d| d.join("judge-panel").join("judges.toml")))
    }

    /// Configured data dir, else `<data dir>/judge-panel/entries`
    pub fn entries_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("judge-panel")
                .join("entries")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_paths_win() {
        let config = FilePanelConfig {
            judges_file: Some(PathBuf::from("/tmp/judges.toml")),
            data_dir: Some(PathBuf::from("/tmp/entries")),
        };
        assert_eq!(config.judges_path(), Some(PathBuf::from("/tmp/judges.toml")));
        assert_eq!(config.entries_dir(), PathBuf::from("/tmp/entries"));
    }

    #[test]
    fn test_default_entries_dir() {
        let dir = FilePanelConfig::default().entries_dir();
        assert!(dir.ends_with("judge-panel/entries"));
    }
}
