//! Configuration file loading for judge-panel
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Environment: `JUDGE_PANEL_<SECTION>__<KEY>`
//! 3. Project root: `./judge-panel.toml` or `./.judge-panel.toml`
//! 4. Global: `$XDG_CONFIG_HOME/judge-panel/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDebateConfig, FileGatewayConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat, FilePanelConfig,
};
pub use loader::ConfigLoader;
