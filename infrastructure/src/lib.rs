//! Infrastructure layer for judge-panel
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod openai;
pub mod registry;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileDebateConfig, FileGatewayConfig,
    FileLoggingConfig, FileOutputConfig, FileOutputFormat, FilePanelConfig,
};
pub use logging::JsonlConversationLogger;
pub use openai::{OpenAiCompatibleGateway, OpenAiError, OpenAiSettings};
pub use registry::{FileRegistrySource, JudgesDocument};
pub use store::JsonFileEntryStore;
