//! Application layer for judge-panel
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DebateParams, PanelConfig};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    entry_store::{EntryStore, StoreError},
    llm_gateway::{GatewayError, LlmGateway, LlmSession, StreamHandle},
    progress::{NoProgress, ProgressNotifier, Stage},
    registry_source::{BuiltinRegistrySource, RegistryError, RegistrySource},
};
pub use use_cases::run_debate::{
    DebateDebug, DebateResult, OrchestrationError, RunDebateInput, RunDebateUseCase,
};
pub use use_cases::run_evaluation::{
    EvaluationResult, RunEvaluationError, RunEvaluationInput, RunEvaluationUseCase,
    generate_entry_id,
};
pub use use_cases::selector::{ModelSpeakerSelector, RoundRobinSelector, SpeakerSelector};
