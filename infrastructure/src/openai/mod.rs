//! OpenAI-compatible `/chat/completions` adapter
//!
//! Implements the [`LlmGateway`](panel_application::LlmGateway) port over
//! HTTP. Any endpoint that speaks the chat-completions protocol (OpenAI,
//! an aggregating router, a local server) can serve the whole panel.

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod session;

pub use error::OpenAiError;
pub use gateway::{OpenAiCompatibleGateway, OpenAiSettings};
pub use session::OpenAiSession;
