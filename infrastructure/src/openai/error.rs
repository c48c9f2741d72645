//! Error types for the OpenAI-compatible adapter

use panel_application::GatewayError;
use thiserror::Error;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, OpenAiError>;

#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Response contained no choices")]
    EmptyResponse,

    #[error("Missing API key (set {0})")]
    MissingApiKey(String),
}

impl From<reqwest::Error> for OpenAiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            OpenAiError::Timeout
        } else if e.is_decode() {
            OpenAiError::Decode(e.to_string())
        } else {
            OpenAiError::Http(e.to_string())
        }
    }
}

impl From<OpenAiError> for GatewayError {
    fn from(e: OpenAiError) -> Self {
        match e {
            OpenAiError::Timeout => GatewayError::Timeout,
            OpenAiError::Http(msg) => GatewayError::ConnectionError(msg),
            OpenAiError::Status { status: 404, body } => GatewayError::ModelNotAvailable(body),
            OpenAiError::MissingApiKey(var) => {
                GatewayError::SessionError(format!("missing API key (set {})", var))
            }
            other => GatewayError::RequestFailed(other.to_string()),
        }
    }
}
