//! Streaming events for model calls.
//!
//! [`StreamEvent`] bridges transport-level streaming to the application
//! layer so debate turns can be shown while they are generated.

/// An event in a streaming model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text chunk from the model.
    Delta(String),
    /// The complete response text (signals stream end).
    Completed(String),
    /// An error that occurred during streaming.
    Error(String),
}
