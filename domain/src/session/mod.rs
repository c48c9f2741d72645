//! Model session domain.
//!
//! - [`stream::StreamEvent`] - one event of a streamed model response

pub mod stream;
