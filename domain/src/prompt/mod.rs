//! Prompt domain
//!
//! Templates for Stage-One judging, debate participants and the selector.

mod template;

pub use template::{PromptTemplate, SelectorPolicy};
