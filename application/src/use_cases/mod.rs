//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod run_debate;
pub mod run_evaluation;
pub mod selector;

#[cfg(test)]
pub(crate) mod test_support;
