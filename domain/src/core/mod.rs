//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] - model bindings a judge or the selector can use
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod model;
pub mod string;
