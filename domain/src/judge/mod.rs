//! Judge domain
//!
//! A judge is a personified model binding. The [`JudgeRegistry`] is an
//! immutable snapshot of every configured judge; reconfiguration builds a new
//! registry instead of editing the live one.

pub mod defaults;
pub mod entities;
pub mod persona;
pub mod registry;

pub use entities::JudgeIdentity;
pub use persona::core_trait;
pub use registry::JudgeRegistry;
