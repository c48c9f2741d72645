//! Judge registry sources backed by files

mod file_source;

pub use file_source::{FileRegistrySource, JudgesDocument};
