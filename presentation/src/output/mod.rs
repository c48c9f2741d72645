//! Output formatting for panel results

pub mod console;
