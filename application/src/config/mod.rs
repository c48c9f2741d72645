//! Application-level configuration.
//!
//! - [`DebateParams`] - Stage-Two loop control (turn budget, deadlines, selector)
//! - [`PanelConfig`] - immutable per-run snapshot threaded through both stages

pub mod debate_params;
pub mod panel_config;

pub use debate_params::DebateParams;
pub use panel_config::PanelConfig;
